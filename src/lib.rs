pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{cli::LocalStorage, CliConfig};
pub use core::{etl::AnalysisEngine, pipeline::ConflictPipeline};
pub use domain::model::{AnalysisResult, ConflictRecord, ReferenceList};
pub use utils::error::{AnalysisError, Result};
