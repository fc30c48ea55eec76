pub mod etl;
pub mod export;
pub mod pcf;
pub mod pipeline;
pub mod reference;
pub mod xlsx;

pub use crate::domain::model::{AnalysisResult, ConflictRecord, RawInputs, ReferenceList};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
