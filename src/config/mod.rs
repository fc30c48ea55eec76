pub mod cli;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_path, Validate,
};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "pcf-conflicts")]
#[command(about = "Detects ObjectIDs with conflicting descriptions in PCF files")]
pub struct CliConfig {
    /// PCF file to scan for conflicting ObjectIDs
    #[arg(long)]
    pub pcf_file: String,

    /// Excel workbook with the reference ObjectID list (Dictionary sheet)
    #[arg(long)]
    pub reference_file: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// Zero-based Dictionary-sheet column holding the ObjectIDs
    #[arg(long, default_value = "1")]
    pub reference_column: usize,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ConfigProvider for CliConfig {
    fn pcf_file(&self) -> &str {
        &self.pcf_file
    }

    fn reference_file(&self) -> &str {
        &self.reference_file
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn reference_column(&self) -> usize {
        self.reference_column
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("pcf_file", &self.pcf_file)?;
        validate_file_extension("pcf_file", &self.pcf_file, &["pcf"])?;
        validate_path("reference_file", &self.reference_file)?;
        validate_file_extension("reference_file", &self.reference_file, &["xlsx", "xlsm"])?;
        validate_non_empty_string("output_path", &self.output_path)?;
        Ok(())
    }
}
