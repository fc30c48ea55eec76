use crate::domain::model::{AnalysisResult, RawInputs};
use crate::utils::error::Result;

pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

pub trait ConfigProvider {
    fn pcf_file(&self) -> &str;
    fn reference_file(&self) -> &str;
    fn output_path(&self) -> &str;
    /// Zero-based column of the Dictionary sheet holding ObjectIDs.
    fn reference_column(&self) -> usize;
}

pub trait Pipeline {
    fn extract(&self) -> Result<RawInputs>;
    fn transform(&self, inputs: RawInputs) -> Result<AnalysisResult>;
    fn load(&self, result: &AnalysisResult) -> Result<String>;
}
