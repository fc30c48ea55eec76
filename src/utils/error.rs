use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("PCF file is not valid UTF-8: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),

    #[error("Worksheet XML error: {message}")]
    XmlError { message: String },

    #[error("Sheet '{name}' not found in workbook")]
    SheetMissing { name: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

impl AnalysisError {
    pub fn user_friendly_message(&self) -> String {
        match self {
            AnalysisError::IoError(e) => format!("Could not read or write a file: {}", e),
            AnalysisError::Utf8Error(_) => {
                "The PCF file could not be decoded as UTF-8 text".to_string()
            }
            AnalysisError::ZipError(_) | AnalysisError::XmlError { .. } => {
                "The reference workbook could not be read (corrupt or not an .xlsx file)"
                    .to_string()
            }
            AnalysisError::SheetMissing { name } => {
                format!("The reference workbook has no '{}' sheet", name)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AnalysisError::IoError(_) => "Check that both input paths exist and are readable",
            AnalysisError::Utf8Error(_) => "Re-export the PCF file with UTF-8 encoding",
            AnalysisError::ZipError(_) | AnalysisError::XmlError { .. } => {
                "Re-save the workbook as .xlsx and try again"
            }
            AnalysisError::SheetMissing { .. } => {
                "Add a 'Dictionary' sheet with ObjectIDs in the second column"
            }
            AnalysisError::ConfigError { .. } | AnalysisError::InvalidConfigValueError { .. } => {
                "Run with --help to see the expected arguments"
            }
            AnalysisError::ProcessingError { .. } => "Inspect the input files for irregularities",
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
