use thiserror::Error;

pub type StaffingResult<T> = Result<T, StaffingError>;

#[derive(Error, Debug)]
pub enum StaffingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read workbook: {0}")]
    Workbook(String),

    #[error("Sheet '{0}' not found in workbook")]
    MissingSheet(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl StaffingError {
    /// Short hint shown under the error when a load fails
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            StaffingError::Workbook(_) | StaffingError::Io(_) => {
                Some("Make sure the workbook exists, is closed in Excel, and try again.")
            }
            StaffingError::MissingSheet(_) => {
                Some("The workbook layout changed; check the sheet names in the config file.")
            }
            _ => None,
        }
    }
}
