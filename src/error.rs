use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Service account authentication error: {0}")]
    Auth(String),

    #[error(transparent)]
    NotFound(#[from] NotFound),

    #[error("Google Sheets API error: {0}")]
    Sheets(String),

    #[error("Google Drive API error: {0}")]
    Drive(String),

    #[error("Invalid tabular data: {0}")]
    Data(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Lookups that matched nothing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotFound {
    #[error("Spreadsheet '{name}' not found")]
    Spreadsheet { name: String },

    #[error("Worksheet index {index} not found in spreadsheet '{spreadsheet}'")]
    Worksheet { spreadsheet: String, index: usize },
}

impl AppError {
    pub fn is_spreadsheet_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(NotFound::Spreadsheet { .. }))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spreadsheet_not_found_is_distinguished() {
        let err: AppError = NotFound::Spreadsheet {
            name: "Budget".to_string(),
        }
        .into();
        assert!(err.is_spreadsheet_not_found());
        assert_eq!(err.to_string(), "Spreadsheet 'Budget' not found");

        let err: AppError = NotFound::Worksheet {
            spreadsheet: "Budget".to_string(),
            index: 3,
        }
        .into();
        assert!(!err.is_spreadsheet_not_found());

        let err = AppError::Drive("permission denied".to_string());
        assert!(!err.is_spreadsheet_not_found());
    }
}
