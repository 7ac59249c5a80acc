use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("CSV must have a header row and at least one data row (found {found} non-blank lines)")]
    InsufficientRows { found: usize },

    #[error("Unsupported file '{path}': only .csv files can be imported")]
    UnsupportedFile { path: String },

    #[error("Phone column is not mapped")]
    PhoneColumnUnset,

    #[error("Column '{column}' for {field} does not exist ({available} columns in header)")]
    UnknownColumn {
        field: String,
        column: String,
        available: usize,
    },

    #[error("No valid contacts found")]
    NoValidContacts,

    #[error("Cannot {action} while in {state} step")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },

    #[error("Backend rejected request ({status}): {message}")]
    BackendError { status: u16, message: String },

    #[error("Unauthorized: the API token was rejected")]
    Unauthorized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Structural,
    Mapping,
    Transport,
    Configuration,
    Storage,
    Workflow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ImportError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ImportError::InsufficientRows { .. }
            | ImportError::UnsupportedFile { .. }
            | ImportError::CsvError(_)
            | ImportError::NoValidContacts => ErrorCategory::Structural,
            ImportError::PhoneColumnUnset | ImportError::UnknownColumn { .. } => {
                ErrorCategory::Mapping
            }
            ImportError::ApiError(_)
            | ImportError::BackendError { .. }
            | ImportError::Unauthorized
            | ImportError::SerializationError(_) => ErrorCategory::Transport,
            ImportError::ConfigError { .. }
            | ImportError::InvalidConfigValueError { .. }
            | ImportError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            ImportError::IoError(_) => ErrorCategory::Storage,
            ImportError::InvalidTransition { .. } => ErrorCategory::Workflow,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Workflow => ErrorSeverity::Low,
            ErrorCategory::Transport => ErrorSeverity::Medium,
            ErrorCategory::Structural | ErrorCategory::Mapping => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// Transport failures can be retried from the preview step without re-uploading.
    pub fn is_retryable(&self) -> bool {
        self.category() == ErrorCategory::Transport
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ImportError::InsufficientRows { .. } => {
                "Add a header line followed by at least one contact row"
            }
            ImportError::UnsupportedFile { .. } => "Select a file with a .csv extension",
            ImportError::CsvError(_) => "Check the file is valid comma-separated text",
            ImportError::NoValidContacts => {
                "Make sure the mapped phone column contains phone numbers"
            }
            ImportError::PhoneColumnUnset => {
                "Map the phone column with --phone <index or header>"
            }
            ImportError::UnknownColumn { .. } => {
                "Use a zero-based column index or a header name from the file"
            }
            ImportError::Unauthorized => "Log in again and pass a fresh token with --token",
            ImportError::ApiError(_) | ImportError::BackendError { .. } => {
                "Check the API URL and your network, then retry the import"
            }
            ImportError::SerializationError(_) => {
                "The backend returned an unexpected response; check the API URL"
            }
            ImportError::ConfigError { .. }
            | ImportError::InvalidConfigValueError { .. }
            | ImportError::ConfigValidationError { .. } => {
                "Fix the configuration file or command line arguments"
            }
            ImportError::IoError(_) => "Check the path exists and is readable/writable",
            ImportError::InvalidTransition { .. } => "Finish the current step first",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ImportError::InsufficientRows { .. } => {
                "CSV file must have headers and at least one data row".to_string()
            }
            ImportError::UnsupportedFile { .. } => "Please select a CSV file".to_string(),
            ImportError::PhoneColumnUnset => "Please map the Phone column".to_string(),
            ImportError::NoValidContacts => "No valid contacts found".to_string(),
            ImportError::BackendError { message, .. } => message.clone(),
            ImportError::ApiError(_) => "Import failed".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;
