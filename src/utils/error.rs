use std::fmt;
use thiserror::Error;

/// Why an `isbn_10` value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Isbn10Reason {
    /// Fewer or more than ten significant characters after filtering.
    Length { found: usize },
    /// Ten characters, but the weighted sum is not a multiple of 11.
    Checksum { sum: u32 },
}

impl fmt::Display for Isbn10Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Isbn10Reason::Length { .. } => write!(f, "ISBN10 should be 10 digits."),
            Isbn10Reason::Checksum { .. } => {
                write!(f, "ISBN10 digit sum should be divisible by 11.")
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum BookError {
    #[error("{message} (title: {})", .title.as_deref().unwrap_or("<unknown>"))]
    MissingIdentifier {
        title: Option<String>,
        message: String,
    },

    #[error("Invalid isbn_10 '{value}': {reason}")]
    Isbn10Format { value: String, reason: Isbn10Reason },

    #[error("Field '{field}' expected {expected}, found {found}")]
    FieldCoercion {
        field: String,
        expected: &'static str,
        found: String,
    },

    #[error("Field '{field}' is required")]
    MissingField { field: String },

    #[error("Field '{field}' is invalid: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Book records are immutable: cannot assign field '{field}'")]
    ImmutabilityViolation { field: String },

    #[error("Record #{index} rejected: {source}")]
    RecordRejected {
        index: usize,
        #[source]
        source: Box<BookError>,
    },

    #[error("Input format error: {message}")]
    InputFormat { message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Input,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl BookError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BookError::MissingIdentifier { .. }
            | BookError::Isbn10Format { .. }
            | BookError::FieldCoercion { .. }
            | BookError::MissingField { .. }
            | BookError::InvalidField { .. }
            | BookError::ImmutabilityViolation { .. }
            | BookError::RecordRejected { .. } => ErrorCategory::Validation,
            BookError::InputFormat { .. } | BookError::SerializationError(_) => {
                ErrorCategory::Input
            }
            BookError::CsvError(_) | BookError::IoError(_) => ErrorCategory::Storage,
            BookError::ConfigError { .. }
            | BookError::ConfigValidationError { .. }
            | BookError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for a run that ended with this error.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,   // 資料錯誤
            ErrorSeverity::High => 1,     // 輸入或配置錯誤
            ErrorSeverity::Critical => 3, // 系統錯誤
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BookError::MissingIdentifier { title, .. } => match title {
                Some(title) => format!("Book '{}' has neither an ISBN-10 nor an ISBN-13", title),
                None => "A book has neither an ISBN-10 nor an ISBN-13".to_string(),
            },
            BookError::Isbn10Format { value, reason } => {
                format!("ISBN-10 '{}' is not valid: {}", value, reason)
            }
            BookError::RecordRejected { index, source } => {
                format!("Book #{} could not be loaded: {}", index, source.user_friendly_message())
            }
            BookError::InputFormat { message } => {
                format!("The input file is not a list of book objects: {}", message)
            }
            BookError::SerializationError(e) => format!("The input file is not valid JSON: {}", e),
            BookError::IoError(e) => format!("File access failed: {}", e),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            BookError::MissingIdentifier { .. } => "Add an isbn_10 or isbn_13 value to the record",
            BookError::Isbn10Format {
                reason: Isbn10Reason::Length { .. },
                ..
            } => "An ISBN-10 needs exactly ten digits (the last may be X)",
            BookError::Isbn10Format { .. } => "Check the ISBN-10 for a mistyped digit",
            BookError::FieldCoercion { .. }
            | BookError::MissingField { .. }
            | BookError::InvalidField { .. } => "Fix the field value in the input file",
            BookError::ImmutabilityViolation { .. } => {
                "Build an updated record with BookRecord::with_changes instead"
            }
            BookError::RecordRejected { .. } => {
                "Fix the record or rerun with --on-error skip to continue past it"
            }
            BookError::InputFormat { .. } | BookError::SerializationError(_) => {
                "The input must be a JSON array of objects"
            }
            BookError::CsvError(_) | BookError::IoError(_) => {
                "Check that the paths exist and are writable"
            }
            BookError::ConfigError { .. }
            | BookError::ConfigValidationError { .. }
            | BookError::InvalidConfigValueError { .. } => "Review the configuration values",
        }
    }
}

pub type Result<T> = std::result::Result<T, BookError>;
