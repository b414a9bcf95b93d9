use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Convenience result type for the filter/summary pipeline.
pub type ServiceResult<T> = Result<T, SummaryError>;

/// Error type returned while loading the dataset.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV decoding error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The input does not conform to the provided schema (missing required columns, etc.).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A value could not be parsed into the required [`crate::types::DataType`].
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },
}

/// Message reported for every [`SummaryError::Internal`].
pub const INTERNAL_ERROR_MESSAGE: &str = "An error occurred while processing your request.";

/// Message reported for [`SummaryError::NotFound`].
pub const NOT_FOUND_MESSAGE: &str = "No data matches the specified filters.";

/// Error type returned by the filter/summary pipeline.
///
/// `Display` is what a caller is allowed to see: validation messages are descriptive, the
/// internal variant is generic and keeps its detail in `message` for logging only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SummaryError {
    /// Malformed filter or column input.
    #[error("{message}")]
    Validation { message: String },

    /// The request was well formed but the filters matched no rows.
    #[error("{}", NOT_FOUND_MESSAGE)]
    NotFound,

    /// Any other failure (e.g. an unexpected dataset shape).
    #[error("{}", INTERNAL_ERROR_MESSAGE)]
    Internal { message: String },
}

impl SummaryError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// HTTP status class for this error: 400, 404 or 500.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::NotFound => 404,
            Self::Internal { .. } => 500,
        }
    }
}
