//! Core error types for the analytics engine.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.

use std::fmt;
use std::num::ParseFloatError;

use chrono::{NaiveDate, ParseError as ChronoParseError};
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the analytics crates.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Analytics operation failed: {0}")]
    Analytics(#[from] AnalyticsError),

    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to load configuration: {0}")]
    ConfigIO(String),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),

    #[error("Missing configuration key: {0}")]
    MissingConfigKey(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Operation name and input period attached to every analytics error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationContext {
    pub operation: &'static str,
    pub period: Option<(NaiveDate, NaiveDate)>,
}

impl OperationContext {
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            period: None,
        }
    }

    pub fn with_period(operation: &'static str, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            operation,
            period: Some((start, end)),
        }
    }
}

impl fmt::Display for OperationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.period {
            Some((start, end)) => write!(f, "{} [{} .. {}]", self.operation, start, end),
            None => write!(f, "{}", self.operation),
        }
    }
}

/// Errors raised by the performance and risk analytics engine.
///
/// Numeric edge cases with a safe default never surface here; these are the
/// structural failures a caller has to handle.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// Non-numeric or malformed input.
    #[error("{context}: invalid input: {message}")]
    InputValidation {
        context: OperationContext,
        message: String,
    },

    /// A zero-length return array where a result is mandatory.
    #[error("{context}: return series is empty")]
    EmptyInput { context: OperationContext },

    /// Aligned sample below the statistical minimum.
    #[error("{context}: insufficient data, {actual} aligned observations but {required} required")]
    InsufficientData {
        context: OperationContext,
        required: usize,
        actual: usize,
    },

    /// Referenced benchmark does not exist.
    #[error("{context}: benchmark '{benchmark_id}' not found")]
    NotFound {
        context: OperationContext,
        benchmark_id: String,
    },

    /// No valuation history for the requested period.
    #[error("{context}: no valuation history available")]
    NoData { context: OperationContext },

    /// An underlying data-provider call failed.
    #[error("{context}: external data provider failed: {message}")]
    ExternalData {
        context: OperationContext,
        message: String,
    },
}

impl AnalyticsError {
    pub fn context(&self) -> &OperationContext {
        match self {
            AnalyticsError::InputValidation { context, .. }
            | AnalyticsError::EmptyInput { context }
            | AnalyticsError::InsufficientData { context, .. }
            | AnalyticsError::NotFound { context, .. }
            | AnalyticsError::NoData { context }
            | AnalyticsError::ExternalData { context, .. } => context,
        }
    }

    pub fn invalid_input(context: OperationContext, message: impl Into<String>) -> Self {
        AnalyticsError::InputValidation {
            context,
            message: message.into(),
        }
    }

    pub fn external(context: OperationContext, source: &Error) -> Self {
        AnalyticsError::ExternalData {
            context,
            message: source.to_string(),
        }
    }

    /// Re-attributes the error to an enclosing operation, keeping its kind
    /// and details.
    pub fn within(self, context: OperationContext) -> Self {
        match self {
            AnalyticsError::InputValidation { message, .. } => {
                AnalyticsError::InputValidation { context, message }
            }
            AnalyticsError::EmptyInput { .. } => AnalyticsError::EmptyInput { context },
            AnalyticsError::InsufficientData {
                required, actual, ..
            } => AnalyticsError::InsufficientData {
                context,
                required,
                actual,
            },
            AnalyticsError::NotFound { benchmark_id, .. } => {
                AnalyticsError::NotFound {
                    context,
                    benchmark_id,
                }
            }
            AnalyticsError::NoData { .. } => AnalyticsError::NoData { context },
            AnalyticsError::ExternalData { message, .. } => {
                AnalyticsError::ExternalData { context, message }
            }
        }
    }
}

impl Error {
    /// Re-attributes analytics errors to `context`; other errors pass through.
    pub fn within(self, context: &OperationContext) -> Self {
        match self {
            Error::Analytics(e) => Error::Analytics(e.within(context.clone())),
            other => other,
        }
    }
}

/// Database-agnostic error type for storage operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert storage-specific errors (Diesel, SQLite, etc.) into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A unique constraint was violated (e.g., duplicate key).
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// A stored value could not be decoded into its domain type.
    #[error("Corrupt stored value: {0}")]
    CorruptValue(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Failed to parse number: {0}")]
    NumberParse(#[from] ParseFloatError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date/time: {0}")]
    DateTimeParse(#[from] ChronoParseError),
}

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateTimeParse(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidConfigValue(err.to_string())
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
