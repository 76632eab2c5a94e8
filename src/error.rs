//! Error types for the intentio library.
//!
//! All fallible operations return [`Result`], whose error type is the
//! [`IntentioError`] enum. Every condition a caller is expected to react to
//! has its own variant; nothing is signalled through message text.
//!
//! # Examples
//!
//! ```
//! use intentio::error::{IntentioError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(IntentioError::invalid_input("text must not be empty"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {e}"),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for intentio operations.
#[derive(Error, Debug)]
pub enum IntentioError {
    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Dataset file has an extension we do not load.
    #[error("Unsupported dataset format: {0}")]
    UnsupportedFormat(String),

    /// Dataset is missing a required column.
    #[error("Schema error: {0}")]
    Schema(String),

    /// No source produced any usable row.
    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    /// A label has too few examples for a stratified split.
    #[error("Stratification error: {0}")]
    Stratification(String),

    /// Prediction input is missing or empty.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A model artifact could not be resolved or deserialized.
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// Tracking-store errors (run lifecycle, artifact logging).
    #[error("Tracking error: {0}")]
    Tracking(String),

    /// Training errors not covered by a more specific variant.
    #[error("Training error: {0}")]
    Training(String),

    /// CSV parsing errors.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic anyhow error.
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with IntentioError.
pub type Result<T> = std::result::Result<T, IntentioError>;

impl IntentioError {
    /// Create a new unsupported-format error.
    pub fn unsupported_format<S: Into<String>>(msg: S) -> Self {
        IntentioError::UnsupportedFormat(msg.into())
    }

    /// Create a new schema error.
    pub fn schema<S: Into<String>>(msg: S) -> Self {
        IntentioError::Schema(msg.into())
    }

    /// Create a new empty-dataset error.
    pub fn empty_dataset<S: Into<String>>(msg: S) -> Self {
        IntentioError::EmptyDataset(msg.into())
    }

    /// Create a new stratification error.
    pub fn stratification<S: Into<String>>(msg: S) -> Self {
        IntentioError::Stratification(msg.into())
    }

    /// Create a new invalid-input error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        IntentioError::InvalidInput(msg.into())
    }

    /// Create a new model-unavailable error.
    pub fn model_unavailable<S: Into<String>>(msg: S) -> Self {
        IntentioError::ModelUnavailable(msg.into())
    }

    /// Create a new tracking error.
    pub fn tracking<S: Into<String>>(msg: S) -> Self {
        IntentioError::Tracking(msg.into())
    }

    /// Create a new training error.
    pub fn training<S: Into<String>>(msg: S) -> Self {
        IntentioError::Training(msg.into())
    }

    /// Whether this error is the caller's fault (maps to a client-error
    /// response at a serving boundary) as opposed to an operational failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            IntentioError::UnsupportedFormat(_)
                | IntentioError::Schema(_)
                | IntentioError::EmptyDataset(_)
                | IntentioError::InvalidInput(_)
        )
    }
}
