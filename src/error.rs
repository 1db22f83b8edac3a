//! Error types for the `smartcube` state core
//!
//! This module defines all error types used throughout the crate,
//! providing clear error messages and proper error propagation.
//!
//! Error variants use `#[source]` to preserve error chains. Only conversion
//! and validation failures ever reach a caller; snapshot problems are
//! recovered inside the store and only show up in the log.

use std::fmt;
use thiserror::Error;

/// Simple error type for wrapping string messages while implementing `std::error::Error`
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StringError(pub String);

impl StringError {
    /// Create a new `StringError` from a string message
    pub fn new(msg: impl Into<String>) -> Box<Self> {
        Box::new(Self(msg.into()))
    }
}

/// A numeric setting that fell outside its documented bounds
///
/// Returned as a warning by settings updates after the value was clamped,
/// and wrapped in [`CubeError::ValueOutOfRange`] when a value cannot be
/// applied at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutOfRange {
    /// Snapshot name of the field (e.g. `brightness`)
    pub field: &'static str,
    /// Value the caller asked for
    pub requested: f64,
    /// Value actually stored, `None` when nothing was stored
    pub applied: Option<f64>,
    /// Inclusive lower bound
    pub min: f64,
    /// Inclusive upper bound (`f64::INFINITY` when unbounded)
    pub max: f64,
}

impl fmt::Display for OutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} = {} outside [{}, {}]",
            self.field, self.requested, self.min, self.max
        )?;
        if let Some(applied) = self.applied {
            write!(f, ", clamped to {applied}")?;
        }
        Ok(())
    }
}

/// Main error type for the `smartcube` crate
#[derive(Debug, Error)]
pub enum CubeError {
    /// Hex colour string could not be parsed
    #[error("Invalid color format: {0:?}")]
    InvalidColorFormat(String),

    /// Numeric setting outside its documented bounds
    #[error("Value out of range: {0}")]
    ValueOutOfRange(OutOfRange),

    /// Persisted snapshot could not be read or decoded
    /// Preserves the underlying error source for full error chain transparency
    #[error("Failed to load snapshot: {0}")]
    SnapshotLoadFailure(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Mode name outside the fixed set
    #[error("Unknown mode: {0:?}")]
    UnknownMode(String),

    /// Case material outside the fixed set
    #[error("Unknown case material: {0:?}")]
    UnknownMaterial(String),

    /// Snapshot backend failed to read or write
    /// Preserves the underlying error source for full error chain transparency
    #[error("Storage error: {0}")]
    StorageError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Logging subsystem could not be initialized
    #[error("Logging error: {0}")]
    LoggingError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for `smartcube` operations
pub type Result<T> = std::result::Result<T, CubeError>;

/// Convert an error to a user-friendly message
///
/// Suitable for a toast or inline hint next to the control that triggered it.
pub fn get_user_friendly_error(error: &CubeError) -> String {
    match error {
        CubeError::InvalidColorFormat(input) => format!(
            "\"{input}\" is not a valid color.\n\n\
             Use a hex color such as #00EAFF or #0EF."
        ),
        CubeError::ValueOutOfRange(range) => {
            if range.max.is_finite() {
                format!(
                    "{} must be between {} and {}.",
                    range.field, range.min, range.max
                )
            } else {
                format!("{} must be at least {}.", range.field, range.min)
            }
        }
        CubeError::SnapshotLoadFailure(_) => "Saved settings could not be read.\n\n\
             The configurator will start with default settings."
            .to_string(),
        CubeError::UnknownMode(mode) => format!(
            "Unknown mode: {mode}\n\n\
             Choose one of Study, Sleep, Party or Custom."
        ),
        CubeError::UnknownMaterial(material) => format!(
            "Unknown case material: {material}\n\n\
             Choose one of Matte, Metal or Transparent."
        ),
        CubeError::StorageError(_) | CubeError::IoError(_) => {
            "Settings could not be saved.\n\n\
             Your changes are kept for this session but may be lost on restart."
                .to_string()
        }
        CubeError::LoggingError(e) => format!("Logging could not be started:\n\n{e}"),
        CubeError::JsonError(e) => format!(
            "Saved settings are corrupted:\n\n{e}\n\n\
             Default settings will be used."
        ),
    }
}
