//! Error types for assumption loading and schedule construction
//!
//! The calculation engines themselves never fail; these errors only surface
//! when reading or validating the assumptions that parameterise them.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for assumption handling
pub type Result<T> = std::result::Result<T, AssumptionError>;

/// Errors raised while loading or validating calculator assumptions
#[derive(Error, Debug)]
pub enum AssumptionError {
    /// Assumption file could not be opened or read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Assumption file was not valid CSV for its expected layout
    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A required key was absent from a key/value assumption file
    #[error("missing assumption '{key}' in {path}")]
    MissingKey { key: String, path: PathBuf },

    /// A key/value assumption file contained a key we do not recognise
    #[error("unknown assumption '{key}' in {path}")]
    UnknownKey { key: String, path: PathBuf },

    /// A value in an assumption file could not be parsed
    #[error("cannot parse '{value}' for '{key}' in {path}")]
    InvalidValue {
        key: String,
        value: String,
        path: PathBuf,
    },

    /// A serviceability or exemption parameter is out of range
    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: String,
    },

    /// A stamp duty bracket table violates its structural invariants
    #[error("invalid duty schedule at bracket {index}: {reason}")]
    InvalidSchedule { index: usize, reason: String },
}
