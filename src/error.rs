//! Error types shared by every module of the crate.

use std::path::{Path, PathBuf};

/// Errors raised by formulas, stores and file loaders.
///
/// Validation failures on the record and pack stores are not errors; they are
/// reported through [`crate::models::StoreOutcome`] instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid category: {0}")]
    InvalidCategory(String),

    #[error("division by zero: {0}")]
    DivisionByZero(&'static str),

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed CSV in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid date '{0}'")]
    InvalidDate(String),

    #[error("no purchase at row {0}")]
    PurchaseNotFound(usize),

    #[error("purchase at row {0} is an automatic import and cannot be changed")]
    ReadOnlyPurchase(usize),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Error::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn json(path: &Path, source: serde_json::Error) -> Self {
        Error::Json {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn csv(path: &Path, source: csv::Error) -> Self {
        Error::Csv {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Fails with [`Error::InvalidInput`] unless `value` is finite and non-negative.
pub(crate) fn ensure_non_negative(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(Error::InvalidInput(format!("{name} must be finite, got {value}")));
    }
    if value < 0.0 {
        return Err(Error::InvalidInput(format!("{name} cannot be negative, got {value}")));
    }
    Ok(())
}
