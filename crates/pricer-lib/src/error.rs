//! Error taxonomy for the pricing pipeline

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PriceError>;

/// Errors produced by the pricing pipeline
#[derive(Debug, Error)]
pub enum PriceError {
    /// A free-text field does not match its expected lexical pattern
    #[error("field `{field}` has malformed value `{value}`: expected {expected}")]
    MalformedField {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    /// Carries the offending row index for batch operations
    #[error("row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: Box<PriceError>,
    },

    /// Expected column absent, or transform-time columns diverge from fit-time
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Transformer or model missing at load time
    #[error("artifact not found: {0}")]
    ArtifactNotFound(PathBuf),

    /// Incumbent fetch or push against the model store failed
    #[error("remote model store: {0}")]
    RemoteStore(String),

    #[error("model training failed: {0}")]
    Training(String),

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("config: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("artifact encoding: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PriceError {
    /// Wrap this error with the row index it occurred at
    pub fn at_row(self, row: usize) -> Self {
        PriceError::Row {
            row,
            source: Box::new(self),
        }
    }

    /// True if this error (or the row-wrapped source) is a malformed field
    pub fn is_malformed_field(&self) -> bool {
        match self {
            PriceError::MalformedField { .. } => true,
            PriceError::Row { source, .. } => source.is_malformed_field(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_wrapper_keeps_field_kind() {
        let err = PriceError::MalformedField {
            field: "Ram",
            value: "16".to_string(),
            expected: "an integer with a GB suffix",
        }
        .at_row(7);

        assert!(err.is_malformed_field());
        assert!(err.to_string().contains("row 7"));
        assert!(err.to_string().contains("Ram"));
    }

    #[test]
    fn test_other_kinds_are_not_malformed_field() {
        let err = PriceError::SchemaMismatch("column `Ram` missing".to_string());
        assert!(!err.is_malformed_field());
    }
}
