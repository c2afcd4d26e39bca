//! Error types for postmeta ingestion

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ingestion operations
pub type Result<T> = std::result::Result<T, IngestError>;

#[derive(Error, Debug)]
pub enum IngestError {
    /// Compressed payload, text encoding or JSON document is malformed
    #[error("Parse error: {0}")]
    Parse(String),

    /// A required field is missing or has the wrong shape
    #[error("Field error: '{field}' {reason}")]
    Field { field: String, reason: String },

    #[error("Filesystem error at {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write CSV to {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to process {}", .path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<IngestError>,
    },
}

impl IngestError {
    pub fn field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Field {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Attach the input file to a parse or field error
    ///
    /// Filesystem errors already name their path and are returned unchanged.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        match self {
            err @ (Self::Filesystem { .. } | Self::InFile { .. }) => err,
            err => Self::InFile {
                path: path.into(),
                source: Box::new(err),
            },
        }
    }

    /// Innermost error, skipping file context wrappers
    pub fn root(&self) -> &IngestError {
        match self {
            Self::InFile { source, .. } => source.root(),
            err => err,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_in_file_wraps_field_errors() {
        let err = IngestError::field("id", "is missing").in_file("/data/raw/a.json.xz");

        assert_eq!(err.to_string(), "Failed to process /data/raw/a.json.xz");
        assert_eq!(err.source().unwrap().to_string(), "Field error: 'id' is missing");
        assert!(matches!(err.root(), IngestError::Field { field, .. } if field == "id"));
    }

    #[test]
    fn test_in_file_keeps_filesystem_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = IngestError::filesystem("/data/raw/a.json.xz", io).in_file("/data/raw/a.json.xz");

        assert!(matches!(err, IngestError::Filesystem { .. }));
    }

    #[test]
    fn test_in_file_does_not_double_wrap() {
        let err = IngestError::Parse("bad".into())
            .in_file("/a.json.xz")
            .in_file("/b.json.xz");

        assert_eq!(err.to_string(), "Failed to process /a.json.xz");
        assert!(matches!(err.root(), IngestError::Parse(_)));
    }
}
