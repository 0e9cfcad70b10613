//! Error types for the tabula library.

use std::path::PathBuf;

use thiserror::Error;

/// Comprehensive error type for all tabula operations.
#[derive(Error, Debug)]
pub enum TabulaError {
    /// A result set declared a row shape the tabulator cannot lay out
    #[error("Unsupported iterable type: {shape}.")]
    UnsupportedShape { shape: String },
    /// A table row whose cell count differs from the header count
    #[error("Row has {found} cells but the table has {expected} columns")]
    RowWidth { expected: usize, found: usize },
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// The model's table does not exist in the database
    #[error("Table '{table}' not found")]
    UnknownTable { table: String },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Console output errors
    #[error("Output error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Both colour flags were given at once
    #[error("The --no-color and --force-color options can't be used together.")]
    ConflictingColorFlags,
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> TabulaError {
        TabulaError::Database {
            message: self.message,
            source,
        }
    }
}

impl TabulaError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates an input validation error.
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        TabulaError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| TabulaError::database(message).with_source(e))
    }
}

/// Result type alias for tabula operations
pub type Result<T> = std::result::Result<T, TabulaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_shape_message_names_shape() {
        let err = TabulaError::UnsupportedShape {
            shape: "RawIterable".to_string(),
        };
        assert_eq!(err.to_string(), "Unsupported iterable type: RawIterable.");
    }

    #[test]
    fn test_db_context_wraps_source() {
        let result: std::result::Result<(), rusqlite::Error> =
            Err(rusqlite::Error::QueryReturnedNoRows);
        let err = result.db_context("Failed to fetch rows").unwrap_err();
        assert!(matches!(err, TabulaError::Database { .. }));
        assert_eq!(err.to_string(), "Database error: Failed to fetch rows");
    }
}
