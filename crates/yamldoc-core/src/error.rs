//! Error types for YAML document files.
//!
//! All errors in the system are represented by the [`Error`] enum.
//! [`Error::kind`] groups the variants into the coarse categories callers
//! usually branch on (argument, I/O, directory, parse, schema, config).

use std::io;
use std::path::PathBuf;
use thiserror::Error as ThisError;

/// The core error type for all document file operations.
#[derive(ThisError, Debug)]
pub enum Error {
    /// Caller supplied an unusable argument (e.g. remote path without a fetcher)
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// Local file system error, annotated with the path involved
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Remote transport failure, carrying the transport's message
    #[error("I/O error: could not fetch {url}: {message}")]
    Fetch { url: String, message: String },

    /// The parent location of a file is occupied by something else
    #[error("{} exists and is not a directory", .path.display())]
    NotADirectory { path: PathBuf },

    /// The parent directory is missing and could not be created
    #[error("{} does not exist and could not be created: {source}", .path.display())]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// YAML could not be decoded
    #[error("Parse error in {origin}: {reason}")]
    Parse { origin: String, reason: String },

    /// Value could not be encoded as YAML
    #[error("Encode error: {reason}")]
    Encode { reason: String },

    /// Syntax check rejected the raw document text
    #[error("Syntax error in {}: {reason}", .path.display())]
    Syntax { path: PathBuf, reason: String },

    /// Document does not satisfy its schema
    #[error("Schema validation failed for {}: {}", .path.display(), .errors.join("; "))]
    SchemaValidation { path: PathBuf, errors: Vec<String> },

    /// Invalid configuration
    #[error("Configuration error: {reason}")]
    ConfigError { reason: String },
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse error category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Argument,
    Io,
    Directory,
    Parse,
    Schema,
    Config,
}

impl Error {
    /// Create an invalid argument error
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Error::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Create a path-annotated I/O error
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a transport error
    pub fn fetch(url: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Fetch {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a "not a directory" error
    pub fn not_a_directory(path: impl Into<PathBuf>) -> Self {
        Error::NotADirectory { path: path.into() }
    }

    /// Create a directory creation error
    pub fn directory_creation(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::DirectoryCreation {
            path: path.into(),
            source,
        }
    }

    /// Create a parse error
    pub fn parse_error(origin: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Parse {
            origin: origin.into(),
            reason: reason.into(),
        }
    }

    /// Create an encode error
    pub fn encode_error(reason: impl Into<String>) -> Self {
        Error::Encode {
            reason: reason.into(),
        }
    }

    /// Create a syntax error
    pub fn syntax_error(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::Syntax {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a schema validation error
    pub fn schema_validation(path: impl Into<PathBuf>, errors: Vec<String>) -> Self {
        Error::SchemaValidation {
            path: path.into(),
            errors,
        }
    }

    /// Create a configuration error
    pub fn config_error(reason: impl Into<String>) -> Self {
        Error::ConfigError {
            reason: reason.into(),
        }
    }

    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidArgument { .. } => ErrorKind::Argument,
            Error::Io { .. } | Error::Fetch { .. } => ErrorKind::Io,
            Error::NotADirectory { .. } | Error::DirectoryCreation { .. } => ErrorKind::Directory,
            Error::Parse { .. } | Error::Encode { .. } | Error::Syntax { .. } => ErrorKind::Parse,
            Error::SchemaValidation { .. } => ErrorKind::Schema,
            Error::ConfigError { .. } => ErrorKind::Config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::not_a_directory("/tmp/locked");
        assert!(err.to_string().contains("exists and is not a directory"));
        assert_eq!(err.kind(), ErrorKind::Directory);

        let err = Error::invalid_argument("remote path needs a fetcher");
        assert!(err.to_string().contains("Invalid argument"));
        assert_eq!(err.kind(), ErrorKind::Argument);
    }

    #[test]
    fn test_fetch_is_io_kind() {
        let err = Error::fetch("https://example.org/a.yaml", "connection reset");
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("connection reset"));
        assert!(err.to_string().contains("https://example.org/a.yaml"));
    }

    #[test]
    fn test_io_keeps_source() {
        let source = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = Error::io("/etc/app.yaml", source);
        assert!(err.to_string().contains("/etc/app.yaml"));

        let inner = std::error::Error::source(&err).expect("source is kept");
        assert_eq!(inner.to_string(), "denied");
    }

    #[test]
    fn test_schema_errors_are_joined() {
        let err = Error::schema_validation(
            "composer.yaml",
            vec!["name is required".into(), "type must be string".into()],
        );
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert!(err.to_string().ends_with("name is required; type must be string"));
    }
}
