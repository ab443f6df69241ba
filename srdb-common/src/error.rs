//! Common error types for SRDB

use thiserror::Error;

/// Common result type for SRDB operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across SRDB crates
#[derive(Error, Debug)]
pub enum Error {
    /// A data file could not be retrieved (network, HTTP status or file system)
    #[error("Failed to load {file}: {reason}")]
    Fetch { file: String, reason: String },

    /// A data file was retrieved but does not match its expected schema
    #[error("Error parsing YAML for {file}: {reason}")]
    Parse { file: String, reason: String },

    /// The song plays collection loaded but contains no records
    #[error("Song plays data in {file} is empty or invalid")]
    EmptyCriticalData { file: String },

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),
}

impl Error {
    /// Name of the data file this error originated from, if any
    pub fn file(&self) -> Option<&str> {
        match self {
            Error::Fetch { file, .. }
            | Error::Parse { file, .. }
            | Error::EmptyCriticalData { file } => Some(file),
            _ => None,
        }
    }

    /// True for failures retrieving a file, as opposed to bad content
    pub fn is_fetch(&self) -> bool {
        matches!(self, Error::Fetch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loader_errors_name_their_file() {
        let err = Error::Fetch {
            file: "performers.yml".to_string(),
            reason: "HTTP error: 404".to_string(),
        };
        assert_eq!(err.file(), Some("performers.yml"));
        assert!(err.is_fetch());
        assert_eq!(err.to_string(), "Failed to load performers.yml: HTTP error: 404");

        let err = Error::EmptyCriticalData {
            file: "song-plays.yml".to_string(),
        };
        assert_eq!(err.file(), Some("song-plays.yml"));
        assert!(!err.is_fetch());
    }

    #[test]
    fn test_other_errors_have_no_file() {
        assert_eq!(Error::Config("bad".to_string()).file(), None);
        assert_eq!(Error::NotFound("x".to_string()).file(), None);
    }
}
