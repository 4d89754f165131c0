//! Result and error types for the core library

use thiserror::Error;

/// Core library error type
///
/// Store and lookup operations report through these variants so callers can
/// tell a constraint violation or a missing row apart from a driver failure.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Already exists: {0}")]
    Duplicate(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Lookup error: {0}")]
    Lookup(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create a duplicate error
    pub fn duplicate(msg: impl Into<String>) -> Self {
        Self::Duplicate(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<duckdb::Error> for Error {
    fn from(err: duckdb::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<tera::Error> for Error {
    fn from(err: tera::Error) -> Self {
        Self::Template(err.to_string())
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::duplicate("movie 'Alien'").to_string(),
            "Already exists: movie 'Alien'"
        );
        assert_eq!(
            Error::not_found("movie 'Alien'").to_string(),
            "Not found: movie 'Alien'"
        );
        assert!(Error::validation("bad input")
            .to_string()
            .contains("Validation error"));
    }

    #[test]
    fn test_predicates() {
        assert!(Error::duplicate("x").is_duplicate());
        assert!(!Error::database("x").is_duplicate());
        assert!(Error::not_found("x").is_not_found());
        assert!(!Error::validation("x").is_not_found());
    }
}
