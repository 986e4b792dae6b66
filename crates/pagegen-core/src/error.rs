//! Error types and handling for pagegen-core operations.
//!
//! Almost every operation in this crate is total by design: normalization,
//! classification, and composition never fail per request. The error type
//! therefore covers the one class of failures the core is allowed to have —
//! configuration problems detected at load time — plus the I/O and
//! serialization failures that loading configuration can run into.
//!
//! ## Error Categories
//!
//! - **I/O Errors**: reading configuration or graph files from disk
//! - **Config Errors**: invalid site configuration, rule-matrix invariant
//!   violations, empty token pools, inverted word-count bands
//! - **Serialization Errors**: TOML/JSON deserialization failures
//! - **Not Found**: a slug or role name that nothing in the registry matches

use thiserror::Error;

/// The main error type for pagegen-core operations.
///
/// All fallible public functions in pagegen-core return `Result<T, Error>`.
/// Per the crate's failure contract, only loaders and constructors are
/// fallible; request-path functions (`normalize`, `compose`, `classify`,
/// `clean`) are total.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    ///
    /// Covers reading configuration files and structured-data graph files.
    /// The underlying `std::io::Error` is preserved.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid.
    ///
    /// Raised only at load time, never per request. Covers malformed site
    /// configuration values, an empty token pool, an inverted word-count
    /// band, and a rule matrix where a node type is both forbidden and
    /// required for the same role.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization or deserialization failed.
    ///
    /// Occurs when TOML configuration or a JSON structured-data graph
    /// cannot be parsed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Requested resource was not found.
    ///
    /// Used for unknown role names and similar lookups where the caller
    /// named something the frozen configuration does not contain.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl Error {
    /// Get the error category as a string identifier.
    ///
    /// Returns a static string that categorizes the error type for logging
    /// and metrics grouping.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Config(_) => "config",
            Self::Serialization(_) => "serialization",
            Self::NotFound(_) => "not_found",
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_display_formatting() {
        let errors = vec![
            Error::Config("missing field".to_string()),
            Error::Serialization("bad toml".to_string()),
            Error::NotFound("role 'shop'".to_string()),
        ];

        for error in errors {
            let error_string = error.to_string();
            assert!(!error_string.is_empty());
            assert!(error_string.contains(':'));
        }
    }

    #[test]
    fn test_error_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: Error = io_err.into();
        match error {
            Error::Io(inner) => assert!(inner.to_string().contains("file not found")),
            other => panic!("expected IO error variant, got {other:?}"),
        }
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let error: Error = json_err.into();
        assert_eq!(error.category(), "serialization");
    }

    #[test]
    fn test_error_categories() {
        let cases = vec![
            (Error::Io(io::Error::other("x")), "io"),
            (Error::Config("x".to_string()), "config"),
            (Error::Serialization("x".to_string()), "serialization"),
            (Error::NotFound("x".to_string()), "not_found"),
        ];
        for (error, expected) in cases {
            assert_eq!(error.category(), expected);
        }
    }

    #[test]
    fn test_error_chain_source() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let error: Error = io_error.into();
        let source = std::error::Error::source(&error);
        assert!(source.is_some());
        assert!(source.unwrap().to_string().contains("access denied"));
    }
}
