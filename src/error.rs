//! Error types for the catalog
//!
//! Every failure maps onto one of four kinds (see [`ErrorKind`]):
//! validation problems are raised before anything is written, not-found
//! conditions identify what was addressed, connection errors mean the store
//! could not be reached or the session is closed, and storage errors cover
//! the files and history underneath.

use crate::schema::ValidationError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for catalog operations
#[derive(Debug, Error)]
pub enum Error {
    // ==========================================================================
    // Validation Errors
    // ==========================================================================
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Batch(BatchFailure),

    #[error("Invalid {kind} '{value}': {reason}")]
    InvalidIdentifier {
        kind: &'static str,
        value: String,
        reason: &'static str,
    },

    // ==========================================================================
    // Not Found Errors
    // ==========================================================================
    #[error("Product '{name}' not found")]
    ProductNotFound { name: String },

    #[error("Product '{product}' has no variant with color '{color}'")]
    VariantNotFound { product: String, color: String },

    #[error("No product has a variant with id '{id}'")]
    VariantIdNotFound { id: String },

    // ==========================================================================
    // Connection Errors
    // ==========================================================================
    #[error("Cannot connect to catalog at '{uri}': {reason}")]
    Connection { uri: String, reason: String },

    #[error("Catalog connection is closed")]
    ConnectionClosed,

    // ==========================================================================
    // Storage Errors
    // ==========================================================================
    #[error("Git operation failed: {message}")]
    GitError {
        message: String,
        #[source]
        source: Option<git2::Error>,
    },

    #[error("Failed to read file '{path}': {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    FileWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Insert stopped after {inserted} product(s): {source}")]
    PartialInsert {
        /// Products written before the failure
        inserted: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("Document file '{file}' holds product '{id}'")]
    DocumentIdMismatch { file: String, id: String },

    #[error("Failed to parse YAML: {message}")]
    YamlParseError { message: String },

    #[error("Failed to serialize to YAML: {message}")]
    YamlSerializeError { message: String },

    #[error("Failed to parse JSON: {message}")]
    JsonParseError { message: String },

    // ==========================================================================
    // Catch-all
    // ==========================================================================
    #[error("{0}")]
    Other(String),
}

/// Result type alias for catalog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Connection,
    Storage,
}

/// A seed batch item that failed validation
#[derive(Debug)]
pub struct ItemFailure {
    /// Position of the item in the batch
    pub index: usize,
    /// Product name as given, if any
    pub name: Option<String>,
    pub error: ValidationError,
}

/// Outcome of a seed batch that did not fully apply
#[derive(Debug)]
pub struct BatchFailure {
    /// Number of products that were written despite the failure
    pub inserted: usize,
    pub failures: Vec<ItemFailure>,
}

impl fmt::Display for BatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Seed batch failed: {} invalid item(s), {} product(s) inserted",
            self.failures.len(),
            self.inserted
        )?;
        for failure in &self.failures {
            write!(f, "\n  - item {}", failure.index)?;
            if let Some(name) = &failure.name {
                write!(f, " ('{}')", name)?;
            }
            write!(f, ": {}", failure.error)?;
        }
        Ok(())
    }
}

// =============================================================================
// Conversions from external error types
// =============================================================================

impl From<git2::Error> for Error {
    fn from(err: git2::Error) -> Self {
        Error::GitError {
            message: err.message().to_string(),
            source: Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::YamlParseError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::JsonParseError {
            message: err.to_string(),
        }
    }
}

impl From<crate::validation::IdentifierError> for Error {
    fn from(err: crate::validation::IdentifierError) -> Self {
        use crate::validation::IdentifierError;

        match err {
            IdentifierError::InvalidIdentifier(value, reason) => Error::InvalidIdentifier {
                kind: "document id",
                value,
                reason,
            },
            IdentifierError::TooLong(value, _max) => Error::InvalidIdentifier {
                kind: "document id",
                value,
                reason: "exceeds maximum length",
            },
            IdentifierError::Empty => Error::InvalidIdentifier {
                kind: "document id",
                value: String::new(),
                reason: "cannot be empty",
            },
        }
    }
}

// =============================================================================
// Error Display Helpers
// =============================================================================

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) | Error::Batch(_) | Error::InvalidIdentifier { .. } => {
                ErrorKind::Validation
            }
            Error::ProductNotFound { .. }
            | Error::VariantNotFound { .. }
            | Error::VariantIdNotFound { .. } => ErrorKind::NotFound,
            Error::Connection { .. } | Error::ConnectionClosed => ErrorKind::Connection,
            _ => ErrorKind::Storage,
        }
    }

    /// Returns a user-friendly suggestion for fixing the error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Error::Validation(ValidationError::InvalidCategory { .. }) => {
                Some("Use one of: Apparel, Electronics, Footwear, Accessories, Home")
            }
            Error::Batch(_) => Some("Fix the listed items and run the seed again"),
            Error::ProductNotFound { .. } => Some("Check the product name with: mdcatalog list"),
            Error::InvalidIdentifier { .. } => Some("Product ids are UUIDs as shown by: mdcatalog list"),
            Error::Connection { .. } => {
                Some("Check the catalog location (--uri or CATALOG_URI), e.g. file://./data/ecommerce")
            }
            Error::ConnectionClosed => Some("Open a new session with Session::connect"),
            Error::PartialInsert { .. } => {
                Some("Products before the failure were kept; fix the storage problem and seed again")
            }
            _ => None,
        }
    }

    /// Returns true if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Validation | ErrorKind::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::ProductNotFound {
            name: "Winter Jacket".to_string(),
        };
        assert_eq!(err.to_string(), "Product 'Winter Jacket' not found");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.is_recoverable());

        let err = Error::VariantIdNotFound { id: "42".into() };
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_error_suggestion() {
        let err = Error::from(ValidationError::InvalidCategory {
            value: "Toys".into(),
        });
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_connection_errors_are_not_recoverable() {
        assert_eq!(Error::ConnectionClosed.kind(), ErrorKind::Connection);
        assert!(!Error::ConnectionClosed.is_recoverable());
    }

    #[test]
    fn test_partial_insert_reports_count_and_cause() {
        let err = Error::PartialInsert {
            inserted: 2,
            source: Box::new(Error::FileWriteError {
                path: PathBuf::from("collections/products/x.md.tmp"),
                source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            }),
        };
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert!(!err.is_recoverable());

        let message = err.to_string();
        assert!(message.starts_with("Insert stopped after 2 product(s)"));
        assert!(message.contains("disk full"));
        let source = std::error::Error::source(&err).unwrap();
        assert!(source.to_string().contains("x.md.tmp"));
    }

    #[test]
    fn test_batch_failure_lists_items() {
        let err = Error::Batch(BatchFailure {
            inserted: 2,
            failures: vec![ItemFailure {
                index: 2,
                name: Some("Broken".into()),
                error: ValidationError::Negative {
                    field: "variants[0].stock".into(),
                    value: "-1".into(),
                },
            }],
        });
        let message = err.to_string();
        assert!(message.contains("2 product(s) inserted"));
        assert!(message.contains("item 2 ('Broken')"));
        assert!(message.contains("variants[0].stock"));
    }
}
