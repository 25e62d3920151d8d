//! Input validation for document identifiers
//!
//! Product ids become file names, so ids supplied by callers are checked
//! before they touch the filesystem to rule out path traversal.

use thiserror::Error;

/// Identifier validation errors
#[derive(Debug, Error)]
pub enum IdentifierError {
    #[error("Invalid identifier '{0}': {1}")]
    InvalidIdentifier(String, &'static str),

    #[error("Identifier '{0}' is too long (max {1} characters)")]
    TooLong(String, usize),

    #[error("Identifier cannot be empty")]
    Empty,
}

/// Maximum length for identifiers
pub const MAX_IDENTIFIER_LENGTH: usize = 255;

/// Validate a document id
///
/// Rules:
/// - Must be 1-255 characters
/// - Only alphanumeric and hyphen allowed
/// - Cannot start with a hyphen
pub fn validate_document_id(id: &str) -> Result<(), IdentifierError> {
    if id.is_empty() {
        return Err(IdentifierError::Empty);
    }

    if id.len() > MAX_IDENTIFIER_LENGTH {
        return Err(IdentifierError::TooLong(id.to_string(), MAX_IDENTIFIER_LENGTH));
    }

    for (i, c) in id.chars().enumerate() {
        if !c.is_ascii_alphanumeric() && c != '-' {
            return Err(IdentifierError::InvalidIdentifier(
                id.to_string(),
                "contains invalid characters (only alphanumeric and hyphen allowed)",
            ));
        }
        if i == 0 && c == '-' {
            return Err(IdentifierError::InvalidIdentifier(
                id.to_string(),
                "cannot start with a hyphen",
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identifiers() {
        assert!(validate_document_id("5d0c1f9e-6c4b-4b8e-9a51-0e7c2f1d3a10").is_ok());
        assert!(validate_document_id("a").is_ok());
    }

    #[test]
    fn test_path_traversal_blocked() {
        assert!(validate_document_id("..").is_err());
        assert!(validate_document_id("../secret").is_err());
        assert!(validate_document_id("foo/bar").is_err());
        assert!(validate_document_id("foo\\bar").is_err());
        assert!(validate_document_id("../../../etc/passwd").is_err());
    }

    #[test]
    fn test_invalid_characters() {
        assert!(validate_document_id("foo bar").is_err());
        assert!(validate_document_id("foo.md").is_err());
        assert!(validate_document_id("foo_bar").is_err());
        assert!(validate_document_id("-foo").is_err());
    }

    #[test]
    fn test_empty_and_too_long() {
        assert!(matches!(validate_document_id(""), Err(IdentifierError::Empty)));
        let long_id = "a".repeat(256);
        assert!(matches!(
            validate_document_id(&long_id),
            Err(IdentifierError::TooLong(_, 255))
        ));
    }
}
