//! Domain error types

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The referenced entity does not exist in the store
    #[error("Unknown id: {0}")]
    UnknownId(String),

    /// A reorder index was out of bounds
    #[error("Index out of bounds: {index} (len {len})")]
    IndexOutOfBounds {
        /// The offending index
        index: usize,
        /// The length of the sequence
        len: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DomainError::UnknownId("abc".to_string());
        assert_eq!(err.to_string(), "Unknown id: abc");

        let err = DomainError::IndexOutOfBounds { index: 5, len: 3 };
        assert_eq!(err.to_string(), "Index out of bounds: 5 (len 3)");
    }
}
