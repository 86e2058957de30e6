//! Validation error types

/// Validation error for path inputs
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Input doesn't match the required format
    #[error("Invalid {field} format. Use {expected}.")]
    InvalidFormat {
        field: &'static str,
        expected: &'static str,
    },
}
