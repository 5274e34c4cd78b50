//! Encoding Error Types

use thiserror::Error;

/// Errors raised while turning a raw record into a feature vector
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    /// Required attribute key absent from the record
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Attribute present but not convertible to its numeric type
    #[error("Field {field} has a non-numeric value: {value}")]
    TypeConversion { field: &'static str, value: String },

    /// Vector length does not match the domain schema
    #[error("Invalid feature dimension for {domain}: expected {expected}, got {actual}")]
    InvalidDimension {
        domain: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Unrecognized `model_type`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid model type: {0:?}")]
pub struct UnknownDomain(pub String);
