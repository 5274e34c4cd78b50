//! Record Validation
//!
//! Range checking for decoded bank and telecom customer records. These
//! checks sit beside the encoder: a record that fails them still encodes.

mod error;
mod validator;

pub use error::ValidationError;
pub use validator::{Range, ValidationConfig, ValidationResult, Validator};
