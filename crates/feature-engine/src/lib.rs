//! Feature Encoding Engine
//!
//! Converts raw customer attributes into the fixed-order numeric vectors
//! the churn models were trained on.

mod bank;
mod error;
mod features;
mod raw;
mod schema;
mod telecom;

pub use bank::{encode_bank, BankCustomerRecord, BANK_SCHEMA};
pub use error::{EncodeError, UnknownDomain};
pub use features::FeatureVector;
pub use raw::RawRecord;
pub use schema::{one_hot, CategoricalField, FieldKey, Schema, GENDER};
pub use telecom::{encode_telecom, TelecomCustomerRecord, TELECOM_SCHEMA};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Prediction domain, one trained model per variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// Bank-customer churn
    Bank,
    /// Telecom-customer churn
    Telecom,
}

impl Domain {
    /// All supported domains
    pub const ALL: [Domain; 2] = [Domain::Bank, Domain::Telecom];

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Bank => "bank",
            Domain::Telecom => "telecom",
        }
    }

    /// Feature schema the domain's model expects
    pub fn schema(&self) -> &'static Schema {
        match self {
            Domain::Bank => &BANK_SCHEMA,
            Domain::Telecom => &TELECOM_SCHEMA,
        }
    }

    /// Length of the domain's feature vector
    pub fn dimension(&self) -> usize {
        self.schema().dimension()
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = UnknownDomain;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bank" => Ok(Domain::Bank),
            "telecom" => Ok(Domain::Telecom),
            _ => Err(UnknownDomain(s.to_string())),
        }
    }
}

/// Encode a raw record for the given domain
pub fn encode(domain: Domain, record: &RawRecord) -> Result<FeatureVector, EncodeError> {
    match domain {
        Domain::Bank => encode_bank(record),
        Domain::Telecom => encode_telecom(record),
    }
}
