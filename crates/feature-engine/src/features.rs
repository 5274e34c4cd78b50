//! Feature Vector Assembly

use crate::error::EncodeError;
use crate::Domain;
use serde::Serialize;

/// Fixed-order feature vector for one domain's model.
///
/// The length always equals the domain schema's dimension. Values cannot
/// be modified after construction; transforms produce a new vector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    domain: Domain,
    values: Vec<f64>,
}

impl FeatureVector {
    /// Build a vector, checking its length against the domain schema
    pub fn new(domain: Domain, values: Vec<f64>) -> Result<Self, EncodeError> {
        let expected = domain.dimension();
        if values.len() != expected {
            return Err(EncodeError::InvalidDimension {
                domain: domain.as_str(),
                expected,
                actual: values.len(),
            });
        }
        Ok(Self { domain, values })
    }

    /// Internal constructor for the encoders, which build the exact layout
    pub(crate) fn assembled(domain: Domain, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), domain.dimension());
        Self { domain, values }
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Raw values in schema order
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Look up a value by its feature name (`balance`, `card_type_GOLD`, ...)
    pub fn feature(&self, name: &str) -> Option<f64> {
        self.domain
            .schema()
            .index_of(name)
            .and_then(|idx| self.values.get(idx).copied())
    }
}
