//! Per-domain Prediction Pipeline

use crate::classifier::Classifier;
use crate::scaler::Scaler;
use crate::InferenceError;
use feature_engine::{Domain, FeatureVector};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::time::Instant;
use tracing::{debug, info};

/// Churn outcome reported to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChurnLabel {
    #[serde(rename = "Churned")]
    Churned,
    #[serde(rename = "Not Churned")]
    NotChurned,
}

impl ChurnLabel {
    /// Map a model class label; only `1` means churn
    pub fn from_class(class: i64) -> Self {
        if class == 1 {
            ChurnLabel::Churned
        } else {
            ChurnLabel::NotChurned
        }
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ChurnLabel::Churned => "Churned",
            ChurnLabel::NotChurned => "Not Churned",
        }
    }
}

/// Prediction result from inference
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub domain: Domain,
    pub label: ChurnLabel,
    /// Class label as returned by the model
    pub class: i64,
    /// Timestamp when prediction was made
    pub timestamp_ms: u64,
}

/// Result of inference operation
#[derive(Debug, Clone)]
pub struct InferenceResult {
    /// The prediction
    pub prediction: Prediction,
    /// Scaling plus model latency in microseconds
    pub latency_us: u64,
    /// Whether a scaler was applied
    pub scaled: bool,
}

/// Optional scaler followed by a classifier, for one domain
pub struct ChurnPipeline {
    domain: Domain,
    classifier: Box<dyn Classifier>,
    scaler: Option<Box<dyn Scaler>>,
}

impl ChurnPipeline {
    /// Assemble a pipeline, rejecting artifacts fitted on a different width
    pub fn new(
        domain: Domain,
        classifier: Box<dyn Classifier>,
        scaler: Option<Box<dyn Scaler>>,
    ) -> Result<Self, InferenceError> {
        let expected = domain.dimension();

        if let Some(actual) = classifier.input_dimension() {
            if actual != expected {
                return Err(InferenceError::InvalidInputShape { expected, actual });
            }
        }
        if let Some(scaler) = &scaler {
            if scaler.dimension() != expected {
                return Err(InferenceError::InvalidInputShape {
                    expected,
                    actual: scaler.dimension(),
                });
            }
        }

        info!(
            "Pipeline ready for {}: classifier={}, scaled={}",
            domain,
            classifier.name(),
            scaler.is_some()
        );

        Ok(Self {
            domain,
            classifier,
            scaler,
        })
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn is_scaled(&self) -> bool {
        self.scaler.is_some()
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    /// Scale (when a scaler is loaded) and classify one vector
    pub fn predict(&self, features: &FeatureVector) -> Result<InferenceResult, InferenceError> {
        let start = Instant::now();

        if features.domain() != self.domain {
            return Err(InferenceError::DomainMismatch {
                expected: self.domain,
                actual: features.domain(),
            });
        }

        let input: Cow<'_, FeatureVector> = match &self.scaler {
            Some(scaler) => Cow::Owned(scaler.transform(features)?),
            None => Cow::Borrowed(features),
        };

        let class = self.classifier.predict(input.values())?;
        let label = ChurnLabel::from_class(class);

        let latency_us = start.elapsed().as_micros() as u64;
        debug!(
            "{} inference: class={} label={} in {}us",
            self.domain,
            class,
            label.as_str(),
            latency_us
        );

        let timestamp_ms = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        Ok(InferenceResult {
            prediction: Prediction {
                domain: self.domain,
                label,
                class,
                timestamp_ms,
            },
            latency_us,
            scaled: self.scaler.is_some(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::LogisticClassifier;
    use crate::scaler::StandardScaler;

    /// Fires on the telecom `tenure` column only
    fn tenure_model(threshold_tenure: f64) -> Box<dyn Classifier> {
        let mut weights = vec![0.0; 27];
        weights[14] = 1.0;
        Box::new(LogisticClassifier::new(weights, -threshold_tenure, 0.5).unwrap())
    }

    fn telecom_vector(tenure: f64) -> FeatureVector {
        let mut values = vec![0.0; 27];
        values[14] = tenure;
        FeatureVector::new(Domain::Telecom, values).unwrap()
    }

    #[test]
    fn test_unscaled_prediction() {
        let pipeline = ChurnPipeline::new(Domain::Telecom, tenure_model(10.0), None).unwrap();

        let result = pipeline.predict(&telecom_vector(24.0)).unwrap();
        assert_eq!(result.prediction.label, ChurnLabel::Churned);
        assert!(!result.scaled);

        let result = pipeline.predict(&telecom_vector(2.0)).unwrap();
        assert_eq!(result.prediction.label, ChurnLabel::NotChurned);
        assert_eq!(result.prediction.class, 0);
    }

    #[test]
    fn test_scaler_runs_before_model() {
        // Scaling maps tenure 24 to (24 - 30) / 2 = -3, below the model's cut at 0
        let mut mean = vec![0.0; 27];
        mean[14] = 30.0;
        let scaler = StandardScaler::new(mean, vec![2.0; 27]).unwrap();
        let pipeline =
            ChurnPipeline::new(Domain::Telecom, tenure_model(0.0), Some(Box::new(scaler))).unwrap();

        let result = pipeline.predict(&telecom_vector(24.0)).unwrap();
        assert_eq!(result.prediction.label, ChurnLabel::NotChurned);
        assert!(result.scaled);
    }

    #[test]
    fn test_domain_mismatch() {
        let pipeline = ChurnPipeline::new(Domain::Telecom, tenure_model(0.0), None).unwrap();
        let bank = FeatureVector::new(Domain::Bank, vec![0.0; 16]).unwrap();
        assert!(matches!(
            pipeline.predict(&bank),
            Err(InferenceError::DomainMismatch { .. })
        ));
    }

    #[test]
    fn test_artifact_width_checked() {
        assert!(matches!(
            ChurnPipeline::new(Domain::Bank, tenure_model(0.0), None),
            Err(InferenceError::InvalidInputShape { expected: 16, actual: 27 })
        ));

        let scaler = StandardScaler::new(vec![0.0; 16], vec![1.0; 16]).unwrap();
        assert!(ChurnPipeline::new(Domain::Telecom, tenure_model(0.0), Some(Box::new(scaler))).is_err());
    }

    #[test]
    fn test_label_mapping() {
        assert_eq!(ChurnLabel::from_class(1), ChurnLabel::Churned);
        assert_eq!(ChurnLabel::from_class(0), ChurnLabel::NotChurned);
        assert_eq!(ChurnLabel::from_class(2), ChurnLabel::NotChurned);
        assert_eq!(ChurnLabel::NotChurned.as_str(), "Not Churned");
    }
}
