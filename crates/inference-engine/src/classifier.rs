//! Classifier capability and the JSON logistic model

use crate::onnx::OnnxClassifier;
use crate::InferenceError;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Binary classifier over a fixed-width feature slice
pub trait Classifier: Send + Sync {
    /// Predict the class label for one feature row
    fn predict(&self, features: &[f64]) -> Result<i64, InferenceError>;

    /// Expected input width, when the artifact declares one
    fn input_dimension(&self) -> Option<usize>;

    /// Short description for logs and health output
    fn name(&self) -> &str;
}

fn default_threshold() -> f64 {
    0.5
}

/// Serialized logistic-regression artifact
#[derive(Debug, Deserialize)]
struct LogisticArtifact {
    coefficients: Vec<f64>,
    intercept: f64,
    #[serde(default = "default_threshold")]
    threshold: f64,
}

/// Logistic regression: label 1 when `sigmoid(w·x + b) >= threshold`
#[derive(Debug, Clone)]
pub struct LogisticClassifier {
    coefficients: Vec<f64>,
    intercept: f64,
    threshold: f64,
}

impl LogisticClassifier {
    pub fn new(coefficients: Vec<f64>, intercept: f64, threshold: f64) -> Result<Self, InferenceError> {
        if coefficients.is_empty() {
            return Err(InferenceError::ModelLoadError(
                "logistic model has no coefficients".to_string(),
            ));
        }
        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(InferenceError::ModelLoadError(format!(
                "decision threshold {} outside (0, 1)",
                threshold
            )));
        }
        Ok(Self {
            coefficients,
            intercept,
            threshold,
        })
    }

    /// Parse a `{"coefficients": [..], "intercept": .., "threshold": ..}` document
    pub fn from_json(json: &str) -> Result<Self, InferenceError> {
        let artifact: LogisticArtifact = serde_json::from_str(json)
            .map_err(|e| InferenceError::ModelLoadError(format!("invalid logistic artifact: {}", e)))?;
        Self::new(artifact.coefficients, artifact.intercept, artifact.threshold)
    }

    pub fn from_path(path: &Path) -> Result<Self, InferenceError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| InferenceError::ModelLoadError(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Positive-class probability
    pub fn probability(&self, features: &[f64]) -> Result<f64, InferenceError> {
        if features.len() != self.coefficients.len() {
            return Err(InferenceError::InvalidInputShape {
                expected: self.coefficients.len(),
                actual: features.len(),
            });
        }
        let z: f64 = self
            .coefficients
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept;
        Ok(1.0 / (1.0 + (-z).exp()))
    }
}

impl Classifier for LogisticClassifier {
    fn predict(&self, features: &[f64]) -> Result<i64, InferenceError> {
        let p = self.probability(features)?;
        Ok(if p >= self.threshold { 1 } else { 0 })
    }

    fn input_dimension(&self) -> Option<usize> {
        Some(self.coefficients.len())
    }

    fn name(&self) -> &str {
        "logistic"
    }
}

/// Load a classifier artifact, choosing the runtime by file extension
/// (`.onnx` or `.json`)
pub fn load_classifier(path: &Path, dimension: usize) -> Result<Box<dyn Classifier>, InferenceError> {
    info!("Loading classifier from {}", path.display());

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("onnx") => Ok(Box::new(OnnxClassifier::load(path, dimension)?)),
        Some("json") => Ok(Box::new(LogisticClassifier::from_path(path)?)),
        _ => Err(InferenceError::ModelLoadError(format!(
            "unsupported model format: {}",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logistic_threshold() {
        let model = LogisticClassifier::new(vec![1.0, -1.0], 0.0, 0.5).unwrap();
        assert_eq!(model.predict(&[2.0, 0.0]).unwrap(), 1);
        assert_eq!(model.predict(&[0.0, 2.0]).unwrap(), 0);
        // sigmoid(0) == 0.5 sits on the threshold
        assert_eq!(model.predict(&[1.0, 1.0]).unwrap(), 1);
    }

    #[test]
    fn test_logistic_from_json() {
        let model = LogisticClassifier::from_json(r#"{"coefficients": [0.5, 0.25], "intercept": -1.0}"#).unwrap();
        assert_eq!(model.input_dimension(), Some(2));
        let p = model.probability(&[2.0, 0.0]).unwrap();
        assert!((p - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_logistic_rejects_bad_artifacts() {
        assert!(LogisticClassifier::from_json(r#"{"coefficients": [], "intercept": 0.0}"#).is_err());
        assert!(LogisticClassifier::from_json(r#"{"coefficients": [1.0], "intercept": 0.0, "threshold": 1.5}"#).is_err());
        assert!(LogisticClassifier::from_json("not json").is_err());
    }

    #[test]
    fn test_logistic_shape_check() {
        let model = LogisticClassifier::new(vec![1.0; 3], 0.0, 0.5).unwrap();
        assert!(matches!(
            model.predict(&[1.0; 4]),
            Err(InferenceError::InvalidInputShape { expected: 3, actual: 4 })
        ));
    }

    #[test]
    fn test_unsupported_extension() {
        let result = load_classifier(Path::new("models/bank.pkl"), 16);
        assert!(matches!(result, Err(InferenceError::ModelLoadError(_))));
    }
}
