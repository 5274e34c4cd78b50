//! Feature scaling applied between encoding and inference

use crate::InferenceError;
use feature_engine::FeatureVector;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Fitted transform over a whole feature vector
pub trait Scaler: Send + Sync {
    /// Produce the scaled copy of `features`
    fn transform(&self, features: &FeatureVector) -> Result<FeatureVector, InferenceError>;

    /// Number of columns the scaler was fitted on
    fn dimension(&self) -> usize;
}

/// Serialized standardization parameters (`mean_` / `scale_` of a fitted
/// scikit-learn `StandardScaler`)
#[derive(Debug, Deserialize)]
struct StandardScalerArtifact {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

/// Z-score standardization: `(x - mean) / scale` per column
#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    /// Create a scaler. Zero scales (constant columns) act as 1.
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, InferenceError> {
        if mean.is_empty() || mean.len() != scale.len() {
            return Err(InferenceError::ModelLoadError(format!(
                "scaler has {} means and {} scales",
                mean.len(),
                scale.len()
            )));
        }
        let scale = scale
            .into_iter()
            .map(|s| if s == 0.0 { 1.0 } else { s })
            .collect();
        Ok(Self { mean, scale })
    }

    pub fn from_json(json: &str) -> Result<Self, InferenceError> {
        let artifact: StandardScalerArtifact = serde_json::from_str(json)
            .map_err(|e| InferenceError::ModelLoadError(format!("invalid scaler artifact: {}", e)))?;
        Self::new(artifact.mean, artifact.scale)
    }

    pub fn from_path(path: &Path) -> Result<Self, InferenceError> {
        info!("Loading scaler from {}", path.display());
        let json = std::fs::read_to_string(path)
            .map_err(|e| InferenceError::ModelLoadError(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }
}

impl Scaler for StandardScaler {
    fn transform(&self, features: &FeatureVector) -> Result<FeatureVector, InferenceError> {
        if features.len() != self.mean.len() {
            return Err(InferenceError::InvalidInputShape {
                expected: self.mean.len(),
                actual: features.len(),
            });
        }

        let scaled = features
            .values()
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect();

        FeatureVector::new(features.domain(), scaled).map_err(|_| InferenceError::InvalidInputShape {
            expected: features.domain().dimension(),
            actual: self.mean.len(),
        })
    }

    fn dimension(&self) -> usize {
        self.mean.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_engine::Domain;

    fn bank_vector(fill: f64) -> FeatureVector {
        FeatureVector::new(Domain::Bank, vec![fill; 16]).unwrap()
    }

    #[test]
    fn test_standardization() {
        let scaler = StandardScaler::new(vec![1.0; 16], vec![2.0; 16]).unwrap();
        let scaled = scaler.transform(&bank_vector(5.0)).unwrap();
        assert!(scaled.values().iter().all(|&v| (v - 2.0).abs() < 1e-12));
        assert_eq!(scaled.domain(), Domain::Bank);
    }

    #[test]
    fn test_zero_scale_is_identity_shift() {
        let scaler = StandardScaler::new(vec![0.5; 16], vec![0.0; 16]).unwrap();
        let scaled = scaler.transform(&bank_vector(1.0)).unwrap();
        assert_eq!(scaled.values(), &[0.5; 16]);
    }

    #[test]
    fn test_width_mismatch() {
        let scaler = StandardScaler::new(vec![0.0; 27], vec![1.0; 27]).unwrap();
        assert!(matches!(
            scaler.transform(&bank_vector(1.0)),
            Err(InferenceError::InvalidInputShape { expected: 27, actual: 16 })
        ));
    }

    #[test]
    fn test_from_json() {
        let scaler = StandardScaler::from_json(r#"{"mean": [0.0, 1.0], "scale": [1.0, 4.0]}"#).unwrap();
        assert_eq!(scaler.dimension(), 2);
        assert!(StandardScaler::from_json(r#"{"mean": [0.0], "scale": [1.0, 4.0]}"#).is_err());
    }
}
