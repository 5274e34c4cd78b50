//! ONNX classifier backed by tract

use crate::classifier::Classifier;
use crate::InferenceError;
use std::path::Path;
use tracing::{debug, info};
use tract_onnx::prelude::*;

type OnnxPlan = TypedRunnableModel<TypedModel>;

/// Classifier exported to ONNX (e.g. via sklearn-onnx), run with tract.
///
/// The model takes one `f32 [1, dimension]` input. The first output is
/// read as an `int64` label tensor; a float output is read as class
/// scores (argmax) or, when it holds a single value, as the positive-class
/// probability.
pub struct OnnxClassifier {
    plan: OnnxPlan,
    dimension: usize,
    name: String,
}

impl OnnxClassifier {
    /// Load and optimize the model for a fixed input width
    pub fn load(path: &Path, dimension: usize) -> Result<Self, InferenceError> {
        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| model.with_input_fact(0, f32::fact([1, dimension]).into()))
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| InferenceError::ModelLoadError(format!("{}: {}", path.display(), e)))?;

        info!("ONNX model loaded: {} (input width {})", path.display(), dimension);

        Ok(Self {
            plan,
            dimension,
            name: format!("onnx:{}", path.display()),
        })
    }

    fn read_label(output: &Tensor) -> Result<i64, InferenceError> {
        if let Ok(labels) = output.to_array_view::<i64>() {
            return labels
                .iter()
                .next()
                .copied()
                .ok_or_else(|| InferenceError::InferenceFailed("empty label tensor".to_string()));
        }

        let scores = output
            .to_array_view::<f32>()
            .map_err(|e| InferenceError::InferenceFailed(format!("unsupported output tensor: {}", e)))?;
        let scores: Vec<f32> = scores.iter().copied().collect();

        match scores.as_slice() {
            [] => Err(InferenceError::InferenceFailed("empty score tensor".to_string())),
            [p] => Ok(if *p >= 0.5 { 1 } else { 0 }),
            many => Ok(many
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.total_cmp(b.1))
                .map(|(idx, _)| idx as i64)
                .unwrap_or(0)),
        }
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, features: &[f64]) -> Result<i64, InferenceError> {
        if features.len() != self.dimension {
            return Err(InferenceError::InvalidInputShape {
                expected: self.dimension,
                actual: features.len(),
            });
        }

        let row: Vec<f32> = features.iter().map(|&v| v as f32).collect();
        let input: Tensor = tract_ndarray::Array2::from_shape_vec((1, self.dimension), row)
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?
            .into();

        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;
        let first = outputs
            .first()
            .ok_or_else(|| InferenceError::InferenceFailed("model produced no outputs".to_string()))?;

        let label = Self::read_label(first)?;
        debug!("ONNX label: {}", label);
        Ok(label)
    }

    fn input_dimension(&self) -> Option<usize> {
        Some(self.dimension)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
