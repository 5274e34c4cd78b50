//! Churn Inference Engine
//!
//! Loads per-domain classifiers and scalers once at startup and runs
//! encoded feature vectors through them.

mod classifier;
mod engine;
mod onnx;
mod registry;
mod scaler;

pub use classifier::{load_classifier, Classifier, LogisticClassifier};
pub use engine::{ChurnLabel, ChurnPipeline, InferenceResult, Prediction};
pub use onnx::OnnxClassifier;
pub use registry::{ArtifactPaths, PipelineSet};
pub use scaler::{Scaler, StandardScaler};

use feature_engine::Domain;
use thiserror::Error;

/// Errors during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Model load failed: {0}")]
    ModelLoadError(String),
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Invalid input shape: expected {expected}, got {actual}")]
    InvalidInputShape { expected: usize, actual: usize },
    #[error("Feature vector for {actual} sent to the {expected} model")]
    DomainMismatch { expected: Domain, actual: Domain },
    #[error("No model loaded for {0}")]
    ModelUnavailable(Domain),
}
