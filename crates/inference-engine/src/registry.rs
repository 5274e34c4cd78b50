//! Startup-time model registry

use crate::classifier::load_classifier;
use crate::engine::{ChurnPipeline, InferenceResult};
use crate::scaler::{Scaler, StandardScaler};
use crate::InferenceError;
use feature_engine::{Domain, FeatureVector};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

/// Artifact locations for one domain
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtifactPaths {
    /// Classifier artifact (`.onnx` or `.json`); the domain is disabled when unset
    pub model: Option<PathBuf>,
    /// Optional standard-scaler artifact (`.json`)
    pub scaler: Option<PathBuf>,
}

/// Pipelines for every configured domain.
///
/// Built once at process start and read concurrently afterwards.
#[derive(Default)]
pub struct PipelineSet {
    bank: Option<ChurnPipeline>,
    telecom: Option<ChurnPipeline>,
}

impl PipelineSet {
    /// Set with no domains available
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the configured artifacts. Any configured artifact that fails to
    /// load aborts the whole load.
    pub fn load(bank: &ArtifactPaths, telecom: &ArtifactPaths) -> Result<Self, InferenceError> {
        let mut set = Self::empty();
        for (domain, paths) in [(Domain::Bank, bank), (Domain::Telecom, telecom)] {
            if let Some(pipeline) = Self::load_domain(domain, paths)? {
                set = set.with_pipeline(pipeline);
            }
        }
        Ok(set)
    }

    fn load_domain(domain: Domain, paths: &ArtifactPaths) -> Result<Option<ChurnPipeline>, InferenceError> {
        let Some(model_path) = &paths.model else {
            if paths.scaler.is_some() {
                warn!("Scaler configured for {} without a model; ignoring it", domain);
            }
            warn!("No model configured for {}; predictions will be unavailable", domain);
            return Ok(None);
        };

        let classifier = load_classifier(model_path, domain.dimension())?;
        let scaler = match &paths.scaler {
            Some(path) => Some(Box::new(StandardScaler::from_path(path)?) as Box<dyn Scaler>),
            None => {
                info!("No scaler configured for {}; using raw features", domain);
                None
            }
        };

        ChurnPipeline::new(domain, classifier, scaler).map(Some)
    }

    /// Register (or replace) the pipeline for its domain
    pub fn with_pipeline(mut self, pipeline: ChurnPipeline) -> Self {
        match pipeline.domain() {
            Domain::Bank => self.bank = Some(pipeline),
            Domain::Telecom => self.telecom = Some(pipeline),
        }
        self
    }

    /// Pipeline for a domain
    pub fn get(&self, domain: Domain) -> Result<&ChurnPipeline, InferenceError> {
        let slot = match domain {
            Domain::Bank => &self.bank,
            Domain::Telecom => &self.telecom,
        };
        slot.as_ref().ok_or(InferenceError::ModelUnavailable(domain))
    }

    pub fn is_available(&self, domain: Domain) -> bool {
        self.get(domain).is_ok()
    }

    /// Route a vector to its domain's pipeline
    pub fn predict(&self, features: &FeatureVector) -> Result<InferenceResult, InferenceError> {
        self.get(features.domain())?.predict(features)
    }
}
