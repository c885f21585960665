//! Port for the food-classification model.
//!
//! The model runtime is an external collaborator. It returns raw candidates;
//! selecting one and validating its score is the prediction pipeline's job.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::upload::ImageUpload;

/// One raw classification candidate as reported by the engine.
///
/// `confidence` is unvalidated here: engines have been observed returning
/// scores outside `[0.0, 1.0]`, which the pipeline rejects downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelScore {
    /// Candidate food label.
    pub label: String,
    /// Raw engine score.
    pub confidence: f64,
}

/// Errors raised by inference engine adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferenceEngineError {
    /// The engine could not be reached.
    #[error("inference engine unavailable: {message}")]
    Unavailable {
        /// Adapter-supplied context.
        message: String,
    },
    /// The engine answered but classification failed.
    #[error("inference failed: {message}")]
    Failed {
        /// Adapter-supplied context.
        message: String,
    },
}

impl InferenceEngineError {
    /// Convenience constructor for [`InferenceEngineError::Unavailable`].
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Convenience constructor for [`InferenceEngineError::Failed`].
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}

/// Port for image classification.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InferenceEngine: Send + Sync {
    /// Classify a validated image into ranked label candidates.
    async fn classify(&self, image: &ImageUpload)
        -> Result<Vec<LabelScore>, InferenceEngineError>;
}

/// Fixture engine returning a canned candidate list.
///
/// Used for tests and for wiring the service without a model endpoint.
#[derive(Debug, Clone)]
pub struct FixtureInferenceEngine {
    candidates: Vec<LabelScore>,
}

impl FixtureInferenceEngine {
    /// Fixture answering with the given candidates for every image.
    pub fn with_candidates(candidates: Vec<LabelScore>) -> Self {
        Self { candidates }
    }
}

impl Default for FixtureInferenceEngine {
    fn default() -> Self {
        Self::with_candidates(vec![LabelScore {
            label: "pizza".to_owned(),
            confidence: 0.875,
        }])
    }
}

#[async_trait]
impl InferenceEngine for FixtureInferenceEngine {
    async fn classify(
        &self,
        _image: &ImageUpload,
    ) -> Result<Vec<LabelScore>, InferenceEngineError> {
        Ok(self.candidates.clone())
    }
}
