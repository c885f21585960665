//! Driving port for the predict-and-record pipeline.

use async_trait::async_trait;

use crate::domain::auth::Credential;
use crate::domain::error::Error;
use crate::domain::prediction::Prediction;

/// Use-case trait implemented by the prediction pipeline service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PredictCommand: Send + Sync {
    /// Authenticate, classify the uploaded image, persist the result, and
    /// append an audit interaction.
    ///
    /// # Errors
    ///
    /// - `unauthorized` when the credential does not resolve; nothing else
    ///   runs in that case.
    /// - `invalid_request` when the bytes are empty, oversized, or do not
    ///   decode as a raster image.
    /// - `inference_failed` when the engine errors, returns no candidate, or
    ///   reports a non-finite or out-of-range confidence. No document is
    ///   persisted on any of these paths.
    async fn predict(
        &self,
        credential: &Credential,
        image_bytes: Vec<u8>,
        filename: &str,
    ) -> Result<Prediction, Error>;
}
