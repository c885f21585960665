//! Reqwest-backed inference engine adapter.
//!
//! Owns transport details only: posting the image bytes, timeout and HTTP
//! error mapping, and JSON decoding into the port's candidate type. Score
//! validation stays in the pipeline.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url, header};
use serde::Deserialize;

use crate::domain::ImageUpload;
use crate::domain::ports::{InferenceEngine, InferenceEngineError, LabelScore};

/// Wire shape answered by the model server.
#[derive(Debug, Deserialize)]
struct InferenceResponseDto {
    predictions: Vec<CandidateDto>,
}

#[derive(Debug, Deserialize)]
struct CandidateDto {
    label: String,
    confidence: f64,
}

impl From<CandidateDto> for LabelScore {
    fn from(dto: CandidateDto) -> Self {
        Self {
            label: dto.label,
            confidence: dto.confidence,
        }
    }
}

/// Engine adapter that posts image bytes to one model-server endpoint.
pub struct HttpInferenceEngine {
    client: Client,
    endpoint: Url,
}

impl HttpInferenceEngine {
    /// Build an adapter with an explicit request timeout.
    ///
    /// Model inference is the slow call of the whole pipeline, so the
    /// timeout is the caller's to choose.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl InferenceEngine for HttpInferenceEngine {
    async fn classify(
        &self,
        image: &ImageUpload,
    ) -> Result<Vec<LabelScore>, InferenceEngineError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .header(header::ACCEPT, "application/json")
            .body(image.bytes().to_vec())
            .send()
            .await
            .map_err(|err| InferenceEngineError::unavailable(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(InferenceEngineError::failed(format!(
                "model server answered {status}"
            )));
        }

        let body: InferenceResponseDto = response
            .json()
            .await
            .map_err(|err| InferenceEngineError::failed(format!("unparseable answer: {err}")))?;
        Ok(body.predictions.into_iter().map(LabelScore::from).collect())
    }
}
