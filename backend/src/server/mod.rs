//! Server wiring: adapter selection and HTTP state assembly.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use backend::domain::ports::{
    CalorieLookup, FixtureInferenceEngine, IdentityResolver, InferenceEngine, InteractionsQuery,
    PredictCommand, PredictionsCommand, PredictionsQuery,
};
use backend::domain::{
    InteractionAuditService, InteractionRecorder, InteractionRecords, PredictionCrudService,
    PredictionPipelineService, PredictionRecords,
};
use backend::inbound::http::state::HttpState;
use backend::outbound::{
    HttpIdentityResolver, HttpInferenceEngine, MemoryRecordStore, StaticIdentityResolver,
    TableCalorieLookup,
};

/// Pick the identity resolver implied by the configuration.
///
/// A verifier endpoint wins; otherwise the static token map is used, and an
/// empty map (which rejects everything) gets a loud warning.
fn build_identity_resolver(config: &ServerConfig) -> std::io::Result<Arc<dyn IdentityResolver>> {
    if let Some(endpoint) = &config.verifier_endpoint {
        info!(endpoint = %endpoint, "using HTTP token verifier");
        let resolver = HttpIdentityResolver::new(endpoint.clone(), config.verifier_timeout)
            .map_err(|e| std::io::Error::other(format!("verifier client setup failed: {e}")))?;
        return Ok(Arc::new(resolver));
    }
    if config.static_tokens.is_empty() {
        warn!("no TOKEN_VERIFIER_ENDPOINT and no AUTH_TOKENS; every request will be rejected");
    }
    Ok(Arc::new(StaticIdentityResolver::from_pairs(
        config.static_tokens.clone(),
    )))
}

fn build_inference_engine(config: &ServerConfig) -> std::io::Result<Arc<dyn InferenceEngine>> {
    match &config.model_endpoint {
        Some(endpoint) => {
            info!(endpoint = %endpoint, "using HTTP model server");
            let engine = HttpInferenceEngine::new(endpoint.clone(), config.model_timeout)
                .map_err(|e| std::io::Error::other(format!("model client setup failed: {e}")))?;
            Ok(Arc::new(engine))
        }
        None => {
            warn!("no MODEL_ENDPOINT configured; using the fixture engine");
            Ok(Arc::new(FixtureInferenceEngine::default()))
        }
    }
}

/// Wire adapters and services into the handler state bundle.
pub fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let resolver = build_identity_resolver(config)?;
    let engine = build_inference_engine(config)?;
    let calories: Arc<dyn CalorieLookup> = Arc::new(TableCalorieLookup::default());
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let store = Arc::new(MemoryRecordStore::new());
    let predictions = PredictionRecords::new(Arc::clone(&store));
    let interactions = InteractionRecords::new(Arc::clone(&store));
    let recorder = InteractionRecorder::new(interactions.clone(), Arc::clone(&clock));

    let pipeline: Arc<dyn PredictCommand> = Arc::new(PredictionPipelineService::new(
        Arc::clone(&resolver),
        engine,
        calories,
        predictions.clone(),
        recorder.clone(),
        Arc::clone(&clock),
    ));
    let crud = Arc::new(PredictionCrudService::new(
        Arc::clone(&resolver),
        predictions,
        recorder.clone(),
    ));
    let crud_query: Arc<dyn PredictionsQuery> = Arc::clone(&crud) as Arc<dyn PredictionsQuery>;
    let crud_command: Arc<dyn PredictionsCommand> = crud;
    let audit: Arc<dyn InteractionsQuery> = Arc::new(InteractionAuditService::new(
        resolver,
        interactions,
        recorder,
    ));

    Ok(HttpState::new(pipeline, crud_query, crud_command, audit))
}
