//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on driving ports and remain testable without real adapters.

use std::sync::Arc;

use crate::domain::ports::{
    InteractionsQuery, PredictCommand, PredictionsCommand, PredictionsQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Predict-and-record pipeline.
    pub predict: Arc<dyn PredictCommand>,
    /// Stored-prediction listing.
    pub predictions_query: Arc<dyn PredictionsQuery>,
    /// Stored-prediction mutation.
    pub predictions_command: Arc<dyn PredictionsCommand>,
    /// Audit history listing.
    pub interactions: Arc<dyn InteractionsQuery>,
}

impl HttpState {
    /// Bundle the driving-port handles handlers need.
    pub fn new(
        predict: Arc<dyn PredictCommand>,
        predictions_query: Arc<dyn PredictionsQuery>,
        predictions_command: Arc<dyn PredictionsCommand>,
        interactions: Arc<dyn InteractionsQuery>,
    ) -> Self {
        Self {
            predict,
            predictions_query,
            predictions_command,
            interactions,
        }
    }
}
