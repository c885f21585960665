//! Domain ports for the hexagonal boundary.
//!
//! Driven ports wrap the external collaborators (identity provider, model
//! runtime, record store, calorie source); driving ports are the use-case
//! traits the inbound adapters call.

mod calorie_lookup;
mod identity_resolver;
mod inference_engine;
mod interactions_query;
mod predict_command;
mod predictions_crud;
mod record_store;

#[cfg(test)]
pub use calorie_lookup::MockCalorieLookup;
pub use calorie_lookup::{CalorieLookup, CalorieLookupError, NoOpCalorieLookup};
#[cfg(test)]
pub use identity_resolver::MockIdentityResolver;
pub use identity_resolver::{
    FIXTURE_USER_ID, FixtureIdentityResolver, IdentityResolver, IdentityResolverError,
};
#[cfg(test)]
pub use inference_engine::MockInferenceEngine;
pub use inference_engine::{
    FixtureInferenceEngine, InferenceEngine, InferenceEngineError, LabelScore,
};
#[cfg(test)]
pub use interactions_query::MockInteractionsQuery;
pub use interactions_query::InteractionsQuery;
#[cfg(test)]
pub use predict_command::MockPredictCommand;
pub use predict_command::PredictCommand;
#[cfg(test)]
pub use predictions_crud::{MockPredictionsCommand, MockPredictionsQuery};
pub use predictions_crud::{PredictionsCommand, PredictionsQuery};
#[cfg(test)]
pub use record_store::MockRecordStore;
pub use record_store::{ListFilter, RecordStore, RecordStoreError, StoredDocument};
