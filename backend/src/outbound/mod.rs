//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.
//!
//! - **persistence**: in-memory record store
//! - **identity**: static-map and HTTP-verifier credential resolvers
//! - **inference**: HTTP model-server client
//! - **calories**: static enrichment table

pub mod calories;
pub mod identity;
pub mod inference;
pub mod persistence;

pub use calories::TableCalorieLookup;
pub use identity::{HttpIdentityResolver, StaticIdentityResolver};
pub use inference::HttpInferenceEngine;
pub use persistence::MemoryRecordStore;
