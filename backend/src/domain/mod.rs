//! Domain primitives, entities, and services.
//!
//! Types here are transport agnostic and document their invariants in each
//! type's Rustdoc. Inbound adapters translate them to the wire; outbound
//! adapters implement the ports in [`ports`].

pub mod auth;
pub mod document;
pub mod error;
pub mod interaction;
pub mod interactions;
pub mod ports;
pub mod prediction;
pub mod prediction_crud;
pub mod prediction_pipeline;
pub mod records;
mod service_support;
pub mod upload;
pub mod user;

pub use self::auth::{Credential, CredentialParseError};
pub use self::document::{Collection, DocumentId};
pub use self::error::{Error, ErrorCode};
pub use self::interaction::{Interaction, InteractionDraft};
pub use self::interactions::{InteractionAuditService, InteractionRecorder};
pub use self::prediction::{
    Confidence, ConfidenceError, Prediction, PredictionDraft, PredictionUpdate,
};
pub use self::prediction_crud::PredictionCrudService;
pub use self::prediction_pipeline::PredictionPipelineService;
pub use self::records::{InteractionRecords, PredictionRecords};
pub use self::upload::{ImageUpload, ImageUploadError, MAX_IMAGE_BYTES};
pub use self::user::{UserId, UserIdValidationError};
