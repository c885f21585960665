//! Driving ports for stored-prediction CRUD.

use async_trait::async_trait;

use crate::domain::auth::Credential;
use crate::domain::document::DocumentId;
use crate::domain::error::Error;
use crate::domain::prediction::{Prediction, PredictionUpdate};

/// Read side of the stored-prediction surface.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PredictionsQuery: Send + Sync {
    /// The caller's predictions, insertion order, empty when none exist.
    async fn list(&self, credential: &Credential) -> Result<Vec<Prediction>, Error>;
}

/// Mutating side of the stored-prediction surface.
///
/// Both operations authenticate first and compare the document's owner
/// against the resolved identity strictly before any mutating store call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PredictionsCommand: Send + Sync {
    /// Apply whitelisted field changes to an owned prediction.
    ///
    /// # Errors
    ///
    /// `not_found` when the id is absent, `forbidden` when the document
    /// belongs to someone else (without revealing anything further).
    async fn update(
        &self,
        credential: &Credential,
        id: &DocumentId,
        changes: PredictionUpdate,
    ) -> Result<Prediction, Error>;

    /// Delete an owned prediction.
    ///
    /// A second delete of the same id yields `not_found`, never a second
    /// success.
    async fn delete(&self, credential: &Credential, id: &DocumentId) -> Result<(), Error>;
}
