//! Typed collection views over the record store port.
//!
//! The store deals in opaque JSON documents; these views convert to and from
//! the entity types right at that boundary so no untyped map ever travels
//! through the business services.

use std::sync::Arc;

use serde_json::Value;

use crate::domain::document::{Collection, DocumentId};
use crate::domain::error::Error;
use crate::domain::interaction::{Interaction, InteractionDraft};
use crate::domain::prediction::{Prediction, PredictionDraft, PredictionUpdate};
use crate::domain::ports::{ListFilter, RecordStore, RecordStoreError, StoredDocument};
use crate::domain::user::UserId;

pub(crate) fn map_store_error(error: RecordStoreError) -> Error {
    match error {
        RecordStoreError::Unavailable { message } => {
            Error::service_unavailable(format!("record store unavailable: {message}"))
        }
        RecordStoreError::Corrupt { message } => {
            Error::internal(format!("record store document corrupt: {message}"))
        }
    }
}

fn to_body<T: serde::Serialize>(value: &T) -> Result<Value, Error> {
    serde_json::to_value(value)
        .map_err(|err| Error::internal(format!("failed to serialize document body: {err}")))
}

fn from_body<T: serde::de::DeserializeOwned>(collection: Collection, body: Value) -> Result<T, Error> {
    serde_json::from_value(body).map_err(|err| {
        Error::internal(format!("corrupt document in {collection} collection: {err}"))
    })
}

/// Typed view over the `predictions` collection.
#[derive(Debug)]
pub struct PredictionRecords<S> {
    store: Arc<S>,
}

impl<S> Clone for PredictionRecords<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: RecordStore> PredictionRecords<S> {
    /// Create a view over the given store handle.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    fn to_entity(doc: StoredDocument) -> Result<Prediction, Error> {
        let body: PredictionDraft = from_body(Collection::Predictions, doc.body)?;
        Ok(Prediction::from_parts(doc.id, body))
    }

    /// Persist a new prediction and return it with its assigned id.
    pub async fn create(&self, draft: &PredictionDraft) -> Result<Prediction, Error> {
        let doc = self
            .store
            .create(Collection::Predictions, to_body(draft)?)
            .await
            .map_err(map_store_error)?;
        Self::to_entity(doc)
    }

    /// Fetch a prediction by id.
    pub async fn find(&self, id: &DocumentId) -> Result<Option<Prediction>, Error> {
        let doc = self
            .store
            .get(Collection::Predictions, id)
            .await
            .map_err(map_store_error)?;
        doc.map(Self::to_entity).transpose()
    }

    /// The given user's predictions, insertion order.
    pub async fn list_owned_by(&self, owner: &UserId) -> Result<Vec<Prediction>, Error> {
        let docs = self
            .store
            .list(Collection::Predictions, ListFilter::owned_by(owner.clone()))
            .await
            .map_err(map_store_error)?;
        docs.into_iter().map(Self::to_entity).collect()
    }

    /// Merge whitelisted field changes into an existing prediction.
    ///
    /// Returns `None` when the document vanished before the merge.
    pub async fn apply_update(
        &self,
        id: &DocumentId,
        changes: &PredictionUpdate,
    ) -> Result<Option<Prediction>, Error> {
        let doc = self
            .store
            .update(Collection::Predictions, id, to_body(changes)?)
            .await
            .map_err(map_store_error)?;
        doc.map(Self::to_entity).transpose()
    }

    /// Delete a prediction; `false` when the id was already absent.
    pub async fn remove(&self, id: &DocumentId) -> Result<bool, Error> {
        self.store
            .delete(Collection::Predictions, id)
            .await
            .map_err(map_store_error)
    }
}

/// Typed view over the append-only `interactions` collection.
///
/// No update or delete is exposed here on purpose.
#[derive(Debug)]
pub struct InteractionRecords<S> {
    store: Arc<S>,
}

impl<S> Clone for InteractionRecords<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: RecordStore> InteractionRecords<S> {
    /// Create a view over the given store handle.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    fn to_entity(doc: StoredDocument) -> Result<Interaction, Error> {
        let body: InteractionDraft = from_body(Collection::Interactions, doc.body)?;
        Ok(Interaction::from_parts(doc.id, body))
    }

    /// Append an audit entry.
    pub async fn append(&self, draft: &InteractionDraft) -> Result<Interaction, Error> {
        let doc = self
            .store
            .create(Collection::Interactions, to_body(draft)?)
            .await
            .map_err(map_store_error)?;
        Self::to_entity(doc)
    }

    /// The given user's audit entries, insertion order.
    pub async fn list_for_user(&self, owner: &UserId) -> Result<Vec<Interaction>, Error> {
        let docs = self
            .store
            .list(
                Collection::Interactions,
                ListFilter::owned_by(owner.clone()),
            )
            .await
            .map_err(map_store_error)?;
        docs.into_iter().map(Self::to_entity).collect()
    }
}
