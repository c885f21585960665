//! Port for the per-collection JSON document store.
//!
//! The store is an external collaborator: the core only requires the generic
//! operations below plus per-document atomicity. No multi-document
//! transactions are assumed anywhere.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::document::{Collection, DocumentId};
use crate::domain::user::UserId;

/// Errors raised by record store adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordStoreError {
    /// The store could not be reached or refused the operation.
    #[error("record store unavailable: {message}")]
    Unavailable {
        /// Adapter-supplied context.
        message: String,
    },
    /// A stored document or a supplied partial was not usable.
    #[error("record store document corrupt: {message}")]
    Corrupt {
        /// Adapter-supplied context.
        message: String,
    },
}

impl RecordStoreError {
    /// Convenience constructor for [`RecordStoreError::Unavailable`].
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Convenience constructor for [`RecordStoreError::Corrupt`].
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::Corrupt {
            message: message.into(),
        }
    }
}

/// A persisted document together with its store-assigned id.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    /// Store-assigned identifier.
    pub id: DocumentId,
    /// The document body as the store holds it.
    pub body: Value,
}

/// Listing filter; the store only needs equality on the owning user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// When set, only documents whose `userId` field equals this value.
    pub owner: Option<UserId>,
}

impl ListFilter {
    /// Match every document in the collection.
    pub fn all() -> Self {
        Self::default()
    }

    /// Match documents owned by the given user.
    pub fn owned_by(owner: UserId) -> Self {
        Self { owner: Some(owner) }
    }
}

/// Port for per-collection document persistence.
///
/// Listing order is the store's insertion order; callers that need a
/// different order sort on their side.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist a new document and return it with its assigned id.
    ///
    /// No field of `body` may be silently dropped.
    async fn create(
        &self,
        collection: Collection,
        body: Value,
    ) -> Result<StoredDocument, RecordStoreError>;

    /// Fetch a document by id.
    async fn get(
        &self,
        collection: Collection,
        id: &DocumentId,
    ) -> Result<Option<StoredDocument>, RecordStoreError>;

    /// List documents matching the filter, in insertion order.
    async fn list(
        &self,
        collection: Collection,
        filter: ListFilter,
    ) -> Result<Vec<StoredDocument>, RecordStoreError>;

    /// Merge the supplied fields into an existing document.
    ///
    /// Only supplied fields change; the immutable `id` and `userId` keys are
    /// stripped from `partial` before merging even when present. Returns
    /// `None` when the document does not exist.
    async fn update(
        &self,
        collection: Collection,
        id: &DocumentId,
        partial: Value,
    ) -> Result<Option<StoredDocument>, RecordStoreError>;

    /// Delete a document.
    ///
    /// Returns `true` when a document was deleted and `false` when the id
    /// was already absent.
    async fn delete(
        &self,
        collection: Collection,
        id: &DocumentId,
    ) -> Result<bool, RecordStoreError>;
}
