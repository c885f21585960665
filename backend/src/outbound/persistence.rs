//! In-memory record store adapter.
//!
//! Per-collection insertion-ordered maps behind a `parking_lot::RwLock`.
//! Each operation takes the lock once, which gives the per-document
//! atomicity the store contract asks for; there are no multi-document
//! transactions to provide.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::ports::{ListFilter, RecordStore, RecordStoreError, StoredDocument};
use crate::domain::{Collection, DocumentId};

/// Field names the merge must never overwrite.
const IMMUTABLE_FIELDS: [&str; 2] = ["id", "userId"];

#[derive(Default)]
struct CollectionState {
    /// Insertion order of ids; listing follows this.
    order: Vec<String>,
    docs: HashMap<String, Value>,
}

impl CollectionState {
    fn matches(body: &Value, filter: &ListFilter) -> bool {
        match &filter.owner {
            None => true,
            Some(owner) => {
                body.get("userId").and_then(Value::as_str) == Some(owner.as_ref())
            }
        }
    }
}

/// Process-local [`RecordStore`] implementation.
#[derive(Default)]
pub struct MemoryRecordStore {
    collections: RwLock<HashMap<Collection, CollectionState>>,
}

impl MemoryRecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn create(
        &self,
        collection: Collection,
        body: Value,
    ) -> Result<StoredDocument, RecordStoreError> {
        if !body.is_object() {
            return Err(RecordStoreError::corrupt(format!(
                "{collection} document body must be a JSON object"
            )));
        }
        let id = Uuid::new_v4().to_string();
        let mut collections = self.collections.write();
        let state = collections.entry(collection).or_default();
        state.order.push(id.clone());
        state.docs.insert(id.clone(), body.clone());
        Ok(StoredDocument {
            id: DocumentId::new(id),
            body,
        })
    }

    async fn get(
        &self,
        collection: Collection,
        id: &DocumentId,
    ) -> Result<Option<StoredDocument>, RecordStoreError> {
        let collections = self.collections.read();
        let doc = collections
            .get(&collection)
            .and_then(|state| state.docs.get(id.as_ref()))
            .map(|body| StoredDocument {
                id: id.clone(),
                body: body.clone(),
            });
        Ok(doc)
    }

    async fn list(
        &self,
        collection: Collection,
        filter: ListFilter,
    ) -> Result<Vec<StoredDocument>, RecordStoreError> {
        let collections = self.collections.read();
        let Some(state) = collections.get(&collection) else {
            return Ok(Vec::new());
        };
        let docs = state
            .order
            .iter()
            .filter_map(|id| state.docs.get(id).map(|body| (id, body)))
            .filter(|(_, body)| CollectionState::matches(body, &filter))
            .map(|(id, body)| StoredDocument {
                id: DocumentId::new(id.clone()),
                body: body.clone(),
            })
            .collect();
        Ok(docs)
    }

    async fn update(
        &self,
        collection: Collection,
        id: &DocumentId,
        partial: Value,
    ) -> Result<Option<StoredDocument>, RecordStoreError> {
        let Value::Object(partial) = partial else {
            return Err(RecordStoreError::corrupt(format!(
                "{collection} partial document must be a JSON object"
            )));
        };
        let mut collections = self.collections.write();
        let Some(body) = collections
            .get_mut(&collection)
            .and_then(|state| state.docs.get_mut(id.as_ref()))
        else {
            return Ok(None);
        };
        let Some(fields) = body.as_object_mut() else {
            return Err(RecordStoreError::corrupt(format!(
                "stored {collection} document {id} is not a JSON object"
            )));
        };
        for (key, value) in partial {
            if IMMUTABLE_FIELDS.contains(&key.as_str()) {
                continue;
            }
            fields.insert(key, value);
        }
        Ok(Some(StoredDocument {
            id: id.clone(),
            body: body.clone(),
        }))
    }

    async fn delete(
        &self,
        collection: Collection,
        id: &DocumentId,
    ) -> Result<bool, RecordStoreError> {
        let mut collections = self.collections.write();
        let Some(state) = collections.get_mut(&collection) else {
            return Ok(false);
        };
        if state.docs.remove(id.as_ref()).is_none() {
            return Ok(false);
        }
        state.order.retain(|existing| existing != id.as_ref());
        Ok(true)
    }
}
