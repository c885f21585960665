//! Interaction audit entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::document::DocumentId;
use crate::domain::user::UserId;

/// Append-only audit record, one per serviced request.
///
/// ## Invariants
/// - Never updated or deleted; the store exposes no mutation for this
///   collection through the typed views.
/// - `timestamp` is set once, at recording time.
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    /// Store-assigned identifier.
    pub id: DocumentId,
    /// Resolved caller, absent when identity resolution failed.
    pub user_id: Option<UserId>,
    /// Logical name of the invoked operation, e.g. `/predict`.
    pub endpoint: String,
    /// Method of the invoked operation, e.g. `POST`.
    pub method: String,
    /// Recording time (UTC).
    pub timestamp: DateTime<Utc>,
}

/// Document body of an interaction as persisted in the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionDraft {
    /// Resolved caller, omitted from the document when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    /// Logical name of the invoked operation.
    pub endpoint: String,
    /// Method of the invoked operation.
    pub method: String,
    /// Recording time (UTC).
    pub timestamp: DateTime<Utc>,
}

impl Interaction {
    /// Reassemble an entity from a store id and its document body.
    pub fn from_parts(id: DocumentId, body: InteractionDraft) -> Self {
        Self {
            id,
            user_id: body.user_id,
            endpoint: body.endpoint,
            method: body.method,
            timestamp: body.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;

    #[test]
    fn body_omits_absent_user() {
        let draft = InteractionDraft {
            user_id: None,
            endpoint: "/predict".to_owned(),
            method: "POST".to_owned(),
            timestamp: Utc::now(),
        };
        let body = serde_json::to_value(&draft).expect("serializable");
        assert!(body.get("userId").is_none());
        assert_eq!(
            body.get("endpoint").and_then(serde_json::Value::as_str),
            Some("/predict")
        );
    }

    #[test]
    fn body_carries_resolved_user() {
        let draft = InteractionDraft {
            user_id: Some(UserId::new("user-a").expect("valid id")),
            endpoint: "/predictions".to_owned(),
            method: "GET".to_owned(),
            timestamp: Utc::now(),
        };
        let body = serde_json::to_value(&draft).expect("serializable");
        assert_eq!(
            body.get("userId").and_then(serde_json::Value::as_str),
            Some("user-a")
        );
    }
}
