//! Interaction audit services.
//!
//! The recorder is handed to every service as an explicit dependency rather
//! than living behind a module-level singleton, so tests can substitute an
//! in-memory store.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::warn;

use crate::domain::auth::Credential;
use crate::domain::error::Error;
use crate::domain::interaction::{Interaction, InteractionDraft};
use crate::domain::ports::{IdentityResolver, InteractionsQuery, RecordStore};
use crate::domain::records::InteractionRecords;
use crate::domain::service_support::map_identity_error;
use crate::domain::user::UserId;

/// Logical operation names recorded in the audit trail.
pub mod endpoint {
    /// Predict-and-record pipeline.
    pub const PREDICT: &str = "/predict";
    /// Stored-prediction listing.
    pub const PREDICTIONS: &str = "/predictions";
    /// Single stored prediction (update/delete).
    pub const PREDICTION: &str = "/predictions/{id}";
    /// Audit history listing.
    pub const INTERACTIONS: &str = "/interactions";
}

/// Best-effort audit writer.
///
/// A failed write is logged and swallowed: auditing is not part of the
/// transactional boundary and must never fail the primary operation.
pub struct InteractionRecorder<S> {
    records: InteractionRecords<S>,
    clock: Arc<dyn Clock>,
}

impl<S> Clone for InteractionRecorder<S> {
    fn clone(&self) -> Self {
        Self {
            records: self.records.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S: RecordStore> InteractionRecorder<S> {
    /// Create a recorder writing through the given view.
    pub fn new(records: InteractionRecords<S>, clock: Arc<dyn Clock>) -> Self {
        Self { records, clock }
    }

    /// Append one audit entry; issued after the primary result is computed.
    pub async fn record(&self, endpoint: &str, method: &str, user: Option<&UserId>) {
        let draft = InteractionDraft {
            user_id: user.cloned(),
            endpoint: endpoint.to_owned(),
            method: method.to_owned(),
            timestamp: self.clock.utc(),
        };
        if let Err(error) = self.records.append(&draft).await {
            warn!(%endpoint, %method, %error, "interaction audit write failed");
        }
    }
}

/// Service answering a caller's own audit history.
pub struct InteractionAuditService<S> {
    resolver: Arc<dyn IdentityResolver>,
    records: InteractionRecords<S>,
    recorder: InteractionRecorder<S>,
}

impl<S> InteractionAuditService<S> {
    /// Create the service from its collaborators.
    pub fn new(
        resolver: Arc<dyn IdentityResolver>,
        records: InteractionRecords<S>,
        recorder: InteractionRecorder<S>,
    ) -> Self {
        Self {
            resolver,
            records,
            recorder,
        }
    }
}

#[async_trait]
impl<S> InteractionsQuery for InteractionAuditService<S>
where
    S: RecordStore,
{
    async fn list(&self, credential: &Credential) -> Result<Vec<Interaction>, Error> {
        let resolved = self
            .resolver
            .resolve(credential)
            .await
            .map_err(map_identity_error);
        let (user, outcome) = match resolved {
            Err(err) => (None, Err(err)),
            Ok(user) => {
                let listed = self.records.list_for_user(&user).await;
                (Some(user), listed)
            }
        };
        self.recorder
            .record(endpoint::INTERACTIONS, "GET", user.as_ref())
            .await;
        outcome
    }
}
