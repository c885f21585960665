//! Stored-prediction CRUD service.
//!
//! The ownership comparison happens strictly before any mutating store call,
//! so a caller can never observe or alter another user's prediction through
//! a guessed document id.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::auth::Credential;
use crate::domain::document::DocumentId;
use crate::domain::error::Error;
use crate::domain::interactions::{InteractionRecorder, endpoint};
use crate::domain::ports::{
    IdentityResolver, PredictionsCommand, PredictionsQuery, RecordStore,
};
use crate::domain::prediction::{Prediction, PredictionUpdate};
use crate::domain::records::PredictionRecords;
use crate::domain::service_support::map_identity_error;
use crate::domain::user::UserId;

/// CRUD service implementing the [`PredictionsQuery`] and
/// [`PredictionsCommand`] driving ports.
pub struct PredictionCrudService<S> {
    resolver: Arc<dyn IdentityResolver>,
    predictions: PredictionRecords<S>,
    recorder: InteractionRecorder<S>,
}

impl<S> PredictionCrudService<S> {
    /// Create the service from its collaborators.
    pub fn new(
        resolver: Arc<dyn IdentityResolver>,
        predictions: PredictionRecords<S>,
        recorder: InteractionRecorder<S>,
    ) -> Self {
        Self {
            resolver,
            predictions,
            recorder,
        }
    }
}

impl<S: RecordStore> PredictionCrudService<S> {
    async fn resolve(&self, credential: &Credential) -> Result<UserId, Error> {
        self.resolver
            .resolve(credential)
            .await
            .map_err(map_identity_error)
    }

    /// Fetch the document and enforce ownership before any mutation.
    ///
    /// The forbidden message stays generic: it must not confirm anything
    /// about a document the caller does not own.
    async fn fetch_owned(&self, id: &DocumentId, owner: &UserId) -> Result<Prediction, Error> {
        let found = self
            .predictions
            .find(id)
            .await?
            .ok_or_else(|| Error::not_found("prediction not found"))?;
        if found.user_id != *owner {
            return Err(Error::forbidden("not permitted"));
        }
        Ok(found)
    }

    async fn update_owned(
        &self,
        owner: &UserId,
        id: &DocumentId,
        changes: PredictionUpdate,
    ) -> Result<Prediction, Error> {
        let current = self.fetch_owned(id, owner).await?;
        if changes.is_empty() {
            return Ok(current);
        }
        self.predictions
            .apply_update(id, &changes)
            .await?
            .ok_or_else(|| Error::not_found("prediction not found"))
    }

    async fn delete_owned(&self, owner: &UserId, id: &DocumentId) -> Result<(), Error> {
        self.fetch_owned(id, owner).await?;
        if self.predictions.remove(id).await? {
            Ok(())
        } else {
            Err(Error::not_found("prediction not found"))
        }
    }
}

#[async_trait]
impl<S: RecordStore> PredictionsQuery for PredictionCrudService<S> {
    async fn list(&self, credential: &Credential) -> Result<Vec<Prediction>, Error> {
        let resolved = self.resolve(credential).await;
        let (user, outcome) = match resolved {
            Err(err) => (None, Err(err)),
            Ok(user) => {
                let listed = self.predictions.list_owned_by(&user).await;
                (Some(user), listed)
            }
        };
        self.recorder
            .record(endpoint::PREDICTIONS, "GET", user.as_ref())
            .await;
        outcome
    }
}

#[async_trait]
impl<S: RecordStore> PredictionsCommand for PredictionCrudService<S> {
    async fn update(
        &self,
        credential: &Credential,
        id: &DocumentId,
        changes: PredictionUpdate,
    ) -> Result<Prediction, Error> {
        let resolved = self.resolve(credential).await;
        let (user, outcome) = match resolved {
            Err(err) => (None, Err(err)),
            Ok(user) => {
                let updated = self.update_owned(&user, id, changes).await;
                (Some(user), updated)
            }
        };
        self.recorder
            .record(endpoint::PREDICTION, "PUT", user.as_ref())
            .await;
        outcome
    }

    async fn delete(&self, credential: &Credential, id: &DocumentId) -> Result<(), Error> {
        let resolved = self.resolve(credential).await;
        let (user, outcome) = match resolved {
            Err(err) => (None, Err(err)),
            Ok(user) => {
                let deleted = self.delete_owned(&user, id).await;
                (Some(user), deleted)
            }
        };
        self.recorder
            .record(endpoint::PREDICTION, "DELETE", user.as_ref())
            .await;
        outcome
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use chrono::Utc;
    use mockable::DefaultClock;
    use serde_json::json;

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::document::Collection;
    use crate::domain::ports::{
        IdentityResolverError, MockIdentityResolver, MockRecordStore, StoredDocument,
    };
    use crate::domain::records::InteractionRecords;

    fn resolver_for(uid: &'static str) -> MockIdentityResolver {
        let mut resolver = MockIdentityResolver::new();
        resolver.expect_resolve().returning(move |_| {
            UserId::new(uid).map_err(|e| IdentityResolverError::unavailable(e.to_string()))
        });
        resolver
    }

    fn stored_prediction(owner: &str) -> StoredDocument {
        StoredDocument {
            id: DocumentId::new("doc-1"),
            body: json!({
                "userId": owner,
                "filename": "dinner.jpg",
                "prediction": "pizza",
                "confidence": 0.9,
                "createdAt": Utc::now(),
            }),
        }
    }

    /// Allow audit appends; everything else is per-test.
    fn allow_audit(store: &mut MockRecordStore) {
        store
            .expect_create()
            .withf(|collection, _| *collection == Collection::Interactions)
            .returning(|_, body| {
                Ok(StoredDocument {
                    id: DocumentId::new("int-1"),
                    body,
                })
            });
    }

    fn service(
        resolver: MockIdentityResolver,
        store: MockRecordStore,
    ) -> PredictionCrudService<MockRecordStore> {
        let store = Arc::new(store);
        PredictionCrudService::new(
            Arc::new(resolver),
            PredictionRecords::new(Arc::clone(&store)),
            InteractionRecorder::new(InteractionRecords::new(store), Arc::new(DefaultClock)),
        )
    }

    fn credential() -> Credential {
        Credential::new("tok").expect("valid token")
    }

    #[tokio::test]
    async fn update_on_foreign_document_is_forbidden_before_any_mutation() {
        let mut store = MockRecordStore::new();
        store
            .expect_get()
            .returning(|_, _| Ok(Some(stored_prediction("user-a"))));
        // No expect_update: a mutating call would panic the mock.
        allow_audit(&mut store);

        let svc = service(resolver_for("user-b"), store);
        let err = svc
            .update(
                &credential(),
                &DocumentId::new("doc-1"),
                PredictionUpdate {
                    label: Some("sushi".to_owned()),
                    ..PredictionUpdate::default()
                },
            )
            .await
            .expect_err("must be forbidden");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn update_on_missing_document_is_not_found_regardless_of_owner() {
        let mut store = MockRecordStore::new();
        store.expect_get().returning(|_, _| Ok(None));
        allow_audit(&mut store);

        let svc = service(resolver_for("user-b"), store);
        let err = svc
            .update(
                &credential(),
                &DocumentId::new("doc-404"),
                PredictionUpdate::default(),
            )
            .await
            .expect_err("must be missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn update_applies_whitelisted_fields_for_the_owner() {
        let mut store = MockRecordStore::new();
        store
            .expect_get()
            .returning(|_, _| Ok(Some(stored_prediction("user-a"))));
        store
            .expect_update()
            .withf(|collection, id, partial| {
                *collection == Collection::Predictions
                    && id.as_ref() == "doc-1"
                    && partial == &json!({ "prediction": "sushi" })
            })
            .times(1)
            .returning(|_, _, _| {
                let mut doc = stored_prediction("user-a");
                doc.body["prediction"] = json!("sushi");
                Ok(Some(doc))
            });
        allow_audit(&mut store);

        let svc = service(resolver_for("user-a"), store);
        let updated = svc
            .update(
                &credential(),
                &DocumentId::new("doc-1"),
                PredictionUpdate {
                    label: Some("sushi".to_owned()),
                    ..PredictionUpdate::default()
                },
            )
            .await
            .expect("owner update succeeds");
        assert_eq!(updated.label, "sushi");
        assert_eq!(updated.user_id.as_ref(), "user-a");
    }

    #[tokio::test]
    async fn empty_update_returns_the_document_unchanged() {
        let mut store = MockRecordStore::new();
        store
            .expect_get()
            .returning(|_, _| Ok(Some(stored_prediction("user-a"))));
        // No expect_update: an empty change set must not hit the store.
        allow_audit(&mut store);

        let svc = service(resolver_for("user-a"), store);
        let unchanged = svc
            .update(
                &credential(),
                &DocumentId::new("doc-1"),
                PredictionUpdate::default(),
            )
            .await
            .expect("no-op update succeeds");
        assert_eq!(unchanged.label, "pizza");
    }

    #[tokio::test]
    async fn delete_on_foreign_document_is_forbidden() {
        let mut store = MockRecordStore::new();
        store
            .expect_get()
            .returning(|_, _| Ok(Some(stored_prediction("user-a"))));
        allow_audit(&mut store);

        let svc = service(resolver_for("user-b"), store);
        let err = svc
            .delete(&credential(), &DocumentId::new("doc-1"))
            .await
            .expect_err("must be forbidden");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn delete_then_delete_again_yields_not_found() {
        let mut store = MockRecordStore::new();
        let mut remaining = Some(stored_prediction("user-a"));
        store
            .expect_get()
            .returning(move |_, _| Ok(remaining.take()));
        store.expect_delete().times(1).returning(|_, _| Ok(true));
        allow_audit(&mut store);

        let svc = service(resolver_for("user-a"), store);
        svc.delete(&credential(), &DocumentId::new("doc-1"))
            .await
            .expect("first delete succeeds");
        let err = svc
            .delete(&credential(), &DocumentId::new("doc-1"))
            .await
            .expect_err("second delete must miss");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn list_filters_to_the_caller() {
        let mut store = MockRecordStore::new();
        store
            .expect_list()
            .withf(|collection, filter| {
                *collection == Collection::Predictions
                    && filter.owner.as_ref().map(AsRef::as_ref) == Some("user-a")
            })
            .times(1)
            .returning(|_, _| Ok(vec![stored_prediction("user-a")]));
        allow_audit(&mut store);

        let svc = service(resolver_for("user-a"), store);
        let listed = svc.list(&credential()).await.expect("listing succeeds");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed.first().map(|p| p.user_id.as_ref()), Some("user-a"));
    }

    #[tokio::test]
    async fn auth_failure_yields_unauthorized_and_audits_without_user() {
        let mut resolver = MockIdentityResolver::new();
        resolver
            .expect_resolve()
            .returning(|_| Err(IdentityResolverError::invalid_credential("expired")));

        let mut store = MockRecordStore::new();
        store
            .expect_create()
            .withf(|collection, body| {
                *collection == Collection::Interactions && body.get("userId").is_none()
            })
            .times(1)
            .returning(|_, body| {
                Ok(StoredDocument {
                    id: DocumentId::new("int-1"),
                    body,
                })
            });

        let svc = service(resolver, store);
        let err = svc.list(&credential()).await.expect_err("must fail");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }
}
