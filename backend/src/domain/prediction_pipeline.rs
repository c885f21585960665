//! Predict-and-record pipeline service.
//!
//! Ordering is the contract here: identity first, then upload validation,
//! then inference, then normalization and enrichment, and only then the
//! store write. A failed step leaves no partial prediction behind because
//! creation is the last fallible step before auditing.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::warn;

use crate::domain::auth::Credential;
use crate::domain::error::Error;
use crate::domain::interactions::{InteractionRecorder, endpoint};
use crate::domain::ports::{
    CalorieLookup, IdentityResolver, InferenceEngine, LabelScore, PredictCommand, RecordStore,
};
use crate::domain::prediction::{Confidence, Prediction, PredictionDraft};
use crate::domain::records::PredictionRecords;
use crate::domain::service_support::{map_engine_error, map_identity_error, map_upload_error};
use crate::domain::upload::ImageUpload;
use crate::domain::user::UserId;

/// Pipeline service implementing the [`PredictCommand`] driving port.
pub struct PredictionPipelineService<S> {
    resolver: Arc<dyn IdentityResolver>,
    engine: Arc<dyn InferenceEngine>,
    calories: Arc<dyn CalorieLookup>,
    predictions: PredictionRecords<S>,
    recorder: InteractionRecorder<S>,
    clock: Arc<dyn Clock>,
}

impl<S> PredictionPipelineService<S> {
    /// Create the pipeline from its collaborators.
    pub fn new(
        resolver: Arc<dyn IdentityResolver>,
        engine: Arc<dyn InferenceEngine>,
        calories: Arc<dyn CalorieLookup>,
        predictions: PredictionRecords<S>,
        recorder: InteractionRecorder<S>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            resolver,
            engine,
            calories,
            predictions,
            recorder,
            clock,
        }
    }
}

/// Pick the highest-confidence candidate; ties keep the first returned.
fn select_top(candidates: Vec<LabelScore>) -> Option<LabelScore> {
    let mut best: Option<LabelScore> = None;
    for candidate in candidates {
        let replace = match &best {
            Some(current) => candidate.confidence > current.confidence,
            None => true,
        };
        if replace {
            best = Some(candidate);
        }
    }
    best
}

impl<S: RecordStore> PredictionPipelineService<S> {
    async fn classify_and_persist(
        &self,
        user_id: &UserId,
        image_bytes: Vec<u8>,
        filename: &str,
    ) -> Result<Prediction, Error> {
        let image = ImageUpload::try_new(image_bytes, filename).map_err(map_upload_error)?;

        let candidates = self
            .engine
            .classify(&image)
            .await
            .map_err(map_engine_error)?;
        let top = select_top(candidates)
            .ok_or_else(|| Error::inference_failed("engine returned no candidates"))?;
        let confidence = Confidence::try_new(top.confidence).map_err(|err| {
            Error::inference_failed(err.to_string())
                .with_details(json!({ "reportedConfidence": top.confidence }))
        })?;

        let calories = match self.calories.lookup(&top.label).await {
            Ok(value) => value,
            Err(error) => {
                warn!(label = %top.label, %error, "calorie lookup failed; leaving field absent");
                None
            }
        };

        let draft = PredictionDraft {
            user_id: user_id.clone(),
            filename: image.filename().to_owned(),
            label: top.label,
            confidence,
            calories,
            created_at: self.clock.utc(),
        };
        self.predictions.create(&draft).await
    }
}

#[async_trait]
impl<S: RecordStore> PredictCommand for PredictionPipelineService<S> {
    async fn predict(
        &self,
        credential: &Credential,
        image_bytes: Vec<u8>,
        filename: &str,
    ) -> Result<Prediction, Error> {
        let resolved = self
            .resolver
            .resolve(credential)
            .await
            .map_err(map_identity_error);
        let (user, outcome) = match resolved {
            Err(err) => (None, Err(err)),
            Ok(user) => {
                let outcome = self
                    .classify_and_persist(&user, image_bytes, filename)
                    .await;
                (Some(user), outcome)
            }
        };
        self.recorder
            .record(endpoint::PREDICT, "POST", user.as_ref())
            .await;
        outcome
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use chrono::Utc;
    use mockable::DefaultClock;
    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::document::{Collection, DocumentId};
    use crate::domain::ports::{
        IdentityResolverError, InferenceEngineError, MockIdentityResolver, MockInferenceEngine,
        MockRecordStore, NoOpCalorieLookup, StoredDocument,
    };
    use crate::domain::records::InteractionRecords;

    fn png_bytes() -> Vec<u8> {
        let mut out = std::io::Cursor::new(Vec::new());
        image::RgbImage::new(2, 2)
            .write_to(&mut out, image::ImageFormat::Png)
            .expect("encoding a tiny PNG succeeds");
        out.into_inner()
    }

    fn accepting_resolver() -> MockIdentityResolver {
        let mut resolver = MockIdentityResolver::new();
        resolver.expect_resolve().returning(|_| {
            UserId::new("user-a").map_err(|e| IdentityResolverError::unavailable(e.to_string()))
        });
        resolver
    }

    fn engine_with(candidates: Vec<LabelScore>) -> MockInferenceEngine {
        let mut engine = MockInferenceEngine::new();
        engine
            .expect_classify()
            .returning(move |_| Ok(candidates.clone()));
        engine
    }

    /// Store mock that accepts creates into both collections.
    fn open_store() -> MockRecordStore {
        let mut store = MockRecordStore::new();
        store.expect_create().returning(|_, body| {
            Ok(StoredDocument {
                id: DocumentId::new("doc-1"),
                body,
            })
        });
        store
    }

    fn pipeline(
        resolver: MockIdentityResolver,
        engine: MockInferenceEngine,
        store: MockRecordStore,
    ) -> PredictionPipelineService<MockRecordStore> {
        let store = Arc::new(store);
        PredictionPipelineService::new(
            Arc::new(resolver),
            Arc::new(engine),
            Arc::new(NoOpCalorieLookup),
            PredictionRecords::new(Arc::clone(&store)),
            InteractionRecorder::new(InteractionRecords::new(store), Arc::new(DefaultClock)),
            Arc::new(DefaultClock),
        )
    }

    fn credential() -> Credential {
        Credential::new("tok").expect("valid token")
    }

    #[rstest]
    #[case(vec![LabelScore { label: "pizza".into(), confidence: 0.9 }], "pizza")]
    #[case(
        vec![
            LabelScore { label: "salad".into(), confidence: 0.2 },
            LabelScore { label: "ramen".into(), confidence: 0.7 },
            LabelScore { label: "sushi".into(), confidence: 0.7 },
        ],
        "ramen"
    )]
    fn select_top_prefers_highest_then_first(
        #[case] candidates: Vec<LabelScore>,
        #[case] expected: &str,
    ) {
        let top = select_top(candidates).expect("non-empty candidate list");
        assert_eq!(top.label, expected);
    }

    #[test]
    fn select_top_of_nothing_is_none() {
        assert!(select_top(Vec::new()).is_none());
    }

    #[tokio::test]
    async fn happy_path_persists_and_returns_the_created_document() {
        let before = Utc::now();
        let service = pipeline(
            accepting_resolver(),
            engine_with(vec![LabelScore {
                label: "pizza".to_owned(),
                confidence: 0.999_998_21,
            }]),
            open_store(),
        );

        let created = service
            .predict(&credential(), png_bytes(), "dinner.png")
            .await
            .expect("pipeline succeeds");

        assert_eq!(created.label, "pizza");
        assert!((created.confidence.value() - 0.999_998_21).abs() < 1e-12);
        assert_eq!(created.user_id.as_ref(), "user-a");
        assert_eq!(created.filename, "dinner.png");
        assert_eq!(created.id, DocumentId::new("doc-1"));
        assert!(created.created_at >= before);
    }

    #[tokio::test]
    async fn auth_failure_short_circuits_before_inference() {
        let mut resolver = MockIdentityResolver::new();
        resolver
            .expect_resolve()
            .returning(|_| Err(IdentityResolverError::invalid_credential("expired")));

        // No classify expectation: a call would panic the mock. The store
        // only sees the audit append, without a user id.
        let engine = MockInferenceEngine::new();
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

        let service = pipeline(resolver, engine, store);
        let err = service
            .predict(&credential(), png_bytes(), "dinner.png")
            .await
            .expect_err("must fail");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn undecodable_upload_never_reaches_the_engine() {
        let engine = MockInferenceEngine::new();
        let mut store = MockRecordStore::new();
        store
            .expect_create()
            .withf(|collection, _| *collection == Collection::Interactions)
            .times(1)
            .returning(|_, body| {
                Ok(StoredDocument {
                    id: DocumentId::new("int-1"),
                    body,
                })
            });

        let service = pipeline(accepting_resolver(), engine, store);
        let err = service
            .predict(&credential(), b"garbage".to_vec(), "x.png")
            .await
            .expect_err("must fail");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn engine_failure_persists_nothing() {
        let mut engine = MockInferenceEngine::new();
        engine
            .expect_classify()
            .returning(|_| Err(InferenceEngineError::failed("no detection")));

        let mut store = MockRecordStore::new();
        store
            .expect_create()
            .withf(|collection, _| *collection == Collection::Interactions)
            .times(1)
            .returning(|_, body| {
                Ok(StoredDocument {
                    id: DocumentId::new("int-1"),
                    body,
                })
            });

        let service = pipeline(accepting_resolver(), engine, store);
        let err = service
            .predict(&credential(), png_bytes(), "dinner.png")
            .await
            .expect_err("must fail");
        assert_eq!(err.code(), ErrorCode::InferenceFailed);
    }

    #[rstest]
    #[case(1.5)]
    #[case(-0.1)]
    #[case(f64::NAN)]
    #[tokio::test]
    async fn malformed_confidence_is_rejected_not_clamped(#[case] score: f64) {
        let mut store = MockRecordStore::new();
        store
            .expect_create()
            .withf(|collection, _| *collection == Collection::Interactions)
            .times(1)
            .returning(|_, body| {
                Ok(StoredDocument {
                    id: DocumentId::new("int-1"),
                    body,
                })
            });

        let service = pipeline(
            accepting_resolver(),
            engine_with(vec![LabelScore {
                label: "pizza".to_owned(),
                confidence: score,
            }]),
            store,
        );
        let err = service
            .predict(&credential(), png_bytes(), "dinner.png")
            .await
            .expect_err("must fail");
        assert_eq!(err.code(), ErrorCode::InferenceFailed);
    }

    #[tokio::test]
    async fn calorie_lookup_failure_degrades_to_absent_field() {
        let mut calories = crate::domain::ports::MockCalorieLookup::new();
        calories.expect_lookup().returning(|_| {
            Err(crate::domain::ports::CalorieLookupError::unavailable(
                "offline",
            ))
        });

        let store = Arc::new(open_store());
        let service = PredictionPipelineService::new(
            Arc::new(accepting_resolver()),
            Arc::new(engine_with(vec![LabelScore {
                label: "pizza".to_owned(),
                confidence: 0.9,
            }])),
            Arc::new(calories),
            PredictionRecords::new(Arc::clone(&store)),
            InteractionRecorder::new(InteractionRecords::new(store), Arc::new(DefaultClock)),
            Arc::new(DefaultClock),
        );

        let created = service
            .predict(&credential(), png_bytes(), "dinner.png")
            .await
            .expect("enrichment failure must not fail the pipeline");
        assert_eq!(created.calories, None);
    }

    #[tokio::test]
    async fn audit_entry_rides_along_on_success() {
        let mut store = MockRecordStore::new();
        store
            .expect_create()
            .withf(|collection, _| *collection == Collection::Predictions)
            .times(1)
            .returning(|_, body| {
                Ok(StoredDocument {
                    id: DocumentId::new("doc-1"),
                    body,
                })
            });
        store
            .expect_create()
            .withf(|collection, body| {
                *collection == Collection::Interactions
                    && body.get("endpoint").and_then(Value::as_str) == Some("/predict")
                    && body.get("method").and_then(Value::as_str) == Some("POST")
                    && body.get("userId").and_then(Value::as_str) == Some("user-a")
            })
            .times(1)
            .returning(|_, body| {
                Ok(StoredDocument {
                    id: DocumentId::new("int-1"),
                    body,
                })
            });

        let service = pipeline(
            accepting_resolver(),
            engine_with(vec![LabelScore {
                label: "pizza".to_owned(),
                confidence: 0.9,
            }]),
            store,
        );
        service
            .predict(&credential(), png_bytes(), "dinner.png")
            .await
            .expect("pipeline succeeds");
    }
}
