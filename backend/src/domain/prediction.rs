//! Prediction entity and its validated fields.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::document::DocumentId;
use crate::domain::user::UserId;

/// Validation errors returned by [`Confidence::try_new`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConfidenceError {
    /// The score was NaN or infinite.
    NotFinite,
    /// The score fell outside `[0.0, 1.0]`.
    OutOfRange {
        /// The rejected value.
        value: f64,
    },
}

impl fmt::Display for ConfidenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFinite => write!(f, "confidence must be a finite number"),
            Self::OutOfRange { value } => {
                write!(f, "confidence {value} outside the [0.0, 1.0] range")
            }
        }
    }
}

impl std::error::Error for ConfidenceError {}

/// Model-reported probability that the chosen label is correct.
///
/// ## Invariants
/// - Finite and within `[0.0, 1.0]`. Out-of-range engine output is rejected
///   at construction, never silently clamped into range.
///
/// # Examples
/// ```
/// use backend::domain::Confidence;
///
/// let c = Confidence::try_new(0.97).unwrap();
/// assert!((c.value() - 0.97).abs() < f64::EPSILON);
/// assert!(Confidence::try_new(1.2).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Confidence(f64);

impl Confidence {
    /// Validate a raw engine score.
    pub fn try_new(value: f64) -> Result<Self, ConfidenceError> {
        if !value.is_finite() {
            return Err(ConfidenceError::NotFinite);
        }
        if !(0.0..=1.0).contains(&value) {
            return Err(ConfidenceError::OutOfRange { value });
        }
        Ok(Self(value))
    }

    /// The validated score.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<Confidence> for f64 {
    fn from(value: Confidence) -> Self {
        value.0
    }
}

impl TryFrom<f64> for Confidence {
    type Error = ConfidenceError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

/// Persisted classification result owned by exactly one user.
///
/// ## Invariants
/// - `id` and `user_id` are immutable once created; updates may touch only
///   `label`, `confidence`, and `calories`.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Store-assigned identifier.
    pub id: DocumentId,
    /// Owning user, set at creation.
    pub user_id: UserId,
    /// Original upload name, informational only.
    pub filename: String,
    /// Predicted food label, case preserved from the engine.
    pub label: String,
    /// Validated confidence score.
    pub confidence: Confidence,
    /// Estimated kilocalories when the enrichment lookup knows the label.
    pub calories: Option<u32>,
    /// Creation time (UTC).
    pub created_at: DateTime<Utc>,
}

/// Document body of a prediction as persisted in the record store.
///
/// The store assigns the id separately; everything else round-trips through
/// this shape. `calories` is genuinely absent on lookup misses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionDraft {
    /// Owning user.
    pub user_id: UserId,
    /// Original upload name.
    pub filename: String,
    /// Predicted food label.
    #[serde(rename = "prediction")]
    pub label: String,
    /// Validated confidence score.
    pub confidence: Confidence,
    /// Estimated kilocalories, absent on lookup misses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<u32>,
    /// Creation time (UTC).
    pub created_at: DateTime<Utc>,
}

impl Prediction {
    /// Reassemble an entity from a store id and its document body.
    pub fn from_parts(id: DocumentId, body: PredictionDraft) -> Self {
        Self {
            id,
            user_id: body.user_id,
            filename: body.filename,
            label: body.label,
            confidence: body.confidence,
            calories: body.calories,
            created_at: body.created_at,
        }
    }
}

/// Whitelisted mutable fields for an update.
///
/// `id` and `user_id` cannot be expressed here at all; the store adapter
/// additionally strips them out of any partial document it merges.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionUpdate {
    /// Replacement label, when supplied.
    #[serde(rename = "prediction", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Replacement confidence, when supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
    /// Replacement calorie estimate, when supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<u32>,
}

impl PredictionUpdate {
    /// True when no field is supplied and the update would be a no-op.
    pub fn is_empty(&self) -> bool {
        self.label.is_none() && self.confidence.is_none() && self.calories.is_none()
    }
}
