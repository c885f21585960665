//! Prediction API handlers.
//!
//! ```text
//! POST /api/v1/predict?filename=dinner.jpg   (body: raw image bytes)
//! GET /api/v1/predictions
//! PUT /api/v1/predictions/{id}
//! DELETE /api/v1/predictions/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    Confidence, DocumentId, Error, Prediction, PredictionUpdate,
};
use crate::inbound::http::auth::BearerCredential;
use crate::inbound::http::error::{ApiError, ApiResult};
use crate::inbound::http::state::HttpState;

/// Fallback upload name when the client supplies none.
const DEFAULT_FILENAME: &str = "upload";

/// Query parameters accepted by `POST /api/v1/predict`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct UploadQuery {
    /// Original name of the uploaded file, informational only.
    pub filename: Option<String>,
}

/// Label/confidence pair of a classification result.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationDto {
    /// Predicted food label.
    pub label: String,
    /// Confidence score in `[0.0, 1.0]`.
    pub confidence: f64,
}

/// Response payload for a newly created prediction.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PredictResponse {
    /// Store-assigned document id.
    pub id: String,
    /// The classification result.
    pub prediction: ClassificationDto,
    /// Original upload name.
    pub filename: String,
    /// Estimated kilocalories, when the enrichment knew the label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<u32>,
}

impl From<Prediction> for PredictResponse {
    fn from(prediction: Prediction) -> Self {
        Self {
            id: prediction.id.to_string(),
            prediction: ClassificationDto {
                label: prediction.label,
                confidence: prediction.confidence.value(),
            },
            filename: prediction.filename,
            calories: prediction.calories,
        }
    }
}

/// One stored prediction as returned by the listing and update endpoints.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredPredictionDto {
    /// Store-assigned document id.
    pub id: String,
    /// Owning user.
    pub user_id: String,
    /// Predicted food label.
    pub prediction: String,
    /// Confidence score in `[0.0, 1.0]`.
    pub confidence: f64,
    /// Estimated kilocalories, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<u32>,
    /// Original upload name.
    pub filename: String,
    /// Creation time, RFC 3339.
    pub created_at: String,
}

impl From<Prediction> for StoredPredictionDto {
    fn from(prediction: Prediction) -> Self {
        Self {
            id: prediction.id.to_string(),
            user_id: prediction.user_id.to_string(),
            prediction: prediction.label,
            confidence: prediction.confidence.value(),
            calories: prediction.calories,
            filename: prediction.filename,
            created_at: prediction.created_at.to_rfc3339(),
        }
    }
}

/// Response payload for the listing endpoint.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PredictionListResponse {
    /// The caller's predictions, insertion order.
    pub predictions: Vec<StoredPredictionDto>,
}

/// Request payload for `PUT /api/v1/predictions/{id}`.
///
/// Only the whitelisted fields are accepted; `userId` and `id` cannot be
/// expressed here and are ignored by the store even if smuggled in.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePredictionRequest {
    /// Replacement label.
    pub prediction: Option<String>,
    /// Replacement confidence score.
    pub confidence: Option<f64>,
    /// Replacement calorie estimate.
    pub calories: Option<u32>,
}

impl TryFrom<UpdatePredictionRequest> for PredictionUpdate {
    type Error = Error;

    fn try_from(value: UpdatePredictionRequest) -> Result<Self, Self::Error> {
        let confidence = value
            .confidence
            .map(|raw| {
                Confidence::try_new(raw).map_err(|err| {
                    Error::invalid_request(err.to_string())
                        .with_details(json!({ "field": "confidence" }))
                })
            })
            .transpose()?;
        Ok(Self {
            label: value.prediction,
            confidence,
            calories: value.calories,
        })
    }
}

/// Response payload for the delete endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteResponse {
    /// Always `"deleted"` on success.
    pub status: String,
}

/// Classify an uploaded image and store the result.
#[utoipa::path(
    post,
    path = "/api/v1/predict",
    params(UploadQuery),
    request_body(content = Vec<u8>, description = "Raw image bytes", content_type = "application/octet-stream"),
    responses(
        (status = 201, description = "Prediction created", body = PredictResponse),
        (status = 400, description = "Empty, oversized, or undecodable upload", body = ApiError),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 502, description = "Inference failed", body = ApiError),
        (status = 503, description = "A collaborator is unavailable", body = ApiError)
    ),
    tags = ["predictions"],
    operation_id = "predict"
)]
#[post("/predict")]
pub async fn predict(
    state: web::Data<HttpState>,
    credential: BearerCredential,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let filename = query
        .into_inner()
        .filename
        .unwrap_or_else(|| DEFAULT_FILENAME.to_owned());
    let created = state
        .predict
        .predict(&credential.into_inner(), body.to_vec(), &filename)
        .await?;
    Ok(HttpResponse::Created().json(PredictResponse::from(created)))
}

/// List the caller's stored predictions.
#[utoipa::path(
    get,
    path = "/api/v1/predictions",
    responses(
        (status = 200, description = "The caller's predictions", body = PredictionListResponse),
        (status = 401, description = "Unauthorised", body = ApiError)
    ),
    tags = ["predictions"],
    operation_id = "listPredictions"
)]
#[get("/predictions")]
pub async fn list_predictions(
    state: web::Data<HttpState>,
    credential: BearerCredential,
) -> ApiResult<web::Json<PredictionListResponse>> {
    let predictions = state
        .predictions_query
        .list(&credential.into_inner())
        .await?
        .into_iter()
        .map(StoredPredictionDto::from)
        .collect();
    Ok(web::Json(PredictionListResponse { predictions }))
}

/// Update whitelisted fields of an owned prediction.
#[utoipa::path(
    put,
    path = "/api/v1/predictions/{id}",
    params(("id" = String, Path, description = "Prediction document id")),
    request_body = UpdatePredictionRequest,
    responses(
        (status = 200, description = "Updated prediction", body = StoredPredictionDto),
        (status = 400, description = "Invalid field value", body = ApiError),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 403, description = "Owned by another user", body = ApiError),
        (status = 404, description = "No such prediction", body = ApiError)
    ),
    tags = ["predictions"],
    operation_id = "updatePrediction"
)]
#[put("/predictions/{id}")]
pub async fn update_prediction(
    state: web::Data<HttpState>,
    credential: BearerCredential,
    path: web::Path<String>,
    payload: web::Json<UpdatePredictionRequest>,
) -> ApiResult<web::Json<StoredPredictionDto>> {
    let changes = PredictionUpdate::try_from(payload.into_inner())?;
    let id = DocumentId::new(path.into_inner());
    let updated = state
        .predictions_command
        .update(&credential.into_inner(), &id, changes)
        .await?;
    Ok(web::Json(StoredPredictionDto::from(updated)))
}

/// Delete an owned prediction.
#[utoipa::path(
    delete,
    path = "/api/v1/predictions/{id}",
    params(("id" = String, Path, description = "Prediction document id")),
    responses(
        (status = 200, description = "Prediction deleted", body = DeleteResponse),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 403, description = "Owned by another user", body = ApiError),
        (status = 404, description = "No such prediction", body = ApiError)
    ),
    tags = ["predictions"],
    operation_id = "deletePrediction"
)]
#[delete("/predictions/{id}")]
pub async fn delete_prediction(
    state: web::Data<HttpState>,
    credential: BearerCredential,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeleteResponse>> {
    let id = DocumentId::new(path.into_inner());
    state
        .predictions_command
        .delete(&credential.into_inner(), &id)
        .await?;
    Ok(web::Json(DeleteResponse {
        status: "deleted".to_owned(),
    }))
}
