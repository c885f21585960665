//! Interaction audit API handlers.
//!
//! ```text
//! GET /api/v1/interactions
//! ```

use actix_web::{get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::Interaction;
use crate::inbound::http::auth::BearerCredential;
use crate::inbound::http::error::{ApiError, ApiResult};
use crate::inbound::http::state::HttpState;

/// One audit entry as returned by the listing endpoint.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InteractionDto {
    /// Store-assigned identifier.
    pub id: String,
    /// Logical name of the invoked operation.
    pub endpoint: String,
    /// Method of the invoked operation.
    pub method: String,
    /// Recording time, RFC 3339.
    pub timestamp: String,
}

impl From<Interaction> for InteractionDto {
    fn from(interaction: Interaction) -> Self {
        Self {
            id: interaction.id.to_string(),
            endpoint: interaction.endpoint,
            method: interaction.method,
            timestamp: interaction.timestamp.to_rfc3339(),
        }
    }
}

/// Response payload for the audit listing endpoint.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InteractionListResponse {
    /// The caller's audit entries, insertion order.
    pub interactions: Vec<InteractionDto>,
}

/// List the caller's recorded API interactions.
#[utoipa::path(
    get,
    path = "/api/v1/interactions",
    responses(
        (status = 200, description = "The caller's audit trail", body = InteractionListResponse),
        (status = 401, description = "Unauthorised", body = ApiError)
    ),
    tags = ["interactions"],
    operation_id = "listInteractions"
)]
#[get("/interactions")]
pub async fn list_interactions(
    state: web::Data<HttpState>,
    credential: BearerCredential,
) -> ApiResult<web::Json<InteractionListResponse>> {
    let interactions = state
        .interactions
        .list(&credential.into_inner())
        .await?
        .into_iter()
        .map(InteractionDto::from)
        .collect();
    Ok(web::Json(InteractionListResponse { interactions }))
}
