//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the HTTP endpoints and the DTO schemas they answer
//! with. The generated document is served as JSON in debug builds.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::error::ApiError;
use crate::inbound::http::interactions::{InteractionDto, InteractionListResponse};
use crate::inbound::http::predictions::{
    ClassificationDto, DeleteResponse, PredictResponse, PredictionListResponse,
    StoredPredictionDto, UpdatePredictionRequest,
};

/// Enrich the generated document with the bearer-token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Food prediction API",
        description = "Bearer-authenticated food image classification with per-user stored results and an interaction audit trail."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::predictions::predict,
        crate::inbound::http::predictions::list_predictions,
        crate::inbound::http::predictions::update_prediction,
        crate::inbound::http::predictions::delete_prediction,
        crate::inbound::http::interactions::list_interactions,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ApiError,
        ClassificationDto,
        DeleteResponse,
        InteractionDto,
        InteractionListResponse,
        PredictResponse,
        PredictionListResponse,
        StoredPredictionDto,
        UpdatePredictionRequest,
    ))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;

    #[test]
    fn document_lists_every_api_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/predict",
            "/api/v1/predictions",
            "/api/v1/predictions/{id}",
            "/api/v1/interactions",
            "/health/ready",
            "/health/live",
        ] {
            assert!(
                doc.paths.paths.contains_key(path),
                "missing path {path} in the OpenAPI document"
            );
        }
    }
}
