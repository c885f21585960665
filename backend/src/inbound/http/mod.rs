//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod error;
pub mod health;
pub mod interactions;
pub mod predictions;
pub mod state;

pub use error::{ApiError, ApiResult};

use actix_web::{Scope, web};

/// The versioned API surface.
///
/// Shared between the binary and the integration tests so both mount the
/// exact same routes.
pub fn api_scope() -> Scope {
    web::scope("/api/v1")
        .service(predictions::predict)
        .service(predictions::list_predictions)
        .service(predictions::update_prediction)
        .service(predictions::delete_prediction)
        .service(interactions::list_interactions)
}
