//! Backend entry-point: wires adapters, REST endpoints, and probes.

mod server;

use actix_web::{App, HttpServer, web};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
#[cfg(debug_assertions)]
use utoipa::OpenApi;

use backend::inbound::http::api_scope;
use backend::inbound::http::health::{HealthState, live, ready};
use server::{ServerConfig, build_http_state};

#[cfg(debug_assertions)]
async fn openapi_json() -> web::Json<utoipa::openapi::OpenApi> {
    web::Json(backend::ApiDoc::openapi())
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = ServerConfig::from_env()?;
    let state = web::Data::new(build_http_state(&config)?);
    let health = web::Data::new(HealthState::new());

    // Leave the transport cap above the domain cap so oversized uploads get
    // the domain's envelope instead of a bare 413.
    let payload_limit = config.max_upload_bytes.saturating_add(1024);

    let bind_addr = config.bind_addr();
    let server_health = health.clone();
    let server = HttpServer::new(move || {
        let app = App::new()
            .app_data(state.clone())
            .app_data(server_health.clone())
            .app_data(web::PayloadConfig::new(payload_limit))
            .service(api_scope())
            .service(live)
            .service(ready);
        #[cfg(debug_assertions)]
        let app = app.route("/api-docs/openapi.json", web::get().to(openapi_json));
        app
    })
    .bind(bind_addr)?
    .run();

    health.mark_ready();
    info!(%bind_addr, "listening");
    server.await
}
