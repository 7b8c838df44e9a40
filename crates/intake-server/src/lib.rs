//! Site Backend
//!
//! Serves the built marketing site, the product catalog, and the intake
//! endpoint that appends every accepted submission to the record log.
//!
//! # Routes
//!
//! ```text
//! GET  /health                  liveness + record log status
//! GET  /api/products            catalog file, verbatim JSON
//! POST /api/intake              stamp `date`, append to record log
//! GET  /api-docs/openapi.json   OpenAPI document
//! GET  /*                       static assets from the build directory
//! ```

#![warn(missing_docs)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod record_log;
pub mod routes;

use axum::{
    routing::{get, post},
    Json, Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;

pub use catalog::ProductCatalog;
pub use config::ServerConfig;
pub use error::ApiError;
pub use record_log::{RecordLog, RecordLogError};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    /// Intake record log
    pub record_log: Arc<RecordLog>,
    /// Product catalog file
    pub catalog: Arc<ProductCatalog>,
    /// Directory of built site assets
    pub static_dir: PathBuf,
}

impl AppState {
    /// State for the paths named in `config`
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            record_log: Arc::new(RecordLog::new(config.intake_log_path())),
            catalog: Arc::new(ProductCatalog::new(config.products_path())),
            static_dir: config.static_dir.clone(),
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Site API",
        description = "Product catalog and intake submissions",
        license(name = "Apache-2.0")
    ),
    paths(
        routes::health::health_check,
        routes::products::list_products,
        routes::intake::submit_intake,
    ),
    components(schemas(
        routes::health::HealthResponse,
        intake_forms::IntakeAck,
        intake_forms::ErrorBody,
    )),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "catalog", description = "Product catalog"),
        (name = "intake", description = "Intake form submissions")
    )
)]
pub struct ApiDoc;

/// Build the site router
pub fn build_router(state: AppState) -> Router {
    let assets = ServeDir::new(&state.static_dir);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api/products", get(routes::products::list_products))
        .route("/api/intake", post(routes::intake::submit_intake))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .fallback_service(assets)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}
