pub mod api;
pub mod config;
pub mod entities;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;

use crate::config::{AppConfig, DEFAULT_UPLOAD_PATH};
use crate::services::image_store::{DbImageStore, ImageStore};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware::from_fn,
    routing::{any, get},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::upload::upload_image,
        api::handlers::health::health_check,
    ),
    components(
        schemas(
            api::handlers::upload::UploadForm,
            api::handlers::upload::UploadResponse,
            api::handlers::health::HealthResponse,
        )
    ),
    tags(
        (name = "upload", description = "Image upload endpoint"),
        (name = "system", description = "Service health")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub images: Arc<dyn ImageStore>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        Self {
            images: Arc::new(DbImageStore::new(db)),
            config,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();

    let body_limit = match config.max_upload_size {
        Some(max) => DefaultBodyLimit::max(max),
        None => DefaultBodyLimit::disable(),
    };

    let mut router = Router::new()
        .route("/health", get(api::handlers::health::health_check))
        // Every method reaches the handler so non-POST requests get the JSON 405
        .route(&config.upload_path, any(api::handlers::upload::upload_image))
        .route(
            &config.admin_url(""),
            get(api::handlers::admin::admin_index),
        )
        .route(
            &config.admin_url("/images/:id"),
            get(api::handlers::admin::admin_image_detail),
        )
        .route(
            &config.admin_url("/images/:id/data"),
            get(api::handlers::admin::admin_image_data),
        )
        .layer(from_fn(api::middleware::security::security_headers))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api_doc(&config)))
        .layer(from_fn(api::middleware::request_id::request_id_middleware));

    if let Some(cors) = cors_layer(&config) {
        router = router.layer(cors);
    }

    router.layer(body_limit).with_state(state)
}

/// OpenAPI document with the upload operation listed under the configured path.
pub fn api_doc(config: &AppConfig) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    if config.upload_path != DEFAULT_UPLOAD_PATH {
        if let Some(item) = doc.paths.paths.remove(DEFAULT_UPLOAD_PATH) {
            doc.paths.paths.insert(config.upload_path.clone(), item);
        }
    }
    doc
}

/// CORS is only enabled when at least one origin is configured.
fn cors_layer(config: &AppConfig) -> Option<CorsLayer> {
    if config.allowed_origins.is_empty() {
        return None;
    }

    let origins = if config.allows_any_origin() {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any),
    )
}
