//! Route Modules and Router Assembly

pub mod arquivo;
pub mod beneficiario;
pub mod documento;
pub mod health;
pub mod observacao;

use crate::{
    auth::AuthConfig,
    config::ApiConfig,
    db::DbClient,
    error::{ApiError, ApiResult},
    state::AppState,
};
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use psc_storage::ObjectStore;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the CORS layer from configuration. An empty origin list allows
/// any origin (development mode).
fn build_cors_layer(config: &ApiConfig) -> ApiResult<CorsLayer> {
    let origins = if config.cors_origins.is_empty() {
        AllowOrigin::any()
    } else {
        let parsed: Result<Vec<HeaderValue>, _> = config
            .cors_origins
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect();
        AllowOrigin::list(parsed.map_err(|e| {
            ApiError::internal_error(format!("Origem CORS inválida: {}", e))
        })?)
    };

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(config.cors_max_age_secs)))
}

/// Assemble the full API router.
pub fn create_api_router(
    db: DbClient,
    object_store: Arc<dyn ObjectStore>,
    api_config: &ApiConfig,
    auth_config: AuthConfig,
) -> ApiResult<Router> {
    let state = AppState::new(db.clone(), object_store, auth_config);

    let api = Router::new()
        .merge(beneficiario::create_router())
        .merge(observacao::create_router())
        .merge(documento::create_router())
        .merge(arquivo::create_router())
        .with_state(state);

    Ok(Router::new()
        .merge(api)
        .merge(health::create_router(db))
        .layer(build_cors_layer(api_config)?)
        .layer(TraceLayer::new_for_http()))
}
