//! PSC API Server Entry Point
//!
//! Bootstraps configuration and starts the Axum HTTP server.

use std::sync::Arc;

use axum::Router;
use psc_api::{
    create_api_router, resolve_bind_addr, ApiConfig, ApiError, ApiResult, AuthConfig, DbClient,
    DbConfig, StorageClient, StorageConfig,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ApiResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let db_config = DbConfig::from_env();
    let db = DbClient::from_config(&db_config)?;

    let storage_config = StorageConfig::from_env().map_err(ApiError::from)?;
    let object_store = Arc::new(StorageClient::new(storage_config));

    let api_config = ApiConfig::from_env();
    let auth_config = AuthConfig::from_env()?;

    let app: Router = create_api_router(db, object_store, &api_config, auth_config)?;

    let addr = resolve_bind_addr()?;
    tracing::info!(%addr, "Starting PSC API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Falha ao escutar em {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Erro do servidor: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
