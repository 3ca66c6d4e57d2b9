//! PSC API - REST layer for the PSC case management system
//!
//! Axum-based HTTP service over the beneficiarios, observacoes,
//! documentos_pdf and arquivos_digitais tables, plus the object store
//! holding photos, PDF documents and archive files.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod storage;
pub mod types;

pub use auth::{AuthConfig, CurrentUser};
pub use config::{resolve_bind_addr, ApiConfig};
pub use db::{DbClient, DbConfig};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use routes::create_api_router;
pub use state::AppState;
pub use storage::{StorageClient, StorageConfig};
