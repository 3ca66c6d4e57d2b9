//! Shared Application State

use crate::auth::AuthConfig;
use crate::db::DbClient;
use psc_storage::ObjectStore;
use std::sync::Arc;

/// State shared by all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: DbClient,
    pub object_store: Arc<dyn ObjectStore>,
    pub auth: Arc<AuthConfig>,
}

impl AppState {
    pub fn new(db: DbClient, object_store: Arc<dyn ObjectStore>, auth: AuthConfig) -> Self {
        Self {
            db,
            object_store,
            auth: Arc::new(auth),
        }
    }
}

impl axum::extract::FromRef<AppState> for DbClient {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl axum::extract::FromRef<AppState> for Arc<dyn ObjectStore> {
    fn from_ref(state: &AppState) -> Self {
        state.object_store.clone()
    }
}

impl axum::extract::FromRef<AppState> for Arc<AuthConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
