//! Object Storage Client
//!
//! HTTP client for the hosted object store. Photos, PDF documents and
//! archive files each live in their own bucket; uploads return the public
//! URL that gets persisted on the owning record.

use async_trait::async_trait;
use psc_core::{PscError, PscResult, StorageError};
use psc_storage::ObjectStore;

/// Bucket for beneficiary photos.
pub const BUCKET_FOTOS: &str = "beneficiarios-fotos";
/// Bucket for beneficiary PDF documents.
pub const BUCKET_DOCUMENTOS: &str = "beneficiarios-documentos";
/// Bucket for the digital archive.
pub const BUCKET_ARQUIVOS: &str = "arquivos-digitais";

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Object-store configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Base URL of the storage service, e.g. `https://xyz.supabase.co/storage/v1`.
    pub base_url: String,
    /// Service key sent as a bearer token.
    pub service_key: String,
}

impl StorageConfig {
    /// Load the configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PSC_STORAGE_URL`: base URL of the storage service (required)
    /// - `PSC_STORAGE_KEY`: service key (required)
    pub fn from_env() -> PscResult<Self> {
        let base_url = std::env::var("PSC_STORAGE_URL").map_err(|_| {
            PscError::Storage(StorageError::ObjectStore {
                bucket: "-".to_string(),
                reason: "PSC_STORAGE_URL não configurado".to_string(),
            })
        })?;
        let service_key = std::env::var("PSC_STORAGE_KEY").map_err(|_| {
            PscError::Storage(StorageError::ObjectStore {
                bucket: "-".to_string(),
                reason: "PSC_STORAGE_KEY não configurado".to_string(),
            })
        })?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key,
        })
    }
}

// ============================================================================
// CLIENT
// ============================================================================

/// HTTP-backed object store.
#[derive(Debug, Clone)]
pub struct StorageClient {
    config: StorageConfig,
    http: reqwest::Client,
}

impl StorageClient {
    /// Create a new client.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    fn object_error(&self, bucket: &str, reason: impl Into<String>) -> PscError {
        PscError::Storage(StorageError::ObjectStore {
            bucket: bucket.to_string(),
            reason: reason.into(),
        })
    }
}

#[async_trait]
impl ObjectStore for StorageClient {
    async fn upload(
        &self,
        bucket: &str,
        name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> PscResult<String> {
        let url = format!("{}/object/{}/{}", self.config.base_url, bucket, name);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.service_key)
            .header(reqwest::header::CONTENT_TYPE, content_type.to_string())
            .body(bytes)
            .send()
            .await
            .map_err(|e| self.object_error(bucket, e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(self.object_error(bucket, format!("upload falhou ({}): {}", status, body)));
        }

        Ok(self.public_url(bucket, name))
    }

    fn public_url(&self, bucket: &str, name: &str) -> String {
        format!("{}/object/public/{}/{}", self.config.base_url, bucket, name)
    }

    async fn remove(&self, bucket: &str, name: &str) -> PscResult<()> {
        let url = format!("{}/object/{}/{}", self.config.base_url, bucket, name);

        let response = self
            .http
            .delete(&url)
            .bearer_auth(&self.config.service_key)
            .send()
            .await
            .map_err(|e| self.object_error(bucket, e.to_string()))?;

        // A missing object is not an error; misconfiguration is.
        if !response.status().is_success() && response.status() != reqwest::StatusCode::NOT_FOUND {
            let status = response.status();
            return Err(self.object_error(bucket, format!("remoção falhou ({})", status)));
        }

        Ok(())
    }
}

// ============================================================================
// OBJECT NAMING
// ============================================================================

/// Build a unique object name from the actor and the original filename:
/// `{actor}-{epoch_millis}.{ext}`. The actor is reduced to a safe slug.
pub fn object_name(actor: &str, original_filename: &str) -> String {
    let slug: String = actor
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    let slug = slug.trim_matches('-').to_string();
    let slug = if slug.is_empty() { "anon".to_string() } else { slug };

    let ext = original_filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= 8)
        .unwrap_or_else(|| "bin".to_string());

    format!("{}-{}.{}", slug, chrono::Utc::now().timestamp_millis(), ext)
}
