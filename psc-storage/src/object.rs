//! Object storage abstraction
//!
//! Photos, PDF documents and archive files live in named buckets behind
//! this trait. The HTTP-backed implementation lives in psc-api;
//! [`MockObjectStore`] backs tests.

use async_trait::async_trait;
use psc_core::PscResult;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// A stored object as held by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Async object-store trait, one method per bucket operation.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload an object and return its public URL.
    async fn upload(
        &self,
        bucket: &str,
        name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> PscResult<String>;

    /// Public URL of an object. Does not check existence.
    fn public_url(&self, bucket: &str, name: &str) -> String;

    /// Remove an object. Removing a missing object is not an error.
    async fn remove(&self, bucket: &str, name: &str) -> PscResult<()>;
}

/// In-memory object store for testing.
#[derive(Debug, Default)]
pub struct MockObjectStore {
    objects: Arc<RwLock<HashMap<(String, String), StoredObject>>>,
}

impl MockObjectStore {
    /// Create a new mock object store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count of stored objects across all buckets.
    pub fn object_count(&self) -> usize {
        self.objects.read().unwrap().len()
    }

    /// Look up a stored object.
    pub fn get(&self, bucket: &str, name: &str) -> Option<StoredObject> {
        self.objects
            .read()
            .unwrap()
            .get(&(bucket.to_string(), name.to_string()))
            .cloned()
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn upload(
        &self,
        bucket: &str,
        name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> PscResult<String> {
        self.objects.write().unwrap().insert(
            (bucket.to_string(), name.to_string()),
            StoredObject {
                content_type: content_type.to_string(),
                bytes,
            },
        );
        Ok(self.public_url(bucket, name))
    }

    fn public_url(&self, bucket: &str, name: &str) -> String {
        format!("mock://object/public/{bucket}/{name}")
    }

    async fn remove(&self, bucket: &str, name: &str) -> PscResult<()> {
        self.objects
            .write()
            .unwrap()
            .remove(&(bucket.to_string(), name.to_string()));
        Ok(())
    }
}
