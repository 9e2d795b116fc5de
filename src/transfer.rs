//! Byte transfer between local disk, object storage, and the pipeline
//!
//! This module separates storage I/O from the invocation logic, making the
//! pipeline testable against in-memory stores.

use crate::error::{GenMediaError, Result};
use crate::locator::{Scheme, StorageLocator};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// PNG content type attached to uploaded image artifacts
pub const CONTENT_TYPE_PNG: &str = "image/png";

/// Trait for object-store backends
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch an object's bytes
    ///
    /// # Errors
    /// - `NotFound` when the object does not exist
    /// - `AccessDenied` when the store rejects the caller's permissions
    /// - `Transfer` for any other storage failure
    async fn get(&self, container: &str, key: &str) -> Result<Vec<u8>>;

    /// Store an object durably with the given content type
    ///
    /// # Errors
    /// - `AccessDenied` / `Transfer` as for `get`
    async fn put(&self, container: &str, key: &str, bytes: &[u8], content_type: &str)
        -> Result<()>;
}

/// HTTP-gateway implementation of `ObjectStore`
///
/// Objects live at `{base}/{container}/{key}`; GET reads, PUT writes.
#[derive(Debug, Clone)]
pub struct HttpObjectStore {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl HttpObjectStore {
    /// Create a store client for `base_url`
    ///
    /// # Errors
    /// - Failed to construct the HTTP client
    pub fn new(
        base_url: &str,
        api_token: Option<String>,
        request_timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| GenMediaError::transfer(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
        })
    }

    fn object_url(&self, container: &str, key: &str) -> String {
        format!("{}/{}/{}", self.base_url, container, key)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    fn classify(status: u16, url: &str) -> GenMediaError {
        match status {
            404 => GenMediaError::NotFound(url.to_string()),
            401 | 403 => GenMediaError::AccessDenied(url.to_string()),
            _ => GenMediaError::transfer(format!("HTTP {status} from {url}")),
        }
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn get(&self, container: &str, key: &str) -> Result<Vec<u8>> {
        let url = self.object_url(container, key);
        tracing::debug!(url = %url, "fetching object");

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| GenMediaError::transfer(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::classify(status.as_u16(), &url));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GenMediaError::transfer(format!("{url}: {e}")))?;
        Ok(bytes.to_vec())
    }

    async fn put(
        &self,
        container: &str,
        key: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<()> {
        let url = self.object_url(container, key);
        tracing::debug!(url = %url, size = bytes.len(), "storing object");

        let response = self
            .authorize(self.client.put(&url))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes.to_vec())
            .send()
            .await
            .map_err(|e| GenMediaError::transfer(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::classify(status.as_u16(), &url));
        }
        Ok(())
    }
}

/// Moves bytes between locators and the invocation pipeline
#[derive(Clone)]
pub struct TransferService {
    store: Arc<dyn ObjectStore>,
}

impl TransferService {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Read the bytes a locator points at
    ///
    /// # Errors
    /// - `NotFound` / `AccessDenied` / `Transfer` from the object store
    /// - `Io` for local filesystem failures
    pub async fn read_input(&self, locator: &StorageLocator) -> Result<Vec<u8>> {
        tracing::info!(input = %locator, "reading input");
        match locator.scheme() {
            Scheme::Local => {
                let path = Path::new(locator.key());
                tokio::fs::read(path)
                    .await
                    .map_err(|e| GenMediaError::file_io_error("read input file", path, &e))
            },
            Scheme::ObjectStore => self.store.get(locator.container(), locator.key()).await,
        }
    }

    /// Write output bytes to a locator. On success the artifact is visible
    /// at the locator with the durability the backing store provides.
    ///
    /// # Errors
    /// - `AccessDenied` / `Transfer` from the object store
    /// - `Io` for local filesystem failures
    pub async fn write_output(
        &self,
        bytes: &[u8],
        locator: &StorageLocator,
        content_type: &str,
    ) -> Result<()> {
        tracing::info!(output = %locator, size = bytes.len(), "writing output");
        match locator.scheme() {
            Scheme::Local => {
                let path = Path::new(locator.key());
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    tokio::fs::create_dir_all(parent).await.map_err(|e| {
                        GenMediaError::file_io_error("create output directory", parent, &e)
                    })?;
                }
                tokio::fs::write(path, bytes)
                    .await
                    .map_err(|e| GenMediaError::file_io_error("write output file", path, &e))
            },
            Scheme::ObjectStore => {
                self.store
                    .put(locator.container(), locator.key(), bytes, content_type)
                    .await
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory store used by transfer tests
    #[derive(Default)]
    struct MemoryStore {
        objects: Mutex<HashMap<(String, String), Vec<u8>>>,
    }

    #[async_trait]
    impl ObjectStore for MemoryStore {
        async fn get(&self, container: &str, key: &str) -> Result<Vec<u8>> {
            self.objects
                .lock()
                .unwrap()
                .get(&(container.to_string(), key.to_string()))
                .cloned()
                .ok_or_else(|| GenMediaError::NotFound(format!("s3://{container}/{key}")))
        }

        async fn put(
            &self,
            container: &str,
            key: &str,
            bytes: &[u8],
            _content_type: &str,
        ) -> Result<()> {
            self.objects
                .lock()
                .unwrap()
                .insert((container.to_string(), key.to_string()), bytes.to_vec());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_object_store_roundtrip() {
        let service = TransferService::new(Arc::new(MemoryStore::default()));
        let locator = StorageLocator::parse("s3://bucket/out/result.png").unwrap();

        service
            .write_output(b"artifact", &locator, CONTENT_TYPE_PNG)
            .await
            .unwrap();
        assert_eq!(service.read_input(&locator).await.unwrap(), b"artifact");
    }

    #[tokio::test]
    async fn test_object_store_missing_is_not_found() {
        let service = TransferService::new(Arc::new(MemoryStore::default()));
        let locator = StorageLocator::parse("s3://bucket/missing.png").unwrap();

        let err = service.read_input(&locator).await.unwrap_err();
        assert!(matches!(err, GenMediaError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_local_roundtrip_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.png");
        let locator = StorageLocator::local(path.to_string_lossy());
        let service = TransferService::new(Arc::new(MemoryStore::default()));

        service
            .write_output(b"local-bytes", &locator, CONTENT_TYPE_PNG)
            .await
            .unwrap();
        assert_eq!(service.read_input(&locator).await.unwrap(), b"local-bytes");
    }

    #[tokio::test]
    async fn test_local_missing_file_is_io_error() {
        let service = TransferService::new(Arc::new(MemoryStore::default()));
        let locator = StorageLocator::local("/definitely/not/here.png");

        let err = service.read_input(&locator).await.unwrap_err();
        assert!(matches!(err, GenMediaError::Io(_)));
    }
}
