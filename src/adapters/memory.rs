use crate::domain::model::{AccessMethod, BucketDescriptor, ObjectHandle};
use crate::domain::ports::StorageClient;
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use url::Url;

const DEFAULT_ENDPOINT: &str = "http://localhost:9000";

#[derive(Debug, Default)]
struct MemoryBucket {
    creation_date: String,
    objects: HashMap<String, Vec<u8>>,
}

/// In-process object store with the same fault behaviour as S3 for the
/// operations the gateway uses, except that deleting a missing key fails.
///
/// Every `StorageClient` call is counted, so callers can assert how many
/// round trips an operation made.
#[derive(Debug)]
pub struct MemoryStorage {
    buckets: RwLock<BTreeMap<String, MemoryBucket>>,
    calls: AtomicUsize,
    endpoint: String,
    signing_failure: Option<String>,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            buckets: RwLock::new(BTreeMap::new()),
            calls: AtomicUsize::new(0),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            signing_failure: None,
        }
    }

    pub fn with_bucket(mut self, name: &str) -> Self {
        self.buckets.get_mut().insert(
            name.to_string(),
            MemoryBucket {
                creation_date: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
                objects: HashMap::new(),
            },
        );
        self
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    /// Makes every URL signing attempt fail with `message`.
    pub fn with_signing_failure(mut self, message: &str) -> Self {
        self.signing_failure = Some(message.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Reads an object without counting it as a gateway call.
    pub async fn object(&self, handle: &ObjectHandle) -> Option<Vec<u8>> {
        let buckets = self.buckets.read().await;
        buckets.get(&handle.bucket)?.objects.get(&handle.key).cloned()
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

fn no_such_bucket(operation: &'static str, bucket: &str) -> GatewayError {
    GatewayError::storage(
        operation,
        format!("NoSuchBucket: The specified bucket does not exist: {:?}", bucket),
    )
}

fn no_such_key(operation: &'static str, key: &str) -> GatewayError {
    GatewayError::storage(
        operation,
        format!("NoSuchKey: The specified key does not exist: {:?}", key),
    )
}

#[async_trait]
impl StorageClient for MemoryStorage {
    async fn enumerate_buckets(&self) -> Result<Vec<BucketDescriptor>> {
        self.record_call();
        let buckets = self.buckets.read().await;
        Ok(buckets
            .iter()
            .map(|(name, bucket)| BucketDescriptor {
                name: name.clone(),
                creation_date: Some(bucket.creation_date.clone()),
            })
            .collect())
    }

    async fn fetch_object(&self, handle: &ObjectHandle) -> Result<Vec<u8>> {
        self.record_call();
        let buckets = self.buckets.read().await;
        let bucket = buckets
            .get(&handle.bucket)
            .ok_or_else(|| no_such_bucket("get_object", &handle.bucket))?;
        bucket
            .objects
            .get(&handle.key)
            .cloned()
            .ok_or_else(|| no_such_key("get_object", &handle.key))
    }

    async fn write_object(&self, handle: &ObjectHandle, data: Vec<u8>) -> Result<()> {
        self.record_call();
        let mut buckets = self.buckets.write().await;
        let bucket = buckets
            .get_mut(&handle.bucket)
            .ok_or_else(|| no_such_bucket("put_object", &handle.bucket))?;
        if handle.key.is_empty() {
            return Err(GatewayError::storage("put_object", "Object key cannot be empty"));
        }
        bucket.objects.insert(handle.key.clone(), data);
        Ok(())
    }

    async fn delete_object(&self, handle: &ObjectHandle) -> Result<()> {
        self.record_call();
        let mut buckets = self.buckets.write().await;
        let bucket = buckets
            .get_mut(&handle.bucket)
            .ok_or_else(|| no_such_bucket("delete_object", &handle.bucket))?;
        bucket
            .objects
            .remove(&handle.key)
            .map(|_| ())
            .ok_or_else(|| no_such_key("delete_object", &handle.key))
    }

    async fn generate_delegated_url(
        &self,
        method: AccessMethod,
        handle: &ObjectHandle,
        expires_in: Duration,
    ) -> Result<String> {
        self.record_call();
        if let Some(message) = &self.signing_failure {
            return Err(GatewayError::signing(message.clone()));
        }
        if handle.bucket.is_empty() || handle.key.is_empty() {
            return Err(GatewayError::signing("bucket and key are required to sign a URL"));
        }

        let mut url = Url::parse(&self.endpoint).map_err(|e| GatewayError::signing(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| GatewayError::signing(format!("endpoint cannot be a base: {}", self.endpoint)))?
            .push(&handle.bucket)
            .push(&handle.key);
        url.query_pairs_mut()
            .append_pair(
                "X-Amz-Method",
                match method {
                    AccessMethod::Get => "GET",
                    AccessMethod::Put => "PUT",
                },
            )
            .append_pair("X-Amz-Expires", &expires_in.as_secs().to_string());
        Ok(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_then_fetch_overwrites() {
        let storage = MemoryStorage::new().with_bucket("docs");
        let handle = ObjectHandle::new("docs", "a.txt");

        storage.write_object(&handle, b"first".to_vec()).await.unwrap();
        storage.write_object(&handle, b"second".to_vec()).await.unwrap();

        assert_eq!(storage.fetch_object(&handle).await.unwrap(), b"second");
        assert_eq!(storage.call_count(), 3);
    }

    #[tokio::test]
    async fn test_missing_bucket_and_key_are_storage_errors() {
        let storage = MemoryStorage::new().with_bucket("docs");

        let missing_bucket = storage.fetch_object(&ObjectHandle::new("nope", "a.txt")).await;
        assert!(matches!(missing_bucket, Err(GatewayError::StorageError { .. })));

        let missing_key = storage.delete_object(&ObjectHandle::new("docs", "a.txt")).await;
        assert!(matches!(
            missing_key,
            Err(GatewayError::StorageError { operation: "delete_object", .. })
        ));
    }

    #[tokio::test]
    async fn test_delegated_url_encodes_handle_and_expiry() {
        let storage = MemoryStorage::new().with_endpoint("https://storage.test/");
        let url = storage
            .generate_delegated_url(
                AccessMethod::Put,
                &ObjectHandle::new("docs", "reports/q1 final.txt"),
                Duration::from_secs(3600),
            )
            .await
            .unwrap();

        assert!(url.starts_with("https://storage.test/docs/reports%2Fq1%20final.txt?"));
        assert!(url.contains("X-Amz-Method=PUT"));
        assert!(url.contains("X-Amz-Expires=3600"));
    }

    #[tokio::test]
    async fn test_signing_failure_is_signing_error() {
        let storage = MemoryStorage::new().with_signing_failure("InvalidAccessKeyId");
        let result = storage
            .generate_delegated_url(
                AccessMethod::Get,
                &ObjectHandle::new("docs", "a.txt"),
                Duration::from_secs(60),
            )
            .await;

        assert!(matches!(result, Err(GatewayError::SigningError { message }) if message == "InvalidAccessKeyId"));
    }

    #[tokio::test]
    async fn test_enumerate_buckets_is_sorted_by_name() {
        let storage = MemoryStorage::new().with_bucket("zeta").with_bucket("alpha");
        let names: Vec<String> = storage
            .enumerate_buckets()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }
}
