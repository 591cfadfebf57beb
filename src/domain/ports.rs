use crate::domain::model::{AccessMethod, BucketDescriptor, ObjectHandle};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Capability set of the remote object store.
///
/// Implementations pass calls straight through: no validation, no retries.
/// Direct operations fail with `GatewayError::StorageError`; URL signing fails
/// with `GatewayError::SigningError`.
#[async_trait]
pub trait StorageClient: Send + Sync {
    async fn enumerate_buckets(&self) -> Result<Vec<BucketDescriptor>>;

    async fn fetch_object(&self, handle: &ObjectHandle) -> Result<Vec<u8>>;

    /// Overwrites whatever is stored under the handle.
    async fn write_object(&self, handle: &ObjectHandle, data: Vec<u8>) -> Result<()>;

    /// Fails when the object does not exist.
    async fn delete_object(&self, handle: &ObjectHandle) -> Result<()>;

    async fn generate_delegated_url(
        &self,
        method: AccessMethod,
        handle: &ObjectHandle,
        expires_in: Duration,
    ) -> Result<String>;
}
