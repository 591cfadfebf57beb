use crate::domain::model::{AccessMethod, BucketDescriptor, ObjectHandle};
use crate::domain::ports::StorageClient;
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::{PresignedRequest, PresigningConfig};
use aws_sdk_s3::primitives::{ByteStream, DateTimeFormat};
use aws_sdk_s3::Client as S3Client;
use std::time::Duration;

/// `StorageClient` backed by the AWS SDK. One SDK request per call, except
/// `delete_object`, which checks for the key first.
#[derive(Debug, Clone)]
pub struct S3StorageClient {
    client: S3Client,
}

impl S3StorageClient {
    pub fn new(client: S3Client) -> Self {
        Self { client }
    }
}

fn storage_error<E: std::error::Error>(operation: &'static str, err: E) -> GatewayError {
    GatewayError::storage(operation, DisplayErrorContext(err).to_string())
}

fn signing_error<E: std::error::Error>(err: E) -> GatewayError {
    GatewayError::signing(DisplayErrorContext(err).to_string())
}

#[async_trait]
impl StorageClient for S3StorageClient {
    async fn enumerate_buckets(&self) -> Result<Vec<BucketDescriptor>> {
        let resp = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(|e| storage_error("list_buckets", e))?;

        Ok(resp
            .buckets()
            .iter()
            .map(|bucket| BucketDescriptor {
                name: bucket.name().unwrap_or_default().to_string(),
                creation_date: bucket
                    .creation_date()
                    .and_then(|dt| dt.fmt(DateTimeFormat::DateTime).ok()),
            })
            .collect())
    }

    async fn fetch_object(&self, handle: &ObjectHandle) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get_object()
            .bucket(&handle.bucket)
            .key(&handle.key)
            .send()
            .await
            .map_err(|e| storage_error("get_object", e))?;

        let data = resp
            .body
            .collect()
            .await
            .map_err(|e| storage_error("get_object", e))?;

        Ok(data.into_bytes().to_vec())
    }

    async fn write_object(&self, handle: &ObjectHandle, data: Vec<u8>) -> Result<()> {
        self.client
            .put_object()
            .bucket(&handle.bucket)
            .key(&handle.key)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| storage_error("put_object", e))?;
        Ok(())
    }

    async fn delete_object(&self, handle: &ObjectHandle) -> Result<()> {
        // S3 answers DeleteObject with 204 for keys that never existed.
        // The check and the delete are separate requests, so a concurrent
        // writer can still create or remove the key in between.
        self.client
            .head_object()
            .bucket(&handle.bucket)
            .key(&handle.key)
            .send()
            .await
            .map_err(|e| storage_error("delete_object", e))?;

        self.client
            .delete_object()
            .bucket(&handle.bucket)
            .key(&handle.key)
            .send()
            .await
            .map_err(|e| storage_error("delete_object", e))?;
        Ok(())
    }

    async fn generate_delegated_url(
        &self,
        method: AccessMethod,
        handle: &ObjectHandle,
        expires_in: Duration,
    ) -> Result<String> {
        let request = self.presign(method, handle, expires_in).await?;
        Ok(request.uri().to_string())
    }
}

impl S3StorageClient {
    async fn presign(
        &self,
        method: AccessMethod,
        handle: &ObjectHandle,
        expires_in: Duration,
    ) -> Result<PresignedRequest> {
        let config = PresigningConfig::expires_in(expires_in).map_err(signing_error)?;

        match method {
            AccessMethod::Get => self
                .client
                .get_object()
                .bucket(&handle.bucket)
                .key(&handle.key)
                .presigned(config)
                .await
                .map_err(signing_error),
            AccessMethod::Put => self
                .client
                .put_object()
                .bucket(&handle.bucket)
                .key(&handle.key)
                .presigned(config)
                .await
                .map_err(signing_error),
        }
    }
}
