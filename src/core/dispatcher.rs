use crate::core::command::Command;
use crate::domain::model::{
    AccessMethod, AccessMode, ObjectHandle, PresignedUrl, Request, Response, ResponseBody,
    DELEGATED_URL_EXPIRY,
};
use crate::domain::ports::StorageClient;
use crate::utils::error::{GatewayError, Result};
use std::sync::Arc;

pub const INVALID_OPERATION: &str = "Invalid operation";
pub const OBJECT_CREATED: &str = "Object created";
pub const OBJECT_DELETED: &str = "Object deleted";

/// Routes one request to one storage call and shapes the response.
///
/// Only signing failures on the delegated branches are turned into a 400.
/// Direct-mode storage failures come back as `Err` for the host to surface.
pub struct Dispatcher<S: StorageClient> {
    storage: Arc<S>,
}

impl<S: StorageClient> Clone for Dispatcher<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
        }
    }
}

impl<S: StorageClient> Dispatcher<S> {
    pub fn new(storage: S) -> Self {
        Self::from_shared(Arc::new(storage))
    }

    pub fn from_shared(storage: Arc<S>) -> Self {
        Self { storage }
    }

    pub async fn dispatch(&self, request: Request) -> Result<Response> {
        let Some(command) = Command::parse(&request) else {
            tracing::warn!(operation = ?request.operation, "Rejecting request with invalid operation");
            return Ok(Response::bad_request(INVALID_OPERATION));
        };

        tracing::info!(
            operation = command.operation().as_str(),
            bucket = request.bucket.as_deref().unwrap_or_default(),
            key = request.key.as_deref().unwrap_or_default(),
            presigned = request.presigned,
            "Dispatching storage operation"
        );

        match command {
            Command::List => {
                let buckets = self.storage.enumerate_buckets().await?;
                tracing::debug!("Found {} buckets", buckets.len());
                Ok(Response::ok(ResponseBody::Buckets(buckets)))
            }
            Command::Get {
                handle,
                mode: AccessMode::Delegated,
            } => self.delegate(AccessMethod::Get, &handle).await,
            Command::Get {
                handle,
                mode: AccessMode::Direct,
            } => {
                let bytes = self.storage.fetch_object(&handle).await?;
                let text = String::from_utf8(bytes)?;
                Ok(Response::ok(ResponseBody::Text(text)))
            }
            Command::Put {
                handle,
                mode: AccessMode::Delegated,
                ..
            } => self.delegate(AccessMethod::Put, &handle).await,
            Command::Put {
                handle,
                payload,
                mode: AccessMode::Direct,
            } => {
                tracing::debug!("Writing {} bytes", payload.len());
                self.storage.write_object(&handle, payload).await?;
                Ok(Response::ok(ResponseBody::Message(OBJECT_CREATED.to_string())))
            }
            Command::Delete { handle } => {
                self.storage.delete_object(&handle).await?;
                Ok(Response::ok(ResponseBody::Message(OBJECT_DELETED.to_string())))
            }
        }
    }

    async fn delegate(&self, method: AccessMethod, handle: &ObjectHandle) -> Result<Response> {
        match self
            .storage
            .generate_delegated_url(method, handle, DELEGATED_URL_EXPIRY)
            .await
        {
            Ok(url) => Ok(Response::ok(ResponseBody::Url(PresignedUrl { url }))),
            Err(GatewayError::SigningError { message }) => {
                tracing::warn!(?method, "Delegated URL signing failed: {}", message);
                Ok(Response::bad_request(message))
            }
            Err(e) => Err(e),
        }
    }
}
