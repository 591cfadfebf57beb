//! HTTP client for a deployed gateway.
//!
//! Routes mirror the API Gateway resources in front of the Lambda:
//! `GET /s3/list`, and `GET|PUT|DELETE /s3/{bucket}/{key}` with an optional
//! `presigned=true` query. Presigned transfers fetch the URL from the gateway
//! and then talk to storage directly, without the API key.

use crate::domain::model::PresignedUrl;
use crate::utils::error::{GatewayError, Result};
use reqwest::{Client, Method, Response};
use std::path::Path;
use url::Url;

pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: Client,
    base_url: Url,
    api_key: String,
}

impl GatewayClient {
    pub fn new(api_url: &str, api_key: &str) -> Result<Self> {
        Ok(Self {
            http: Client::new(),
            base_url: Url::parse(api_url)?,
            api_key: api_key.to_string(),
        })
    }

    fn endpoint(&self, segments: &[&str], presigned: bool) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::ConfigError {
                message: format!("API URL cannot be a base: {}", self.base_url),
            })?
            .pop_if_empty()
            .push("s3")
            .extend(segments);
        if presigned {
            url.query_pairs_mut().append_pair("presigned", "true");
        }
        Ok(url)
    }

    async fn send(&self, method: Method, url: Url, body: Option<Vec<u8>>) -> Result<Response> {
        tracing::debug!("{} {}", method, url);
        let mut request = self
            .http
            .request(method, url)
            .header(API_KEY_HEADER, &self.api_key);
        if let Some(body) = body {
            request = request.body(body);
        }
        check_status(request.send().await?).await
    }

    async fn presigned_url(&self, method: Method, bucket: &str, key: &str) -> Result<String> {
        let url = self.endpoint(&[bucket, key], true)?;
        let presigned: PresignedUrl = self.send(method, url, None).await?.json().await?;
        tracing::debug!("Received presigned URL for {}/{}", bucket, key);
        Ok(presigned.url)
    }

    /// Raw JSON bucket listing as returned by the gateway.
    pub async fn list_buckets(&self) -> Result<String> {
        let url = self.endpoint(&["list"], false)?;
        Ok(self.send(Method::GET, url, None).await?.text().await?)
    }

    pub async fn get_object(&self, bucket: &str, key: &str, presigned: bool) -> Result<Vec<u8>> {
        let response = if presigned {
            let url = self.presigned_url(Method::GET, bucket, key).await?;
            check_status(self.http.get(url).send().await?).await?
        } else {
            let url = self.endpoint(&[bucket, key], false)?;
            self.send(Method::GET, url, None).await?
        };
        Ok(response.bytes().await?.to_vec())
    }

    pub async fn put_object(&self, bucket: &str, key: &str, data: Vec<u8>, presigned: bool) -> Result<()> {
        if presigned {
            let url = self.presigned_url(Method::PUT, bucket, key).await?;
            check_status(self.http.put(url).body(data).send().await?).await?;
        } else {
            let url = self.endpoint(&[bucket, key], false)?;
            self.send(Method::PUT, url, Some(data)).await?;
        }
        Ok(())
    }

    pub async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        let url = self.endpoint(&[bucket, key], false)?;
        self.send(Method::DELETE, url, None).await?;
        Ok(())
    }

    pub async fn download_to(&self, bucket: &str, key: &str, path: impl AsRef<Path>, presigned: bool) -> Result<usize> {
        let data = self.get_object(bucket, key, presigned).await?;
        tokio::fs::write(path.as_ref(), &data).await?;
        Ok(data.len())
    }

    pub async fn upload_from(&self, bucket: &str, key: &str, path: impl AsRef<Path>, presigned: bool) -> Result<usize> {
        let data = tokio::fs::read(path.as_ref()).await?;
        let len = data.len();
        self.put_object(bucket, key, data, presigned).await?;
        Ok(len)
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(GatewayError::GatewayResponseError {
        status: status.as_u16(),
        body,
    })
}
