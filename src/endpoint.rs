//! Remote inference endpoint abstraction
//!
//! `ModelEndpoint` is the seam between this crate and the vendor's runtime
//! API. The production implementation speaks the runtime's REST surface via
//! `reqwest`; tests substitute scripted implementations.

use crate::error::{GenMediaError, Result, TransportErrorKind};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Remote status of an asynchronous generation job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AsyncInvokeStatus {
    InProgress,
    Completed,
    Failed,
}

/// Status response for an asynchronous invocation query
#[derive(Debug, Clone, Deserialize)]
pub struct AsyncInvokeState {
    pub status: AsyncInvokeStatus,
    /// Remote failure detail, present when status is Failed
    #[serde(default, rename = "failureMessage")]
    pub failure_message: Option<String>,
}

/// Trait for remote model endpoints
#[async_trait]
pub trait ModelEndpoint: Send + Sync {
    /// Submit a synchronous invocation and return the raw response body
    ///
    /// # Errors
    /// - `Transport` for any remote-call failure, classified by cause
    async fn invoke_model(&self, model_id: &str, body: &[u8]) -> Result<Vec<u8>>;

    /// Start an asynchronous invocation whose output artifact the remote
    /// side deposits under `output_uri`. Returns the opaque invocation
    /// handle (ARN).
    ///
    /// # Errors
    /// - `Transport` for any remote-call failure
    async fn start_async_invoke(
        &self,
        model_id: &str,
        model_input: &serde_json::Value,
        output_uri: &str,
    ) -> Result<String>;

    /// Query the status of an asynchronous invocation by handle
    ///
    /// # Errors
    /// - `Transport` for any remote-call failure
    async fn get_async_invoke(&self, invocation_arn: &str) -> Result<AsyncInvokeState>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StartAsyncInvokeBody<'a> {
    model_id: &'a str,
    model_input: &'a serde_json::Value,
    output_data_config: OutputDataConfig<'a>,
}

#[derive(Serialize)]
struct OutputDataConfig<'a> {
    #[serde(rename = "s3OutputDataConfig")]
    s3_output_data_config: S3OutputDataConfig<'a>,
}

#[derive(Serialize)]
struct S3OutputDataConfig<'a> {
    #[serde(rename = "s3Uri")]
    s3_uri: &'a str,
}

#[derive(Deserialize)]
struct StartAsyncInvokeResponse {
    #[serde(rename = "invocationArn")]
    invocation_arn: String,
}

/// HTTP implementation of `ModelEndpoint` against a runtime-shaped REST API
#[derive(Debug, Clone)]
pub struct HttpModelEndpoint {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl HttpModelEndpoint {
    /// Create an endpoint client for `base_url`
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
            .map_err(|e| {
                GenMediaError::transport(
                    TransportErrorKind::Other,
                    format!("failed to create HTTP client: {e}"),
                )
            })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
        })
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn check_status(url: &str, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let hint = response.text().await.unwrap_or_default();
        let hint = hint.chars().take(512).collect::<String>();
        Err(GenMediaError::from_http_status(status.as_u16(), url, &hint))
    }

    fn send_failure(url: &str, e: &reqwest::Error) -> GenMediaError {
        GenMediaError::transport(TransportErrorKind::Other, format!("{url}: {e}"))
    }
}

#[async_trait]
impl ModelEndpoint for HttpModelEndpoint {
    async fn invoke_model(&self, model_id: &str, body: &[u8]) -> Result<Vec<u8>> {
        let url = format!("{}/model/{}/invoke", self.base_url, model_id);
        tracing::debug!(model_id, url = %url, "invoking model");

        let response = self
            .authorize(self.client.post(&url))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::ACCEPT, "application/json")
            .body(body.to_vec())
            .send()
            .await
            .map_err(|e| Self::send_failure(&url, &e))?;

        let response = Self::check_status(&url, response).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Self::send_failure(&url, &e))?;
        Ok(bytes.to_vec())
    }

    async fn start_async_invoke(
        &self,
        model_id: &str,
        model_input: &serde_json::Value,
        output_uri: &str,
    ) -> Result<String> {
        let url = format!("{}/async-invoke", self.base_url);
        tracing::debug!(model_id, output_uri, url = %url, "starting async invocation");

        let body = StartAsyncInvokeBody {
            model_id,
            model_input,
            output_data_config: OutputDataConfig {
                s3_output_data_config: S3OutputDataConfig { s3_uri: output_uri },
            },
        };

        let response = self
            .authorize(self.client.post(&url))
            .json(&body)
            .send()
            .await
            .map_err(|e| Self::send_failure(&url, &e))?;

        let response = Self::check_status(&url, response).await?;
        let parsed: StartAsyncInvokeResponse = response.json().await.map_err(|e| {
            GenMediaError::transport(
                TransportErrorKind::MalformedResponse,
                format!("async invocation response from {url}: {e}"),
            )
        })?;
        Ok(parsed.invocation_arn)
    }

    async fn get_async_invoke(&self, invocation_arn: &str) -> Result<AsyncInvokeState> {
        let url = format!("{}/async-invoke/{}", self.base_url, invocation_arn);

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| Self::send_failure(&url, &e))?;

        let response = Self::check_status(&url, response).await?;
        response.json().await.map_err(|e| {
            GenMediaError::transport(
                TransportErrorKind::MalformedResponse,
                format!("status response from {url}: {e}"),
            )
        })
    }
}
