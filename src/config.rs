//! Client configuration
//!
//! One `ClientConfig` is built per process and handed to the pipeline
//! components explicitly; nothing here is ambient global state.

use crate::error::{GenMediaError, Result};
use std::time::Duration;

/// Default image-generation model
pub const DEFAULT_IMAGE_MODEL_ID: &str = "amazon.nova-canvas-v1:0";
/// Default video-generation model
pub const DEFAULT_VIDEO_MODEL_ID: &str = "amazon.nova-reel-v1:0";

/// Configuration for endpoint and storage clients
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the inference runtime API
    pub endpoint_url: String,
    /// Base URL of the object-store gateway
    pub storage_url: String,
    /// Bearer token for both surfaces; `None` relies on ambient/anonymous access
    pub api_token: Option<String>,
    /// Model used for synchronous image tasks
    pub image_model_id: String,
    /// Model used for asynchronous video tasks
    pub video_model_id: String,
    /// Per-request HTTP timeout
    pub request_timeout: Duration,
    /// Fixed sleep between job-status polls
    pub poll_interval: Duration,
    /// Upper bound on a whole polling wait; `None` waits indefinitely
    pub poll_deadline: Option<Duration>,
}

impl ClientConfig {
    /// Create a configuration builder
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for `ClientConfig` with validation
#[derive(Debug, Clone)]
pub struct ClientConfigBuilder {
    endpoint_url: Option<String>,
    storage_url: Option<String>,
    api_token: Option<String>,
    image_model_id: String,
    video_model_id: String,
    request_timeout: Duration,
    poll_interval: Duration,
    poll_deadline: Option<Duration>,
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self {
            endpoint_url: None,
            storage_url: None,
            api_token: None,
            image_model_id: DEFAULT_IMAGE_MODEL_ID.to_string(),
            video_model_id: DEFAULT_VIDEO_MODEL_ID.to_string(),
            request_timeout: Duration::from_secs(300),
            poll_interval: Duration::from_secs(30),
            poll_deadline: Some(Duration::from_secs(30 * 60)),
        }
    }
}

impl ClientConfigBuilder {
    #[must_use]
    pub fn endpoint_url<S: Into<String>>(mut self, url: S) -> Self {
        self.endpoint_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn storage_url<S: Into<String>>(mut self, url: S) -> Self {
        self.storage_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn api_token<S: Into<String>>(mut self, token: S) -> Self {
        self.api_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn image_model_id<S: Into<String>>(mut self, model_id: S) -> Self {
        self.image_model_id = model_id.into();
        self
    }

    #[must_use]
    pub fn video_model_id<S: Into<String>>(mut self, model_id: S) -> Self {
        self.video_model_id = model_id.into();
        self
    }

    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Bound the total polling wait; pass `None` to wait indefinitely
    #[must_use]
    pub fn poll_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.poll_deadline = deadline;
        self
    }

    /// Validate and build the configuration
    ///
    /// # Errors
    /// - `InvalidConfig` for a missing endpoint/storage URL, an empty model
    ///   id, or a zero poll interval
    pub fn build(self) -> Result<ClientConfig> {
        let endpoint_url = self
            .endpoint_url
            .filter(|u| !u.is_empty())
            .ok_or_else(|| GenMediaError::invalid_config("endpoint URL is required"))?;
        let storage_url = self
            .storage_url
            .filter(|u| !u.is_empty())
            .ok_or_else(|| GenMediaError::invalid_config("storage URL is required"))?;

        if self.image_model_id.is_empty() || self.video_model_id.is_empty() {
            return Err(GenMediaError::invalid_config("model ids must be non-empty"));
        }
        if self.poll_interval.is_zero() {
            return Err(GenMediaError::invalid_config(
                "poll interval must be greater than zero",
            ));
        }

        Ok(ClientConfig {
            endpoint_url,
            storage_url,
            api_token: self.api_token,
            image_model_id: self.image_model_id,
            video_model_id: self.video_model_id,
            request_timeout: self.request_timeout,
            poll_interval: self.poll_interval,
            poll_deadline: self.poll_deadline,
        })
    }
}
