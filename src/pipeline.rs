//! End-to-end generation pipelines
//!
//! `GenerationPipeline` wires the resolver, codec, invocation client,
//! orchestrator, and transfer layer into the three task workflows. Each run
//! is a single linear pipeline on the caller's task; there is no shared
//! mutable state between invocations.

use crate::client::{GenerationResult, InvocationClient};
use crate::config::ClientConfig;
use crate::endpoint::{HttpModelEndpoint, ModelEndpoint};
use crate::error::Result;
use crate::imageops;
use crate::job::{GenerationJob, JobOrchestrator, PollSettings};
use crate::locator::StorageLocator;
use crate::request::{GenerationRequest, ImageGenerationConfig, VideoGenerationConfig};
use crate::transfer::{HttpObjectStore, ObjectStore, TransferService, CONTENT_TYPE_PNG};
use std::sync::Arc;

/// Options for background replacement via outpainting
#[derive(Debug, Clone)]
pub struct ReplaceBackgroundOptions {
    /// Natural-language description of the region to keep
    pub mask_prompt: String,
    pub cfg_scale: f32,
    /// Fixed seed; `None` draws a random one
    pub seed: Option<u32>,
}

impl Default for ReplaceBackgroundOptions {
    fn default() -> Self {
        Self {
            mask_prompt: "person".to_string(),
            cfg_scale: 8.0,
            seed: None,
        }
    }
}

/// Options for text-to-video generation
#[derive(Debug, Clone)]
pub struct VideoOptions {
    pub duration_seconds: u32,
    pub fps: u32,
    pub dimension: String,
    /// Fixed seed; `None` draws a random one
    pub seed: Option<u32>,
    /// Optional reference frame; resized to the model's dimensions
    pub reference_image: Option<Vec<u8>>,
}

impl Default for VideoOptions {
    fn default() -> Self {
        let defaults = VideoGenerationConfig::default();
        Self {
            duration_seconds: defaults.duration_seconds,
            fps: defaults.fps,
            dimension: defaults.dimension,
            seed: None,
            reference_image: None,
        }
    }
}

/// Assembled task pipelines over an endpoint and an object store
#[derive(Clone)]
pub struct GenerationPipeline {
    config: ClientConfig,
    client: InvocationClient,
    orchestrator: JobOrchestrator,
    transfer: TransferService,
}

impl GenerationPipeline {
    /// Build a pipeline with HTTP endpoint and store clients from `config`
    ///
    /// # Errors
    /// - HTTP client construction failures
    pub fn new(config: ClientConfig) -> Result<Self> {
        let endpoint = Arc::new(HttpModelEndpoint::new(
            &config.endpoint_url,
            config.api_token.clone(),
            config.request_timeout,
        )?);
        let store = Arc::new(HttpObjectStore::new(
            &config.storage_url,
            config.api_token.clone(),
            config.request_timeout,
        )?);
        Ok(Self::with_components(config, endpoint, store))
    }

    /// Build a pipeline over injected endpoint and store implementations
    pub fn with_components(
        config: ClientConfig,
        endpoint: Arc<dyn ModelEndpoint>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            config,
            client: InvocationClient::new(endpoint.clone()),
            orchestrator: JobOrchestrator::new(endpoint),
            transfer: TransferService::new(store),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn poll_settings(&self) -> PollSettings {
        let settings = PollSettings::new(self.config.poll_interval);
        match self.config.poll_deadline {
            Some(deadline) => settings.with_deadline(deadline),
            None => settings,
        }
    }

    /// Remove the background from the image bytes, returning PNG bytes with
    /// the subject on a transparent background
    ///
    /// # Errors
    /// - Any invocation, generation, or decoding failure per the error taxonomy
    pub async fn remove_background_bytes(&self, image_bytes: &[u8]) -> Result<Vec<u8>> {
        let request = GenerationRequest::background_removal(image_bytes);
        let result = self
            .client
            .invoke(&self.config.image_model_id, &request)
            .await?;
        self.reencode_png(result)
    }

    /// Replace the background of the image bytes with `background_prompt`,
    /// returning PNG bytes
    ///
    /// # Errors
    /// - Any invocation, generation, or decoding failure per the error taxonomy
    pub async fn replace_background_bytes(
        &self,
        image_bytes: &[u8],
        background_prompt: &str,
        options: &ReplaceBackgroundOptions,
    ) -> Result<Vec<u8>> {
        // The model requires three-channel input for outpainting.
        let rgb = imageops::ensure_rgb(imageops::decode(image_bytes)?);
        let rgb_png = imageops::encode_png(&rgb)?;

        let config = ImageGenerationConfig {
            cfg_scale: options.cfg_scale,
            seed: options.seed.unwrap_or_else(crate::request::random_image_seed),
            ..Default::default()
        };
        let request = GenerationRequest::outpainting(
            &rgb_png,
            background_prompt,
            &options.mask_prompt,
            config,
        );
        let result = self
            .client
            .invoke(&self.config.image_model_id, &request)
            .await?;
        self.reencode_png(result)
    }

    /// Submit a text-to-video job whose artifact the remote side writes
    /// under `output_prefix`. Returns immediately with the job handle.
    ///
    /// # Errors
    /// - `Submission` when the job cannot be started
    /// - `Image` when the reference frame cannot be prepared
    pub async fn start_video_job(
        &self,
        prompt: &str,
        options: &VideoOptions,
        output_prefix: &StorageLocator,
    ) -> Result<GenerationJob> {
        let reference_png = options
            .reference_image
            .as_deref()
            .map(imageops::prepare_reference_frame)
            .transpose()?;

        let config = VideoGenerationConfig {
            duration_seconds: options.duration_seconds,
            fps: options.fps,
            dimension: options.dimension.clone(),
            seed: options.seed.unwrap_or_else(crate::request::random_video_seed),
        };
        let request = GenerationRequest::text_to_video(prompt, reference_png.as_deref(), config);

        self.orchestrator
            .submit(&self.config.video_model_id, &request, output_prefix)
            .await
    }

    /// Wait for a submitted job to reach a terminal status, polling at the
    /// configured interval
    ///
    /// # Errors
    /// - `Poll` / `DeadlineExceeded` per the orchestrator's contract
    pub async fn await_video_job(&self, job: GenerationJob) -> Result<GenerationJob> {
        self.orchestrator
            .await_completion(job, &self.poll_settings())
            .await
    }

    /// Read the bytes a locator points at
    ///
    /// # Errors
    /// - Transfer-layer failures per the error taxonomy
    pub async fn read_input(&self, locator: &StorageLocator) -> Result<Vec<u8>> {
        self.transfer.read_input(locator).await
    }

    /// Write PNG output bytes to a locator
    ///
    /// # Errors
    /// - Transfer-layer failures per the error taxonomy
    pub async fn write_png_output(&self, bytes: &[u8], locator: &StorageLocator) -> Result<()> {
        self.transfer
            .write_output(bytes, locator, CONTENT_TYPE_PNG)
            .await
    }

    fn reencode_png(&self, result: GenerationResult) -> Result<Vec<u8>> {
        let image = imageops::decode(&result.bytes)?;
        imageops::encode_png(&image)
    }
}
