//! Shared fixtures: scripted endpoint and in-memory object store

// Not every test binary uses every fixture, and the fixtures are only
// `pub` for the sibling test binaries that include this module.
#![allow(dead_code)]
#![allow(unreachable_pub)]

use async_trait::async_trait;
use genmedia::endpoint::AsyncInvokeState;
use genmedia::{GenMediaError, JobStatus, ModelEndpoint, ObjectStore, Result, TransportErrorKind};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// One scripted answer to a status poll
#[derive(Debug, Clone)]
pub enum PollScript {
    Status(JobStatus),
    TransportError(String),
}

/// Scripted `ModelEndpoint` that records every call
pub struct MockEndpoint {
    pub arn: String,
    /// Raw body returned by synchronous invocations
    pub invoke_response: Vec<u8>,
    /// Poll answers, consumed in order; the last entry repeats
    script: Mutex<Vec<PollScript>>,
    polls: AtomicUsize,
    submissions: Mutex<Vec<(String, serde_json::Value, String)>>,
    invocations: Mutex<Vec<(String, serde_json::Value)>>,
}

impl MockEndpoint {
    pub fn new(arn: &str, invoke_response: &str, script: Vec<PollScript>) -> Self {
        Self {
            arn: arn.to_string(),
            invoke_response: invoke_response.as_bytes().to_vec(),
            script: Mutex::new(script),
            polls: AtomicUsize::new(0),
            submissions: Mutex::new(Vec::new()),
            invocations: Mutex::new(Vec::new()),
        }
    }

    pub fn sync_only(invoke_response: &str) -> Self {
        Self::new("arn:unused", invoke_response, vec![])
    }

    pub fn poll_count(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }

    /// `(model_id, model_input, output_uri)` of each submission
    pub fn submissions(&self) -> Vec<(String, serde_json::Value, String)> {
        self.submissions.lock().unwrap().clone()
    }

    /// `(model_id, request_body)` of each synchronous invocation
    pub fn invocations(&self) -> Vec<(String, serde_json::Value)> {
        self.invocations.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelEndpoint for MockEndpoint {
    async fn invoke_model(&self, model_id: &str, body: &[u8]) -> Result<Vec<u8>> {
        let parsed: serde_json::Value = serde_json::from_slice(body).expect("request body is JSON");
        self.invocations
            .lock()
            .unwrap()
            .push((model_id.to_string(), parsed));
        Ok(self.invoke_response.clone())
    }

    async fn start_async_invoke(
        &self,
        model_id: &str,
        model_input: &serde_json::Value,
        output_uri: &str,
    ) -> Result<String> {
        self.submissions.lock().unwrap().push((
            model_id.to_string(),
            model_input.clone(),
            output_uri.to_string(),
        ));
        Ok(self.arn.clone())
    }

    async fn get_async_invoke(&self, _invocation_arn: &str) -> Result<AsyncInvokeState> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        let mut script = self.script.lock().unwrap();
        let step = if script.len() > 1 {
            script.remove(0)
        } else {
            script.first().cloned().expect("poll script is non-empty")
        };
        match step {
            PollScript::Status(status) => Ok(AsyncInvokeState {
                status,
                failure_message: None,
            }),
            PollScript::TransportError(message) => {
                Err(GenMediaError::transport(TransportErrorKind::Other, message))
            },
        }
    }
}

/// In-memory `ObjectStore` that records writes
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, container: &str, key: &str, bytes: &[u8]) {
        self.objects
            .lock()
            .unwrap()
            .insert((container.to_string(), key.to_string()), bytes.to_vec());
    }

    pub fn written_keys(&self) -> Vec<(String, String)> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.lock().unwrap().is_empty()
    }
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
        self.insert(container, key, bytes);
        Ok(())
    }
}

/// A 1x1 RGBA PNG, transport-encoded the way the endpoint returns images
pub fn encoded_sample_png() -> String {
    genmedia::payload::encode(&sample_png())
}

/// A 1x1 RGBA PNG as raw bytes
pub fn sample_png() -> Vec<u8> {
    let img = image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
        1,
        1,
        image::Rgba([1, 2, 3, 255]),
    ));
    let mut buffer = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buffer, image::ImageFormat::Png)
        .expect("encode sample png");
    buffer.into_inner()
}

/// Default test configuration pointing at unused placeholder URLs
pub fn test_config() -> genmedia::ClientConfig {
    genmedia::ClientConfig::builder()
        .endpoint_url("https://runtime.invalid")
        .storage_url("https://storage.invalid")
        .build()
        .expect("test config is valid")
}
