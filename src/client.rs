//! Synchronous invocation client
//!
//! Builds a task request body, submits it to the inference endpoint, and
//! decodes the single synchronous response into output bytes or a
//! structured failure. No internal retry: transport failures propagate to
//! the caller untouched.

use crate::endpoint::ModelEndpoint;
use crate::error::{GenMediaError, Result, TransportErrorKind};
use crate::payload;
use crate::request::GenerationRequest;
use serde::Deserialize;
use std::sync::Arc;

/// Output of a single synchronous invocation or terminal job
#[derive(Debug, Clone)]
pub struct GenerationResult {
    /// Decoded output artifact
    pub bytes: Vec<u8>,
}

/// Synchronous response body from the inference endpoint
#[derive(Debug, Deserialize)]
struct InvocationResponse {
    #[serde(default)]
    images: Option<Vec<String>>,
    #[serde(default)]
    error: Option<String>,
}

/// Client for synchronous model invocations
#[derive(Clone)]
pub struct InvocationClient {
    endpoint: Arc<dyn ModelEndpoint>,
}

impl InvocationClient {
    pub fn new(endpoint: Arc<dyn ModelEndpoint>) -> Self {
        Self { endpoint }
    }

    /// Invoke `model_id` with `request` and decode the response.
    ///
    /// # Errors
    /// - `Generation` when the response carries a non-null error field
    /// - `EmptyResult` when the expected output field is absent or empty
    /// - `MalformedPayload` when the output is not valid transport encoding
    /// - `Transport` for remote-call failures, propagated untouched
    pub async fn invoke(
        &self,
        model_id: &str,
        request: &GenerationRequest,
    ) -> Result<GenerationResult> {
        tracing::info!(model_id, task = request.task_type(), "invoking model");

        let body = request.to_body()?;
        let raw = self.endpoint.invoke_model(model_id, &body).await?;

        let response: InvocationResponse = serde_json::from_slice(&raw).map_err(|e| {
            GenMediaError::transport(
                TransportErrorKind::MalformedResponse,
                format!("could not parse invocation response: {e}"),
            )
        })?;

        // The model reports semantic failures in-band; check before looking
        // at the output field.
        if let Some(detail) = response.error {
            return Err(GenMediaError::generation(detail));
        }

        let first = response
            .images
            .as_deref()
            .and_then(|images| images.first())
            .filter(|image| !image.is_empty())
            .ok_or(GenMediaError::EmptyResult)?;

        let bytes = payload::decode(first)?;
        tracing::info!(
            model_id,
            size = bytes.len(),
            "model invocation succeeded"
        );
        Ok(GenerationResult { bytes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct CannedEndpoint {
        body: Vec<u8>,
    }

    #[async_trait]
    impl ModelEndpoint for CannedEndpoint {
        async fn invoke_model(&self, _model_id: &str, _body: &[u8]) -> Result<Vec<u8>> {
            Ok(self.body.clone())
        }

        async fn start_async_invoke(
            &self,
            _model_id: &str,
            _model_input: &serde_json::Value,
            _output_uri: &str,
        ) -> Result<String> {
            unimplemented!("not used by these tests")
        }

        async fn get_async_invoke(
            &self,
            _invocation_arn: &str,
        ) -> Result<crate::endpoint::AsyncInvokeState> {
            unimplemented!("not used by these tests")
        }
    }

    fn client_for(body: &str) -> InvocationClient {
        InvocationClient::new(Arc::new(CannedEndpoint {
            body: body.as_bytes().to_vec(),
        }))
    }

    #[tokio::test]
    async fn test_decodes_first_image() {
        let encoded = payload::encode(b"pixels");
        let client = client_for(&format!(r#"{{"images": ["{encoded}"], "error": null}}"#));
        let request = GenerationRequest::background_removal(b"in");

        let result = client.invoke("image-model", &request).await.unwrap();
        assert_eq!(result.bytes, b"pixels");
    }

    #[tokio::test]
    async fn test_error_field_wins_over_images() {
        let encoded = payload::encode(b"pixels");
        let client = client_for(&format!(
            r#"{{"images": ["{encoded}"], "error": "some policy violation"}}"#
        ));
        let request = GenerationRequest::background_removal(b"in");

        let err = client.invoke("image-model", &request).await.unwrap_err();
        match err {
            GenMediaError::Generation(detail) => assert_eq!(detail, "some policy violation"),
            other => panic!("expected Generation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_images_is_empty_result() {
        for body in [
            r#"{"images": [], "error": null}"#,
            r#"{"images": null, "error": null}"#,
            r#"{"error": null}"#,
            r#"{"images": [""], "error": null}"#,
        ] {
            let client = client_for(body);
            let request = GenerationRequest::background_removal(b"in");
            let err = client.invoke("image-model", &request).await.unwrap_err();
            assert!(
                matches!(err, GenMediaError::EmptyResult),
                "expected EmptyResult for {body}, got {err:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_unparseable_response_is_malformed_transport() {
        let client = client_for("<html>gateway error</html>");
        let request = GenerationRequest::background_removal(b"in");
        let err = client.invoke("image-model", &request).await.unwrap_err();
        assert!(matches!(
            err,
            GenMediaError::Transport {
                kind: TransportErrorKind::MalformedResponse,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_invalid_base64_output_is_malformed_payload() {
        let client = client_for(r#"{"images": ["!!not-base64!!"], "error": null}"#);
        let request = GenerationRequest::background_removal(b"in");
        let err = client.invoke("image-model", &request).await.unwrap_err();
        assert!(matches!(err, GenMediaError::MalformedPayload(_)));
    }
}
