//! Asynchronous job orchestration
//!
//! Long-running generations (text-to-video) are submitted as remote jobs:
//! the endpoint hands back an opaque invocation handle, the remote side
//! deposits the finished artifact directly into object storage, and the
//! orchestrator polls job status at a fixed interval until it reaches a
//! terminal state. The output location is derived deterministically from
//! the handle, so the caller can find the artifact without any extra
//! round-trip.

use crate::endpoint::ModelEndpoint;
use crate::error::{GenMediaError, Result};
use crate::locator::StorageLocator;
use crate::request::GenerationRequest;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Caller-visible job status. `Submitted` and `InProgress` on the remote
/// side both surface as `InProgress` here.
pub use crate::endpoint::AsyncInvokeStatus as JobStatus;

/// Handle to a submitted asynchronous generation job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationJob {
    handle: String,
    output_location: StorageLocator,
    status: JobStatus,
    failure_detail: Option<String>,
}

impl GenerationJob {
    /// Opaque invocation handle assigned by the remote side
    pub fn handle(&self) -> &str {
        &self.handle
    }

    /// Where the remote job writer deposits the finished artifact
    pub fn output_location(&self) -> &StorageLocator {
        &self.output_location
    }

    pub fn status(&self) -> &JobStatus {
        &self.status
    }

    /// Remote failure detail, present once the job has terminally failed
    pub fn failure_detail(&self) -> Option<&str> {
        self.failure_detail.as_deref()
    }

    /// Completed and Failed are terminal; the job never leaves them
    pub fn is_terminal(&self) -> bool {
        matches!(self.status, JobStatus::Completed | JobStatus::Failed)
    }
}

/// Polling behavior for `await_completion`
#[derive(Debug, Clone)]
pub struct PollSettings {
    /// Fixed sleep between status polls. Video jobs finish on the order of
    /// minutes, so a flat interval beats backoff here.
    pub interval: Duration,
    /// Upper bound on the total wait; `None` waits indefinitely
    pub deadline: Option<Duration>,
}

impl PollSettings {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
        }
    }

    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            deadline: Some(Duration::from_secs(30 * 60)),
        }
    }
}

/// Orchestrator for asynchronous generation jobs
#[derive(Clone)]
pub struct JobOrchestrator {
    endpoint: Arc<dyn ModelEndpoint>,
}

impl JobOrchestrator {
    pub fn new(endpoint: Arc<dyn ModelEndpoint>) -> Self {
        Self { endpoint }
    }

    /// Submit `request` for asynchronous generation, with the artifact to
    /// be written under `output_prefix`.
    ///
    /// The returned job's `output_location` is the prefix joined with the
    /// final `/`-separated segment of the invocation handle; the remote
    /// writer uses the same derivation, so this is how the caller locates
    /// the result.
    ///
    /// # Errors
    /// - `Submission` when the destination is not an object-store prefix or
    ///   the remote call fails (invalid destination, quota, auth)
    pub async fn submit(
        &self,
        model_id: &str,
        request: &GenerationRequest,
        output_prefix: &StorageLocator,
    ) -> Result<GenerationJob> {
        if !output_prefix.is_object_store() {
            return Err(GenMediaError::submission(format!(
                "output prefix '{output_prefix}' must be an object-store locator"
            )));
        }

        let model_input = serde_json::to_value(request).map_err(|e| {
            GenMediaError::submission(format!(
                "failed to serialize {} input: {e}",
                request.task_type()
            ))
        })?;

        // The remote side expects a directory-style prefix URI.
        let prefix_uri = format!("{}/", output_prefix.to_string().trim_end_matches('/'));

        let arn = self
            .endpoint
            .start_async_invoke(model_id, &model_input, &prefix_uri)
            .await
            .map_err(|e| GenMediaError::submission(e.to_string()))?;

        let suffix = arn.rsplit('/').next().unwrap_or(&arn);
        let output_location = output_prefix.join(suffix);

        tracing::info!(
            model_id,
            handle = %arn,
            output = %output_location,
            "submitted asynchronous generation job"
        );

        Ok(GenerationJob {
            handle: arn,
            output_location,
            status: JobStatus::InProgress,
            failure_detail: None,
        })
    }

    /// Refresh `job`'s status from the remote side, returning an updated
    /// job value. A terminal job is returned as-is without a remote call.
    ///
    /// # Errors
    /// - `Poll` on transport failure. A failed poll says nothing about the
    ///   job itself; the status is left untouched and callers may poll
    ///   again.
    pub async fn poll(&self, job: &GenerationJob) -> Result<GenerationJob> {
        if job.is_terminal() {
            return Ok(job.clone());
        }

        let state = self
            .endpoint
            .get_async_invoke(&job.handle)
            .await
            .map_err(|e| GenMediaError::poll(e.to_string()))?;

        tracing::debug!(handle = %job.handle, status = ?state.status, "polled job status");

        Ok(GenerationJob {
            handle: job.handle.clone(),
            output_location: job.output_location.clone(),
            status: state.status,
            failure_detail: state.failure_message,
        })
    }

    /// Poll `job` at the configured fixed interval until it reaches a
    /// terminal status, and return it at that moment. Returns without
    /// sleeping when the first poll is already terminal.
    ///
    /// A terminally `Failed` job is returned as an `Ok` value: the failure
    /// is a user-facing outcome, not a defect in the wait itself.
    ///
    /// # Errors
    /// - `Poll` if any single status poll fails; the wait is aborted
    /// - `DeadlineExceeded` when `settings.deadline` elapses first; the
    ///   remote job keeps running and the caller can resume waiting with
    ///   the same job value
    pub async fn await_completion(
        &self,
        job: GenerationJob,
        settings: &PollSettings,
    ) -> Result<GenerationJob> {
        let started = Instant::now();
        let mut current = job;

        loop {
            current = self.poll(&current).await?;
            if current.is_terminal() {
                tracing::info!(
                    handle = %current.handle,
                    status = ?current.status,
                    "job reached terminal status"
                );
                return Ok(current);
            }

            if let Some(deadline) = settings.deadline {
                if started.elapsed() >= deadline {
                    return Err(GenMediaError::DeadlineExceeded {
                        waited_secs: started.elapsed().as_secs(),
                    });
                }
            }

            tokio::time::sleep(settings.interval).await;
        }
    }
}
