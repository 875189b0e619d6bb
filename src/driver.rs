use std::future::Future;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;
use tokio::time::Instant;

use crate::config::VideoConfig;
use crate::error::{Result, VideoError};
use crate::luma::LumaClient;
use crate::types::{GenerationJob, GenerationRequest, JobState, JobStatus, Provider, VideoResult};

/// Substituted when a provider reports failure with no reason attached.
const MISSING_REASON: &str = "provider reported failure without a reason";

/// Transport seam between the poll protocol and a concrete provider.
///
/// [`LumaClient`] is the production implementation; tests drive the
/// driver with a scripted fake instead.
pub trait VideoBackend: Send + Sync {
    /// Submit a generation and return the provider-assigned job id.
    fn create_job(
        &self,
        request: &GenerationRequest,
    ) -> impl Future<Output = Result<String>> + Send;

    /// Fetch one status observation for a job.
    fn job_status(&self, id: &str) -> impl Future<Output = Result<JobStatus>> + Send;
}

/// Drives video generation jobs through submit-then-poll.
///
/// Submission is a single creation call; completion is a strictly
/// sequential poll loop with a fixed inter-poll delay, bounded by a
/// wall-clock deadline and an optional cancellation flag. Each
/// [`GenerationJob`] is exclusively owned by its caller, so independent
/// jobs can be driven concurrently without any shared state.
///
/// # Example
/// ```no_run
/// use dreamboard::{GenerationRequest, VideoConfig, VideoJobDriver};
///
/// # async fn example() -> dreamboard::Result<()> {
/// let driver = VideoJobDriver::luma(VideoConfig::from_env()?)?;
/// let request = GenerationRequest::new("https://img.example/frame.png", "slow pan right");
/// let result = driver.generate(&request).await?;
/// println!("video: {}", result.video_url);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct VideoJobDriver<B: VideoBackend> {
    backend: B,
    poll_interval: Duration,
    deadline: Duration,
    cancellation: Option<Arc<AtomicBool>>,
}

impl VideoJobDriver<LumaClient> {
    /// Create a driver backed by the Luma Dream Machine API.
    pub fn luma(config: VideoConfig) -> Result<Self> {
        let poll_interval = config.poll_interval;
        let deadline = config.deadline;
        Ok(Self::new(LumaClient::new(config)?, poll_interval, deadline))
    }

    /// Create a driver for a named engine.
    ///
    /// The capability check runs first: selecting an engine without a
    /// working implementation fails with `ProviderNotImplemented`
    /// before any transport is constructed or any request is sent.
    pub fn for_provider(provider: Provider, config: VideoConfig) -> Result<Self> {
        provider.ensure_implemented()?;
        Self::luma(config)
    }
}

impl<B: VideoBackend> VideoJobDriver<B> {
    /// Create a driver over an arbitrary backend.
    pub fn new(backend: B, poll_interval: Duration, deadline: Duration) -> Self {
        Self {
            backend,
            poll_interval,
            deadline,
            cancellation: None,
        }
    }

    /// Attach a cancellation flag checked before every poll.
    ///
    /// Setting the flag makes the next loop iteration return
    /// [`VideoError::Cancelled`], so a closed UI surface can stop its
    /// polling instead of leaking it in the background.
    pub fn with_cancellation(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancellation = Some(cancel);
        self
    }

    /// Get a reference to the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn check_cancelled(&self) -> Result<()> {
        if let Some(ref cancel) = self.cancellation {
            if cancel.load(Ordering::Relaxed) {
                return Err(VideoError::Cancelled);
            }
        }
        Ok(())
    }

    // ── Submit ──────────────────────────────────────────────────────

    /// Submit a request and return the `Pending` job carrying its id.
    ///
    /// Never polls. Any error here means no poll loop ever starts for
    /// this request.
    pub async fn submit(&self, request: &GenerationRequest) -> Result<GenerationJob> {
        request.provider.ensure_implemented()?;
        if request.image_url.trim().is_empty() {
            return Err(VideoError::InvalidRequest(
                "image reference must not be empty".into(),
            ));
        }

        let id = self.backend.create_job(request).await?;
        eprintln!("[dreamboard] Generation {} accepted by {}", id, request.provider);
        Ok(GenerationJob::pending(id))
    }

    // ── Await completion ────────────────────────────────────────────

    /// Poll the job until it reaches a terminal state.
    ///
    /// One status request is in flight at a time, with the configured
    /// delay between observations. The loop stops on a terminal state,
    /// the wall-clock deadline (`Timeout`), the cancellation flag
    /// (`Cancelled`), or a transport error; nothing is retried here.
    ///
    /// Calling this on an already-terminal job resolves from the job's
    /// recorded fields without touching the network.
    pub async fn await_completion(&self, job: &mut GenerationJob) -> Result<VideoResult> {
        if job.id.is_empty() {
            return Err(VideoError::SubmissionRejected);
        }
        if let Some(outcome) = resolve_terminal(job) {
            return outcome;
        }

        let deadline = Instant::now() + self.deadline;
        loop {
            self.check_cancelled()?;
            if Instant::now() >= deadline {
                return Err(VideoError::Timeout);
            }

            let status = self.backend.job_status(&job.id).await?;
            job.apply(status);

            if let Some(outcome) = resolve_terminal(job) {
                return outcome;
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Submit and wait in one call, the shape UI flows typically use.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<VideoResult> {
        let mut job = self.submit(request).await?;
        self.await_completion(&mut job).await
    }
}

/// Map a terminal job to its outcome; `None` while still pending.
///
/// `Completed` without the asset is `IncompleteResult`, a malformed
/// success payload, distinct from a provider-declared failure.
fn resolve_terminal(job: &GenerationJob) -> Option<Result<VideoResult>> {
    match job.state {
        JobState::Pending => None,
        JobState::Completed => Some(match job.video_url.clone() {
            Some(video_url) => Ok(VideoResult { video_url }),
            None => Err(VideoError::IncompleteResult),
        }),
        JobState::Failed => Some(Err(VideoError::ProviderFailed(
            job.failure_reason
                .clone()
                .unwrap_or_else(|| MISSING_REASON.to_string()),
        ))),
    }
}
