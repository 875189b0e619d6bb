//! # dreamboard
//!
//! Async toolkit for AI storyboard generation — image sequence
//! requests, Dream Machine video jobs, and in-memory session state.
//!
//! Two generation flows share one shape: submit, then poll. Image
//! sequences come back from a single request; video generation is
//! asynchronous on the provider side, so the [`VideoJobDriver`] submits
//! a job, polls the status endpoint at a fixed interval, and maps the
//! terminal state to a typed outcome.
//!
//! ## Features
//!
//! - **Submit-then-poll video driver** — fixed-interval polling with a
//!   wall-clock deadline, strictly sequential per job, concurrent
//!   across jobs
//! - **Cancellation** — abandon a poll loop via `Arc<AtomicBool>` when
//!   the initiating UI surface closes
//! - **Closed provider set** — unimplemented engines are rejected
//!   before any network I/O
//! - **Explicit configuration** — injected credentials and endpoints,
//!   so tests run against fakes
//! - **Distinguishable failures** — a provider-declared failure, a
//!   malformed success payload, a timeout, and a cancellation are all
//!   different errors
//! - **Session state** — sequences, frame selection, and popup state
//!   for a storyboard UI, with no persistence and no rendering
//!
//! ## Quick Start
//!
//! ```no_run
//! use dreamboard::{GenerationRequest, VideoConfig, VideoJobDriver};
//!
//! #[tokio::main]
//! async fn main() -> dreamboard::Result<()> {
//!     let driver = VideoJobDriver::luma(VideoConfig::from_env()?)?;
//!
//!     let request = GenerationRequest::new(
//!         "https://cdn.example/frame0.png",
//!         "slow dolly in, morning light",
//!     );
//!
//!     let mut job = driver.submit(&request).await?;
//!     let result = driver.await_completion(&mut job).await?;
//!     println!("video: {}", result.video_url);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod images;
pub mod luma;
pub mod session;
pub mod types;

pub use config::{VideoConfig, VideoConfigBuilder, DEFAULT_LUMA_ENDPOINT};
pub use driver::{VideoBackend, VideoJobDriver};
pub use error::{Result, VideoError};
pub use images::{ImageConfig, ImageError, ImageSequenceClient};
pub use luma::LumaClient;
pub use session::StoryboardSession;
pub use types::{
    GenerationJob, GenerationRequest, JobState, JobStatus, Provider, VideoResult,
};
