//! Animate a single frame with the Dream Machine API.
//!
//! Requires `LUMA_API_KEY` in the environment.
//!
//! ```sh
//! LUMA_API_KEY=... cargo run --example generate_video -- <image-url> "<prompt>"
//! ```

use dreamboard::{GenerationRequest, VideoConfig, VideoJobDriver};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let image_url = args
        .next()
        .unwrap_or_else(|| "https://cdn.example/frame0.png".to_string());
    let prompt = args
        .next()
        .unwrap_or_else(|| "slow cinematic push in".to_string());

    let mut config = VideoConfig::from_env()?;
    // Tighter bound than the library default; a demo should not wait 10 minutes.
    config.deadline = Duration::from_secs(300);

    let driver = VideoJobDriver::luma(config)?;

    let request = GenerationRequest::new(image_url, prompt);
    println!("Submitting: {} ({})", request.prompt, request.image_url);

    let mut job = driver.submit(&request).await?;
    println!("Job id: {}", job.id);

    match driver.await_completion(&mut job).await {
        Ok(result) => println!("Video ready: {}", result.video_url),
        Err(e) => eprintln!("Generation failed: {}", e),
    }

    Ok(())
}
