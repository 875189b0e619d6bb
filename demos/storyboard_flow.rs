//! Full storyboard flow: prompt -> image sequence -> pick a frame ->
//! animate it -> record the result in the session.
//!
//! Requires `FAL_KEY` and `LUMA_API_KEY` in the environment.
//!
//! ```sh
//! FAL_KEY=... LUMA_API_KEY=... cargo run --example storyboard_flow -- "<prompt>"
//! ```

use dreamboard::{
    GenerationRequest, ImageConfig, ImageSequenceClient, StoryboardSession, VideoConfig,
    VideoJobDriver,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let prompt = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "a lighthouse keeper's morning, stormy coast".to_string());

    let images = ImageSequenceClient::new(ImageConfig::from_env()?)?;
    let driver = VideoJobDriver::luma(VideoConfig::from_env()?)?;
    let mut session = StoryboardSession::new();

    // Generate the frame sequence
    session.begin_generation();
    let frames = match images.generate_sequence(&prompt).await {
        Ok(frames) => {
            session.finish_generation(frames.clone());
            frames
        }
        Err(e) => {
            session.fail_generation(format!("Error generating images: {}", e));
            eprintln!("{}", session.last_error().unwrap_or("unknown error"));
            return Ok(());
        }
    };
    println!("Generated {} frames", frames.len());

    // Keep this sequence and animate its first frame
    session.save_current();
    let first = session.saved_sequences()[0][0].clone();
    session.toggle_selection(&first);
    session.open_video_popup(first);

    let target = session.video_popup_target().unwrap().to_string();
    let request = GenerationRequest::new(target, format!("{}, subtle motion", prompt));

    match driver.generate(&request).await {
        Ok(result) => {
            session.record_video(result.video_url);
            println!("Video ready: {}", session.generated_video().unwrap());
        }
        Err(e) => {
            session.fail_video(format!("Failed to generate video: {}", e));
            eprintln!("{}", session.last_error().unwrap());
        }
    }

    Ok(())
}
