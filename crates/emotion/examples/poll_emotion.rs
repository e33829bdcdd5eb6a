//! Example: poll a fixed detector and print the shared reading.
//!
//! Run with: cargo run -p handscribe-emotion --example poll_emotion

use handscribe_emotion::{EmotionPoller, FixedEmotion, SharedEmotion, Tone};
use std::sync::Arc;
use std::time::Duration;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("handscribe_emotion=debug")
        .init();

    println!("=== Emotion Poller Example ===");

    let shared = SharedEmotion::new();
    let mut poller = EmotionPoller::new();
    poller.start_with_interval(
        Arc::new(FixedEmotion::new(Tone::Calm)),
        shared.clone(),
        Duration::from_millis(250),
    );

    for _ in 0..8 {
        std::thread::sleep(Duration::from_millis(250));
        let reading = shared.current();
        println!(
            "[{}] Tone: {:7} | confidence {:.2}",
            chrono::Local::now().format("%H:%M:%S%.3f"),
            reading.tone,
            reading.confidence
        );
    }

    poller.stop();
    println!("\nDone.");
}
