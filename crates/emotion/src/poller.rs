//! Emotion poller - background thread that keeps [`SharedEmotion`] fresh.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::detector::{EmotionDetector, SharedEmotion};

/// Default interval between detector calls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(750);

/// Polls an [`EmotionDetector`] off the frame loop.
pub struct EmotionPoller {
    running: Arc<AtomicBool>,
    handle: Option<std::thread::JoinHandle<()>>,
}

impl Default for EmotionPoller {
    fn default() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }
}

impl EmotionPoller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start polling `detector` into `target` at the default interval.
    pub fn start<D>(&mut self, detector: Arc<D>, target: SharedEmotion)
    where
        D: EmotionDetector + ?Sized + 'static,
    {
        self.start_with_interval(detector, target, DEFAULT_POLL_INTERVAL);
    }

    pub fn start_with_interval<D>(
        &mut self,
        detector: Arc<D>,
        target: SharedEmotion,
        interval: Duration,
    ) where
        D: EmotionDetector + ?Sized + 'static,
    {
        if self.running.load(Ordering::SeqCst) {
            tracing::warn!("EmotionPoller already running");
            return;
        }

        self.running.store(true, Ordering::SeqCst);
        let running = Arc::clone(&self.running);

        let handle = std::thread::spawn(move || {
            tracing::info!("EmotionPoller started with interval {:?}", interval);

            while running.load(Ordering::SeqCst) {
                match detector.detect() {
                    Ok(Some(mut reading)) => {
                        reading.observed_at_ms = Some(chrono::Utc::now().timestamp_millis());
                        let previous = target.current();
                        if previous.tone != reading.tone {
                            tracing::debug!(
                                from = %previous.tone,
                                to = %reading.tone,
                                confidence = reading.confidence,
                                "tone changed"
                            );
                        }
                        target.set(reading);
                    }
                    // No face this time: keep the last reading.
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!("emotion detection failed: {}", e);
                    }
                }

                std::thread::sleep(interval);
            }

            tracing::info!("EmotionPoller stopped");
        });

        self.handle = Some(handle);
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);

        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Drop for EmotionPoller {
    fn drop(&mut self) {
        self.stop();
    }
}
