//! Detector trait and the shared "current emotion" handle.

use std::sync::{Arc, RwLock};

use crate::tone::{EmotionReading, Tone};
use crate::Result;

/// Produces emotion readings on demand.
///
/// Implementations wrap an already-loaded face model. `Ok(None)` means no
/// face was found this time; callers keep the previous reading.
pub trait EmotionDetector: Send + Sync {
    fn detect(&self) -> Result<Option<EmotionReading>>;
}

/// Detector that always reports the same tone.
#[derive(Debug, Clone, Copy)]
pub struct FixedEmotion(pub EmotionReading);

impl FixedEmotion {
    pub fn new(tone: Tone) -> Self {
        Self(EmotionReading::new(tone, 1.0))
    }
}

impl EmotionDetector for FixedEmotion {
    fn detect(&self) -> Result<Option<EmotionReading>> {
        Ok(Some(self.0))
    }
}

/// Latest reading, written by the poller and read at finalization time.
///
/// Cloning shares the same slot.
#[derive(Debug, Clone, Default)]
pub struct SharedEmotion {
    inner: Arc<RwLock<EmotionReading>>,
}

impl SharedEmotion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> EmotionReading {
        match self.inner.read() {
            Ok(guard) => *guard,
            Err(poisoned) => {
                tracing::warn!("emotion lock poisoned, using last written value");
                *poisoned.into_inner()
            }
        }
    }

    pub fn set(&self, reading: EmotionReading) {
        match self.inner.write() {
            Ok(mut guard) => *guard = reading,
            Err(poisoned) => *poisoned.into_inner() = reading,
        }
    }

    pub fn reset(&self) {
        self.set(EmotionReading::default());
    }
}
