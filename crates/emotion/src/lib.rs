//! Emotion collaborator for handscribe.
//!
//! Face analysis runs on its own schedule, independent of the per-frame
//! gesture tick. This crate provides the seam between the two:
//!
//! ```text
//! ┌──────────────────┐   poll    ┌──────────────┐  write  ┌───────────────┐
//! │ EmotionDetector  │ ◀──────── │ EmotionPoller│ ──────▶ │ SharedEmotion │
//! └──────────────────┘ (thread)  └──────────────┘         └───────┬───────┘
//!                                                                 │ read at
//!                                                                 ▼ finalization
//!                                                          gesture session
//! ```
//!
//! Readings may be stale by up to one poll interval; that is acceptable for
//! labelling the tone of a finished utterance.
//!
//! `tone.rs` holds the pure mappings from face-expression probabilities and
//! blendshape scores to a [`Tone`].

mod detector;
mod poller;
mod tone;

pub use detector::{EmotionDetector, FixedEmotion, SharedEmotion};
pub use poller::{EmotionPoller, DEFAULT_POLL_INTERVAL};
pub use tone::{
    tone_from_blendshapes, tone_from_expressions, Blendshape, EmotionReading, FaceExpressions,
    Tone,
};

#[derive(Debug, thiserror::Error)]
pub enum EmotionError {
    #[error("detection failed: {0}")]
    Detection(String),
}

pub type Result<T> = std::result::Result<T, EmotionError>;
