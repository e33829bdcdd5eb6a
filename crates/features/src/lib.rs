//! Geometric feature extraction from hand landmarks.
//!
//! Turns one [`LandmarkFrame`](handscribe_hand::LandmarkFrame) into a
//! [`HandFeatures`] record. Every distance is divided by the hand scale
//! (wrist to middle knuckle) so thresholds downstream hold regardless of hand
//! size or distance from the camera.
//!
//! The only state is the wrist [`MotionBuffer`], which backs the motion
//! deltas measured over a trailing time window.

mod extract;
mod motion;

pub use extract::{FeatureExtractor, FeatureSettings, FingerStates, HandFeatures};
pub use motion::{MotionBuffer, MotionFeatures, MotionSample, MotionSettings};
