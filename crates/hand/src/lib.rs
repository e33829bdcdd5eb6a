//! Hand-pose data model and the landmark source contract.
//!
//! The pose estimator itself lives outside this workspace. Anything that can
//! yield one [`FrameInput`] per video frame implements [`HandPoseSource`].

mod landmark;
mod source;

pub use landmark::{HandLandmark, LandmarkFrame, Point3, LANDMARK_COUNT};
pub use source::{FrameInput, HandPoseSource, ScriptedSource};

#[derive(Debug, thiserror::Error)]
pub enum HandError {
    #[error("expected {expected} landmarks, got {actual}")]
    InvalidLandmarkCount { expected: usize, actual: usize },
    #[error("landmark {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },
    #[error("hand source failed: {0}")]
    Source(String),
}

pub type Result<T> = std::result::Result<T, HandError>;
