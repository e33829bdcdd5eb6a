//! Per-tick input and the landmark source trait.

use std::collections::VecDeque;

use crate::{LandmarkFrame, Result};

/// What one video frame produced: a hand, or nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameInput {
    Hand(LandmarkFrame),
    NoHand { timestamp_ms: u64 },
}

impl FrameInput {
    pub fn timestamp_ms(&self) -> u64 {
        match self {
            FrameInput::Hand(frame) => frame.timestamp_ms(),
            FrameInput::NoHand { timestamp_ms } => *timestamp_ms,
        }
    }

    pub fn frame(&self) -> Option<&LandmarkFrame> {
        match self {
            FrameInput::Hand(frame) => Some(frame),
            FrameInput::NoHand { .. } => None,
        }
    }
}

/// Yields one [`FrameInput`] per video frame.
///
/// Implementations hold an already-initialized estimator: constructing one is
/// the "models loaded" step, so the engine never sees an unready source.
pub trait HandPoseSource {
    /// Next frame, or `Ok(None)` once the stream has ended.
    fn next_frame(&mut self) -> Result<Option<FrameInput>>;
}

/// In-memory source that replays a fixed list of inputs.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    frames: VecDeque<FrameInput>,
}

impl ScriptedSource {
    pub fn new(frames: impl IntoIterator<Item = FrameInput>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl HandPoseSource for ScriptedSource {
    fn next_frame(&mut self) -> Result<Option<FrameInput>> {
        Ok(self.frames.pop_front())
    }
}
