//! Shared event contracts for live feedback from the gesture engine.
//!
//! The engine itself only returns effects from each tick; a session turns
//! those into [`EngineEvent`]s and hands them to an [`EventSink`], so a UI,
//! a log, or a test can observe the stream without touching engine state.

mod sink;

pub use sink::{EventSink, EventSinkRef, NullSink, RecordingSink};

use handscribe_emotion::Tone;
use handscribe_gesture::{GestureToken, TokenKind};
use serde::{Deserialize, Serialize};

/// How a commit changed the output buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BufferEdit {
    AppendLetter,
    InsertSpace,
    DeleteLast,
    InsertWord,
    /// The commit went through but left the text as it was (a space after
    /// whitespace, a delete on an empty buffer).
    Unchanged,
}

/// The displayed gesture changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureDisplayedEvent {
    pub token: GestureToken,
    pub kind: TokenKind,
    pub label: String,
    pub ts_ms: u64,
}

/// A displayed gesture was typed into the buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextCommittedEvent {
    pub token: GestureToken,
    pub edit: BufferEdit,
    /// Buffer contents after the edit.
    pub buffer: String,
    pub ts_ms: u64,
}

/// The hand left the frame and the buffer was emitted as an utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtteranceFinalizedEvent {
    pub id: String,
    pub text: String,
    pub tone: Tone,
    #[serde(default)]
    pub confidence: f32,
    pub ts_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    GestureDisplayed(GestureDisplayedEvent),
    TextCommitted(TextCommittedEvent),
    UtteranceFinalized(UtteranceFinalizedEvent),
}

impl EngineEvent {
    pub fn topic(&self) -> &'static str {
        match self {
            EngineEvent::GestureDisplayed(_) => event_names::GESTURE_DISPLAYED,
            EngineEvent::TextCommitted(_) => event_names::TEXT_COMMITTED,
            EngineEvent::UtteranceFinalized(_) => event_names::UTTERANCE_FINALIZED,
        }
    }

    /// Single-line JSON encoding, for line-oriented consumers.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Event names as constants to prevent typos.
pub mod event_names {
    pub const GESTURE_DISPLAYED: &str = "gesture:displayed";
    pub const TEXT_COMMITTED: &str = "gesture:committed";
    pub const UTTERANCE_FINALIZED: &str = "utterance:finalized";
}
