//! Gesture recognition and temporal commitment.
//!
//! ```text
//! FrameInput ──► FeatureExtractor ──► classify ──► TokenStabilizer
//!                                                        │
//!                    Utterance ◄── HandPresence ◄── Committer (buffer)
//! ```
//!
//! [`GestureEngine`] runs that pipeline once per frame and returns the
//! effects. [`SignSession`] wires it to the emotion reading, the downstream
//! callback and an optional event sink; [`drive`] pulls frames from a
//! [`handscribe_hand::HandPoseSource`] until it runs dry.

mod config;
mod constants;
mod driver;
mod engine;
mod session;

pub use config::{
    ConfigError, EngineConfig, FinalizerSettings, KindPolicies, KindPolicy, StabilizerSettings,
};
pub use constants::*;
pub use driver::{drive, DriveSummary};
pub use engine::{
    apply_commit, Commit, CommitStep, CommitTimers, Committer, EngineEffect, GestureEngine,
    HandPresence, StabilizedToken, TickOutput, TokenHistory, TokenStabilizer,
};
pub use session::{SignSession, Utterance, UtteranceCallback};
