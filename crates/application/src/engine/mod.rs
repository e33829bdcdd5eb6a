//! Per-frame gesture engine.
//!
//! One call to [`GestureEngine::process`] runs the whole pipeline for one
//! video frame: feature extraction, classification, stabilization, the commit
//! decision and hand-loss finalization. The engine never calls out; it
//! returns the effects of the tick and the caller decides what to do with
//! them.

mod committer;
mod finalizer;
mod stabilizer;

pub use committer::{apply_commit, Commit, CommitStep, CommitTimers, Committer};
pub use finalizer::HandPresence;
pub use stabilizer::{StabilizedToken, TokenHistory, TokenStabilizer};

use handscribe_events::BufferEdit;
use handscribe_features::FeatureExtractor;
use handscribe_gesture::{classify, GestureToken};
use handscribe_hand::FrameInput;

use crate::config::{ConfigError, EngineConfig};

/// Something the caller should react to after a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEffect {
    /// The displayed gesture changed.
    Displayed { token: GestureToken },
    /// A token was typed into the buffer.
    Committed {
        token: GestureToken,
        edit: BufferEdit,
    },
    /// The hand left and the buffer was emitted.
    Finalized { text: String },
}

/// Result of one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutput {
    pub timestamp_ms: u64,
    /// This frame's classifier output.
    pub raw: GestureToken,
    /// Name of the rule that produced `raw`, if any.
    pub rule: Option<&'static str>,
    pub best: StabilizedToken,
    pub displayed: GestureToken,
    /// Buffer contents after the tick.
    pub buffer: String,
    pub effects: Vec<EngineEffect>,
}

impl TickOutput {
    /// Text finalized this tick, if any.
    pub fn finalized(&self) -> Option<&str> {
        self.effects.iter().find_map(|effect| match effect {
            EngineEffect::Finalized { text } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Owns all per-session state of the recognition pipeline.
pub struct GestureEngine {
    config: EngineConfig,
    extractor: FeatureExtractor,
    stabilizer: TokenStabilizer,
    committer: Committer,
    presence: HandPresence,
}

impl GestureEngine {
    /// Build an engine. A configuration that would leave a kind impossible to
    /// display or commit is rejected here.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            extractor: FeatureExtractor::new(config.features),
            stabilizer: TokenStabilizer::new(config.stabilizer, config.kinds),
            committer: Committer::new(config.kinds, config.cooldown_margin_ms),
            presence: HandPresence::new(config.finalizer),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current output buffer.
    pub fn buffer(&self) -> &str {
        self.committer.buffer()
    }

    /// Token shown as the live gesture.
    pub fn displayed(&self) -> GestureToken {
        self.committer.displayed()
    }

    pub fn history(&self) -> &TokenHistory {
        self.stabilizer.history()
    }

    /// Finalizer bookkeeping.
    pub fn presence(&self) -> &HandPresence {
        &self.presence
    }

    pub fn timers(&self) -> &CommitTimers {
        self.committer.timers()
    }

    /// Run the pipeline for one frame.
    pub fn process(&mut self, input: &FrameInput) -> TickOutput {
        let now = input.timestamp_ms();
        let mut effects = Vec::new();

        let (raw, rule) = match input {
            FrameInput::Hand(frame) => {
                self.presence.observe_hand();
                let features = self.extractor.extract(frame);
                let classification = classify(&features, &self.config.classifier);
                (classification.token, classification.rule)
            }
            FrameInput::NoHand { .. } => (GestureToken::NoHand, None),
        };
        let hand_present = matches!(input, FrameInput::Hand(_));

        let best = self.stabilizer.observe(raw);
        let step = self
            .committer
            .step(now, &best, self.stabilizer.history(), hand_present);

        if step.displayed_changed {
            effects.push(EngineEffect::Displayed {
                token: self.committer.displayed(),
            });
        }
        if let Some(commit) = step.commit {
            effects.push(EngineEffect::Committed {
                token: commit.token,
                edit: commit.edit,
            });
        }

        if !hand_present && self.presence.observe_absence(now) {
            match self.committer.take_utterance() {
                Some(text) => {
                    tracing::info!(text = %text, ts_ms = now, "utterance finalized");
                    effects.push(EngineEffect::Finalized { text });
                }
                None => tracing::debug!(ts_ms = now, "hand left with empty buffer"),
            }
        }

        TickOutput {
            timestamp_ms: now,
            raw,
            rule,
            best,
            displayed: self.committer.displayed(),
            buffer: self.committer.buffer().to_string(),
            effects,
        }
    }

    /// Drop the current utterance and all short-term state.
    pub fn reset(&mut self) {
        self.extractor.reset();
        self.stabilizer.clear();
        self.committer.reset();
        self.presence.reset();
        tracing::debug!("engine reset");
    }
}
