//! Engine configuration and its one-time validation.
//!
//! Every threshold is tunable, but some combinations make a kind impossible to
//! display or commit. Those are rejected when the engine is built rather than
//! left as silent dead paths.

use std::path::Path;

use handscribe_features::FeatureSettings;
use handscribe_gesture::{ClassifierThresholds, TokenKind};
use serde::{Deserialize, Serialize};

use crate::constants::{
    ABSENCE_FRAMES, COMMAND_HOLD_MS, COOLDOWN_MARGIN_MS, FINALIZE_COOLDOWN_MS, HISTORY_CAPACITY,
    LETTER_HOLD_MS, RECENCY_FLOOR, WORD_HOLD_MS,
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("history capacity must be at least 1")]
    ZeroHistory,
    #[error("recency floor must be in (0, 1], got {0}")]
    RecencyFloor(f32),
    #[error("{kind} tokens can never be displayed: needs {count} of {capacity} history slots")]
    Undisplayable {
        kind: TokenKind,
        count: usize,
        capacity: usize,
    },
    #[error("{kind} tokens can never be committed: needs {count} of {capacity} history slots")]
    Uncommittable {
        kind: TokenKind,
        count: usize,
        capacity: usize,
    },
    #[error("{kind} {field} must not exceed the letter {field}")]
    KindOrdering {
        kind: TokenKind,
        field: &'static str,
    },
    #[error("kind weights must be positive and ordered word > command > letter > sentinel")]
    WeightOrder,
    #[error("motion buffer capacity and window must be non-zero")]
    EmptyMotionWindow,
    #[error("absence threshold must be at least 1 frame")]
    ZeroAbsenceFrames,
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config json: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Stabilization and commit policy for one token kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KindPolicy {
    /// Raw occurrences in history before the token can be displayed.
    pub display_min_count: usize,
    /// Raw occurrences in history before a displayed token can commit.
    pub commit_min_count: usize,
    /// Minimum time displayed before committing.
    pub hold_delay_ms: u64,
    /// Base vote weight.
    pub weight: f32,
}

impl KindPolicy {
    pub fn letter() -> Self {
        Self {
            display_min_count: 10,
            commit_min_count: 12,
            hold_delay_ms: LETTER_HOLD_MS,
            weight: 1.0,
        }
    }

    pub fn command() -> Self {
        Self {
            display_min_count: 5,
            commit_min_count: 7,
            hold_delay_ms: COMMAND_HOLD_MS,
            weight: 1.3,
        }
    }

    pub fn word() -> Self {
        Self {
            display_min_count: 4,
            commit_min_count: 6,
            hold_delay_ms: WORD_HOLD_MS,
            weight: 1.5,
        }
    }

    /// Sentinels are displayed but never committed.
    pub fn sentinel() -> Self {
        Self {
            display_min_count: 3,
            commit_min_count: 0,
            hold_delay_ms: 0,
            weight: 0.5,
        }
    }
}

/// Per-kind policies. Each policy is replaced as a whole when configured.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KindPolicies {
    #[serde(default = "KindPolicy::letter")]
    pub letter: KindPolicy,
    #[serde(default = "KindPolicy::command")]
    pub command: KindPolicy,
    #[serde(default = "KindPolicy::word")]
    pub word: KindPolicy,
    #[serde(default = "KindPolicy::sentinel")]
    pub sentinel: KindPolicy,
}

impl Default for KindPolicies {
    fn default() -> Self {
        Self {
            letter: KindPolicy::letter(),
            command: KindPolicy::command(),
            word: KindPolicy::word(),
            sentinel: KindPolicy::sentinel(),
        }
    }
}

impl KindPolicies {
    pub fn get(&self, kind: TokenKind) -> &KindPolicy {
        match kind {
            TokenKind::Letter => &self.letter,
            TokenKind::Command => &self.command,
            TokenKind::Word => &self.word,
            TokenKind::Sentinel => &self.sentinel,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilizerSettings {
    pub history_capacity: usize,
    pub recency_floor: f32,
}

impl Default for StabilizerSettings {
    fn default() -> Self {
        Self {
            history_capacity: HISTORY_CAPACITY,
            recency_floor: RECENCY_FLOOR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinalizerSettings {
    pub absence_frames: u32,
    pub cooldown_ms: u64,
}

impl Default for FinalizerSettings {
    fn default() -> Self {
        Self {
            absence_frames: ABSENCE_FRAMES,
            cooldown_ms: FINALIZE_COOLDOWN_MS,
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub stabilizer: StabilizerSettings,
    pub kinds: KindPolicies,
    pub cooldown_margin_ms: u64,
    pub finalizer: FinalizerSettings,
    pub features: FeatureSettings,
    pub classifier: ClassifierThresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stabilizer: StabilizerSettings::default(),
            kinds: KindPolicies::default(),
            cooldown_margin_ms: COOLDOWN_MARGIN_MS,
            finalizer: FinalizerSettings::default(),
            features: FeatureSettings::default(),
            classifier: ClassifierThresholds::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        tracing::info!("Loaded engine config from {:?}", path);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let capacity = self.stabilizer.history_capacity;
        if capacity == 0 {
            return Err(ConfigError::ZeroHistory);
        }

        let floor = self.stabilizer.recency_floor;
        if !(floor > 0.0 && floor <= 1.0) {
            return Err(ConfigError::RecencyFloor(floor));
        }

        for kind in [
            TokenKind::Sentinel,
            TokenKind::Letter,
            TokenKind::Command,
            TokenKind::Word,
        ] {
            let policy = self.kinds.get(kind);
            if policy.display_min_count == 0 || policy.display_min_count > capacity {
                return Err(ConfigError::Undisplayable {
                    kind,
                    count: policy.display_min_count,
                    capacity,
                });
            }
            if kind != TokenKind::Sentinel && policy.commit_min_count > capacity {
                return Err(ConfigError::Uncommittable {
                    kind,
                    count: policy.commit_min_count,
                    capacity,
                });
            }
        }

        let letter = &self.kinds.letter;
        for (kind, policy) in [
            (TokenKind::Command, &self.kinds.command),
            (TokenKind::Word, &self.kinds.word),
        ] {
            let field = if policy.hold_delay_ms > letter.hold_delay_ms {
                Some("hold delay")
            } else if policy.display_min_count > letter.display_min_count {
                Some("display count")
            } else if policy.commit_min_count > letter.commit_min_count {
                Some("commit count")
            } else {
                None
            };
            if let Some(field) = field {
                return Err(ConfigError::KindOrdering { kind, field });
            }
        }

        let k = &self.kinds;
        if !(k.sentinel.weight > 0.0
            && k.letter.weight > k.sentinel.weight
            && k.command.weight > k.letter.weight
            && k.word.weight > k.command.weight)
        {
            return Err(ConfigError::WeightOrder);
        }

        let motion = &self.features.motion;
        if motion.capacity == 0 || motion.window_ms == 0 {
            return Err(ConfigError::EmptyMotionWindow);
        }

        if self.finalizer.absence_frames == 0 {
            return Err(ConfigError::ZeroAbsenceFrames);
        }

        Ok(())
    }
}
