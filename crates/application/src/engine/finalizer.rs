//! Session finalizer: ends an utterance when the hand leaves the frame.

use crate::config::FinalizerSettings;

/// Hand presence bookkeeping between finalizations.
#[derive(Debug, Clone)]
pub struct HandPresence {
    settings: FinalizerSettings,
    absent_frames: u32,
    hand_seen: bool,
    last_finalized_ms: Option<u64>,
}

impl HandPresence {
    /// Fresh state: no hand seen yet and no finalization on record.
    pub fn new(settings: FinalizerSettings) -> Self {
        Self {
            settings,
            absent_frames: 0,
            hand_seen: false,
            last_finalized_ms: None,
        }
    }

    /// A hand is in frame: clear the absence run and arm finalization.
    pub fn observe_hand(&mut self) {
        self.absent_frames = 0;
        self.hand_seen = true;
    }

    /// Count one hand-absent frame. Returns `true` when the caller must
    /// finalize now; the seen flag and counter are already reset.
    pub fn observe_absence(&mut self, now_ms: u64) -> bool {
        self.absent_frames = self.absent_frames.saturating_add(1);

        if self.absent_frames < self.settings.absence_frames || !self.hand_seen {
            return false;
        }
        if let Some(last) = self.last_finalized_ms {
            if now_ms.saturating_sub(last) <= self.settings.cooldown_ms {
                return false;
            }
        }

        self.absent_frames = 0;
        self.hand_seen = false;
        self.last_finalized_ms = Some(now_ms);
        true
    }

    /// Consecutive hand-absent frames so far.
    pub fn absent_frames(&self) -> u32 {
        self.absent_frames
    }

    /// Whether a hand appeared since the last finalization.
    pub fn hand_seen(&self) -> bool {
        self.hand_seen
    }

    /// When the last finalization fired, `None` before the first one.
    pub fn last_finalized_ms(&self) -> Option<u64> {
        self.last_finalized_ms
    }

    /// Back to the initial state, finalization cooldown included.
    pub fn reset(&mut self) {
        self.absent_frames = 0;
        self.hand_seen = false;
        self.last_finalized_ms = None;
    }
}
