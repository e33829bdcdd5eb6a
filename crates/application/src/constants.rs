/// Raw tokens kept for voting (about half a second at 30 fps).
pub const HISTORY_CAPACITY: usize = 15;

/// Recency weight of the oldest history slot; the newest slot weighs 1.0.
pub const RECENCY_FLOOR: f32 = 0.4;

/// Added to a kind's hold delay to get the minimum gap between commits.
pub const COOLDOWN_MARGIN_MS: u64 = 500;

/// Consecutive hand-absent frames that end an utterance.
pub const ABSENCE_FRAMES: u32 = 8;

/// Minimum gap between two finalizations.
pub const FINALIZE_COOLDOWN_MS: u64 = 3000;

/// Letters need a long, deliberate hold.
pub const LETTER_HOLD_MS: u64 = 1200;

/// Words and commands are mostly motion gestures and should feel quick.
pub const WORD_HOLD_MS: u64 = 600;
pub const COMMAND_HOLD_MS: u64 = 600;
