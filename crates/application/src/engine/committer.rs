//! Commitment state machine: decides when the displayed gesture is typed.
//!
//! The committer owns the output buffer. A token first has to become the
//! displayed gesture (enough votes for its kind), then stay displayed past
//! its kind's hold delay with enough confirming votes, and finally clear the
//! cooldown since the previous commit.

use handscribe_events::BufferEdit;
use handscribe_gesture::{GestureToken, TokenKind};

use super::stabilizer::{StabilizedToken, TokenHistory};
use crate::config::KindPolicies;

/// Timestamps that gate hold time and cooldown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitTimers {
    /// `None` until the first commit, so the first commit has no cooldown.
    pub last_commit_ms: Option<u64>,
    pub last_committed: Option<GestureToken>,
    /// When the displayed token became displayed.
    pub active_since_ms: u64,
}

/// A token typed into the buffer this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Commit {
    pub token: GestureToken,
    pub edit: BufferEdit,
}

/// What changed during one committer step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitStep {
    pub displayed_changed: bool,
    pub commit: Option<Commit>,
}

#[derive(Debug, Clone)]
pub struct Committer {
    buffer: String,
    displayed: GestureToken,
    timers: CommitTimers,
    policies: KindPolicies,
    cooldown_margin_ms: u64,
}

impl Committer {
    /// Empty buffer, nothing displayed, no commit on record.
    pub fn new(policies: KindPolicies, cooldown_margin_ms: u64) -> Self {
        Self {
            buffer: String::new(),
            displayed: GestureToken::NoHand,
            timers: CommitTimers::default(),
            policies,
            cooldown_margin_ms,
        }
    }

    /// Text typed so far in the current utterance.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Token currently shown as the live gesture.
    pub fn displayed(&self) -> GestureToken {
        self.displayed
    }

    pub fn timers(&self) -> &CommitTimers {
        &self.timers
    }

    /// Advance one tick. Commits are only considered while a hand is present.
    ///
    /// A token held past the cooldown commits again, whatever its kind.
    pub fn step(
        &mut self,
        now_ms: u64,
        best: &StabilizedToken,
        history: &TokenHistory,
        hand_present: bool,
    ) -> CommitStep {
        let mut step = CommitStep::default();

        if best.token != self.displayed && best.confident {
            tracing::debug!(
                from = %self.displayed,
                to = %best.token,
                count = best.count,
                score = best.score,
                "displayed gesture changed"
            );
            self.displayed = best.token;
            self.timers.active_since_ms = now_ms;
            step.displayed_changed = true;
        }

        if hand_present && self.ready_to_commit(now_ms, history) {
            let token = self.displayed;
            let edit = apply_commit(&mut self.buffer, token);
            self.timers.last_commit_ms = Some(now_ms);
            self.timers.last_committed = Some(token);

            tracing::debug!(
                token = %token,
                edit = ?edit,
                buffer = %self.buffer,
                "committed"
            );
            step.commit = Some(Commit { token, edit });
        }

        step
    }

    fn ready_to_commit(&self, now_ms: u64, history: &TokenHistory) -> bool {
        let token = self.displayed;
        let kind = token.kind();
        if kind == TokenKind::Sentinel {
            return false;
        }

        let policy = self.policies.get(kind);
        if history.count(token) < policy.commit_min_count {
            return false;
        }
        if now_ms.saturating_sub(self.timers.active_since_ms) <= policy.hold_delay_ms {
            return false;
        }
        match self.timers.last_commit_ms {
            Some(last) => {
                now_ms.saturating_sub(last) > policy.hold_delay_ms + self.cooldown_margin_ms
            }
            None => true,
        }
    }

    /// Take the trimmed buffer and clear it. `None` when nothing was typed.
    pub fn take_utterance(&mut self) -> Option<String> {
        let text = self.buffer.trim().to_string();
        self.buffer.clear();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Clear the buffer and forget the displayed token. Commit timestamps
    /// survive so a reset cannot bypass the cooldown.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.displayed = GestureToken::NoHand;
    }
}

/// Apply one committed token to `buffer`.
pub fn apply_commit(buffer: &mut String, token: GestureToken) -> BufferEdit {
    match token.kind() {
        TokenKind::Letter => match token.text() {
            Some(text) => {
                buffer.push_str(text);
                BufferEdit::AppendLetter
            }
            None => BufferEdit::Unchanged,
        },
        TokenKind::Command => match token {
            GestureToken::Space => {
                if buffer.ends_with(char::is_whitespace) {
                    BufferEdit::Unchanged
                } else {
                    buffer.push(' ');
                    BufferEdit::InsertSpace
                }
            }
            GestureToken::Delete => match buffer.pop() {
                Some(_) => BufferEdit::DeleteLast,
                None => BufferEdit::Unchanged,
            },
            _ => BufferEdit::Unchanged,
        },
        TokenKind::Word => match token.text() {
            Some(text) => {
                let kept = buffer.trim_end().len();
                buffer.truncate(kept);
                if !buffer.is_empty() {
                    buffer.push(' ');
                }
                buffer.push_str(text);
                buffer.push(' ');
                BufferEdit::InsertWord
            }
            None => BufferEdit::Unchanged,
        },
        TokenKind::Sentinel => BufferEdit::Unchanged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StabilizerSettings;
    use crate::engine::stabilizer::TokenStabilizer;

    fn typed(tokens: &[GestureToken]) -> String {
        let mut buffer = String::new();
        for token in tokens {
            apply_commit(&mut buffer, *token);
        }
        buffer
    }

    #[test]
    fn test_letters_concatenate() {
        use GestureToken::*;
        assert_eq!(typed(&[A, B]), "AB");
        assert_eq!(typed(&[L, I, V, E]), "LIVE");
    }

    #[test]
    fn test_no_double_spaces() {
        use GestureToken::*;
        let buffer = typed(&[A, Space, Space, Space, B]);
        assert_eq!(buffer, "A B");
        assert!(!typed(&[Yes, Space, Space]).contains("  "));
    }

    #[test]
    fn test_space_on_empty_buffer() {
        let mut buffer = String::new();
        assert_eq!(
            apply_commit(&mut buffer, GestureToken::Space),
            BufferEdit::InsertSpace
        );
        assert_eq!(
            apply_commit(&mut buffer, GestureToken::Space),
            BufferEdit::Unchanged
        );
        assert_eq!(buffer, " ");
    }

    #[test]
    fn test_delete_on_empty_is_noop() {
        let mut buffer = String::new();
        assert_eq!(
            apply_commit(&mut buffer, GestureToken::Delete),
            BufferEdit::Unchanged
        );
        assert!(buffer.is_empty());

        let mut buffer = "AB".to_string();
        assert_eq!(
            apply_commit(&mut buffer, GestureToken::Delete),
            BufferEdit::DeleteLast
        );
        assert_eq!(buffer, "A");
    }

    #[test]
    fn test_word_spacing() {
        use GestureToken::*;
        assert_eq!(typed(&[Yes]), "YES ");
        assert_eq!(typed(&[Hello, Yes]), "HELLO YES ");
        assert_eq!(typed(&[A, B, Love]), "AB LOVE ");
        assert_eq!(typed(&[A, Space, Space, ThankYou]), "A THANK YOU ");
    }

    #[test]
    fn test_sentinels_never_edit() {
        let mut buffer = "HI".to_string();
        assert_eq!(
            apply_commit(&mut buffer, GestureToken::Unknown),
            BufferEdit::Unchanged
        );
        assert_eq!(buffer, "HI");
    }

    fn feed(
        committer: &mut Committer,
        stabilizer: &mut TokenStabilizer,
        token: GestureToken,
        from_ms: u64,
        frames: u64,
    ) -> Vec<(u64, Commit)> {
        let mut commits = Vec::new();
        for i in 0..frames {
            let now = from_ms + i * 33;
            let best = stabilizer.observe(token);
            let step = committer.step(now, &best, stabilizer.history(), true);
            if let Some(commit) = step.commit {
                commits.push((now, commit));
            }
        }
        commits
    }

    fn pipeline() -> (Committer, TokenStabilizer) {
        let policies = KindPolicies::default();
        (
            Committer::new(policies, 500),
            TokenStabilizer::new(StabilizerSettings::default(), policies),
        )
    }

    #[test]
    fn test_word_commits_after_hold() {
        let (mut committer, mut stabilizer) = pipeline();
        let commits = feed(&mut committer, &mut stabilizer, GestureToken::Yes, 0, 40);

        assert_eq!(commits.len(), 1);
        let (at, commit) = commits[0];
        // Displayed on the fourth frame, then held past 600 ms.
        assert!(at > 99 + 600);
        assert_eq!(commit.edit, BufferEdit::InsertWord);
        assert_eq!(committer.buffer(), "YES ");
    }

    #[test]
    fn test_held_word_repeats_after_cooldown() {
        let (mut committer, mut stabilizer) = pipeline();
        let commits = feed(&mut committer, &mut stabilizer, GestureToken::Yes, 0, 60);

        assert_eq!(commits.len(), 2);
        assert!(commits[1].0 - commits[0].0 > 600 + 500);
        assert_eq!(committer.buffer(), "YES YES ");
    }

    #[test]
    fn test_word_recommits_after_other_shape() {
        let (mut committer, mut stabilizer) = pipeline();
        let mut commits = feed(&mut committer, &mut stabilizer, GestureToken::Yes, 0, 40);
        commits.extend(feed(&mut committer, &mut stabilizer, GestureToken::S, 40 * 33, 6));
        commits.extend(feed(&mut committer, &mut stabilizer, GestureToken::Yes, 46 * 33, 20));

        let tokens: Vec<GestureToken> = commits.iter().map(|(_, c)| c.token).collect();
        assert_eq!(tokens, vec![GestureToken::Yes, GestureToken::Yes]);
        assert_eq!(committer.buffer(), "YES YES ");
    }

    #[test]
    fn test_held_letter_repeats_after_cooldown() {
        let (mut committer, mut stabilizer) = pipeline();
        let commits = feed(&mut committer, &mut stabilizer, GestureToken::A, 0, 120);

        assert!(commits.len() >= 2);
        let gap = commits[1].0 - commits[0].0;
        assert!(gap > 1200 + 500);
        assert!(committer.buffer().starts_with("AA"));
    }

    #[test]
    fn test_no_commit_without_hand() {
        let (mut committer, mut stabilizer) = pipeline();
        for i in 0..60 {
            let best = stabilizer.observe(GestureToken::Yes);
            let step = committer.step(i * 33, &best, stabilizer.history(), false);
            assert!(step.commit.is_none());
        }
        assert_eq!(committer.displayed(), GestureToken::Yes);
        assert!(committer.buffer().is_empty());
    }

    #[test]
    fn test_take_utterance_trims_and_clears() {
        let (mut committer, _) = pipeline();
        apply_commit(&mut committer.buffer, GestureToken::Hello);
        assert_eq!(committer.take_utterance().as_deref(), Some("HELLO"));
        assert!(committer.buffer().is_empty());
        assert_eq!(committer.take_utterance(), None);
    }
}
