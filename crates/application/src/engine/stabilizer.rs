//! Token stabilization by weighted, recency-biased voting.

use std::collections::VecDeque;

use handscribe_gesture::{GestureToken, TokenKind};

use crate::config::{KindPolicies, StabilizerSettings};

/// Scores closer than this are treated as tied.
const SCORE_EPSILON: f32 = 1e-5;

/// Newest-first window of raw per-frame tokens.
#[derive(Debug, Clone)]
pub struct TokenHistory {
    tokens: VecDeque<GestureToken>,
    capacity: usize,
}

impl TokenHistory {
    /// Empty history holding at most `capacity` tokens.
    pub fn new(capacity: usize) -> Self {
        Self {
            tokens: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Push the newest token; the oldest drops off beyond capacity.
    pub fn push(&mut self, token: GestureToken) {
        self.tokens.push_front(token);
        self.tokens.truncate(self.capacity);
    }

    /// Tokens from newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &GestureToken> {
        self.tokens.iter()
    }

    /// Raw occurrences of `token`, ignoring recency.
    pub fn count(&self, token: GestureToken) -> usize {
        self.tokens.iter().filter(|t| **t == token).count()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }
}

/// The current best token after voting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StabilizedToken {
    pub token: GestureToken,
    pub kind: TokenKind,
    /// Raw occurrences in history.
    pub count: usize,
    /// Weighted vote.
    pub score: f32,
    /// `count` has reached the kind's display threshold.
    pub confident: bool,
}

#[derive(Debug, Clone, Copy)]
struct Tally {
    token: GestureToken,
    count: usize,
    score: f32,
    /// Slot of the newest occurrence (0 = newest).
    newest_slot: usize,
}

/// Turns a flickering raw stream into one best token per tick.
#[derive(Debug, Clone)]
pub struct TokenStabilizer {
    history: TokenHistory,
    recency_floor: f32,
    policies: KindPolicies,
}

impl TokenStabilizer {
    /// Empty stabilizer; `policies` supply per-kind weights and display counts.
    pub fn new(settings: StabilizerSettings, policies: KindPolicies) -> Self {
        Self {
            history: TokenHistory::new(settings.history_capacity),
            recency_floor: settings.recency_floor,
            policies,
        }
    }

    pub fn history(&self) -> &TokenHistory {
        &self.history
    }

    /// Record the newest raw token and return the current best.
    pub fn observe(&mut self, raw: GestureToken) -> StabilizedToken {
        self.history.push(raw);
        self.best()
    }

    /// Linear decay from 1.0 at the newest slot to the floor at the oldest
    /// retained slot.
    fn recency(&self, slot: usize) -> f32 {
        let len = self.history.len();
        if len <= 1 {
            return 1.0;
        }
        1.0 - (1.0 - self.recency_floor) * slot as f32 / (len - 1) as f32
    }

    /// Highest weighted score wins. Ties go to the higher kind rank, then the
    /// higher raw count, then the most recently seen token.
    pub fn best(&self) -> StabilizedToken {
        let mut tallies: Vec<Tally> = Vec::new();

        for (slot, token) in self.history.iter().enumerate() {
            let weight = self.policies.get(token.kind()).weight * self.recency(slot);
            match tallies.iter_mut().find(|t| t.token == *token) {
                Some(tally) => {
                    tally.count += 1;
                    tally.score += weight;
                }
                None => tallies.push(Tally {
                    token: *token,
                    count: 1,
                    score: weight,
                    newest_slot: slot,
                }),
            }
        }

        let winner = tallies.into_iter().reduce(|best, candidate| {
            if beats(&candidate, &best) {
                candidate
            } else {
                best
            }
        });

        match winner {
            Some(t) => {
                let kind = t.token.kind();
                StabilizedToken {
                    token: t.token,
                    kind,
                    count: t.count,
                    score: t.score,
                    confident: t.count >= self.policies.get(kind).display_min_count,
                }
            }
            None => StabilizedToken {
                token: GestureToken::NoHand,
                kind: TokenKind::Sentinel,
                count: 0,
                score: 0.0,
                confident: false,
            },
        }
    }

    /// Forget every observation.
    pub fn clear(&mut self) {
        self.history.clear();
    }
}

fn beats(a: &Tally, b: &Tally) -> bool {
    if (a.score - b.score).abs() > SCORE_EPSILON {
        return a.score > b.score;
    }
    let (rank_a, rank_b) = (a.token.kind().rank(), b.token.kind().rank());
    if rank_a != rank_b {
        return rank_a > rank_b;
    }
    if a.count != b.count {
        return a.count > b.count;
    }
    a.newest_slot < b.newest_slot
}
