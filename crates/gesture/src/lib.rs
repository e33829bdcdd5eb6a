//! Gesture vocabulary and the ordered classification table.
//!
//! Classification is a pure function of [`HandFeatures`]: the rules in
//! [`RULES`] are evaluated top to bottom and the first match wins. The order
//! is the tie-break for shapes that satisfy several predicates, so it is part
//! of the contract and covered by tests.
//!
//! [`HandFeatures`]: handscribe_features::HandFeatures

mod classifier;
mod rules;
mod token;

pub use classifier::{classify, Classification};
pub use rules::{ClassifierThresholds, GestureRule, RULES};
pub use token::{GestureToken, TokenKind};
