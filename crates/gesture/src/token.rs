//! Gesture tokens and their kinds.

use serde::{Deserialize, Serialize};

/// Token kind. Governs how aggressively a token is stabilized and how it
/// mutates the output text when committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// "No hand" / "unclassified". Displayed, never typed.
    Sentinel,
    /// A single character typed as-is.
    Letter,
    /// Buffer edits (space, delete).
    Command,
    /// Whole words typed with surrounding spacing.
    Word,
}

impl TokenKind {
    /// Tie-break rank: word > command > letter > sentinel.
    pub fn rank(&self) -> u8 {
        match self {
            TokenKind::Sentinel => 0,
            TokenKind::Letter => 1,
            TokenKind::Command => 2,
            TokenKind::Word => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TokenKind::Sentinel => "sentinel",
            TokenKind::Letter => "letter",
            TokenKind::Command => "command",
            TokenKind::Word => "word",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One symbol from the closed vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GestureToken {
    /// No hand in frame.
    #[default]
    NoHand,
    /// Hand present but no rule matched.
    Unknown,

    A,
    B,
    C,
    D,
    E,
    I,
    L,
    S,
    T,
    U,
    V,
    Y,

    /// Single swipe towards the signer's right.
    Space,
    /// Single swipe towards the signer's left.
    Delete,

    /// Open-palm wave.
    Hello,
    /// Open palm moving down.
    ThankYou,
    /// Thumbs-up or nodding fist.
    Yes,
    /// Thumbs-down.
    No,
    /// Index, pinky and thumb extended.
    Love,
    /// Flat hand, fingers together, raised to the head.
    Goodbye,
    /// Open palm with the thumb tucked in.
    Help,
    /// Thumb and pinky out, hand held sideways.
    Call,
    /// Fist with the thumb pointing sideways at the signer.
    Me,
    /// Index finger pointing at the camera.
    You,
}

impl GestureToken {
    pub fn kind(&self) -> TokenKind {
        match self {
            GestureToken::NoHand | GestureToken::Unknown => TokenKind::Sentinel,
            GestureToken::Space | GestureToken::Delete => TokenKind::Command,
            GestureToken::Hello
            | GestureToken::ThankYou
            | GestureToken::Yes
            | GestureToken::No
            | GestureToken::Love
            | GestureToken::Goodbye
            | GestureToken::Help
            | GestureToken::Call
            | GestureToken::Me
            | GestureToken::You => TokenKind::Word,
            _ => TokenKind::Letter,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.kind() == TokenKind::Sentinel
    }

    /// Human-readable label for live display.
    pub fn label(&self) -> &'static str {
        match self {
            GestureToken::NoHand => "No Hand",
            GestureToken::Unknown => "...",
            GestureToken::Space => "SPACE",
            GestureToken::Delete => "DELETE",
            other => other.text().unwrap_or("?"),
        }
    }

    /// Text inserted when a letter or word commits.
    pub fn text(&self) -> Option<&'static str> {
        let text = match self {
            GestureToken::A => "A",
            GestureToken::B => "B",
            GestureToken::C => "C",
            GestureToken::D => "D",
            GestureToken::E => "E",
            GestureToken::I => "I",
            GestureToken::L => "L",
            GestureToken::S => "S",
            GestureToken::T => "T",
            GestureToken::U => "U",
            GestureToken::V => "V",
            GestureToken::Y => "Y",
            GestureToken::Hello => "HELLO",
            GestureToken::ThankYou => "THANK YOU",
            GestureToken::Yes => "YES",
            GestureToken::No => "NO",
            GestureToken::Love => "LOVE",
            GestureToken::Goodbye => "GOODBYE",
            GestureToken::Help => "HELP",
            GestureToken::Call => "CALL",
            GestureToken::Me => "ME",
            GestureToken::You => "YOU",
            GestureToken::NoHand
            | GestureToken::Unknown
            | GestureToken::Space
            | GestureToken::Delete => return None,
        };
        Some(text)
    }
}

impl std::fmt::Display for GestureToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_partition() {
        assert_eq!(GestureToken::NoHand.kind(), TokenKind::Sentinel);
        assert_eq!(GestureToken::Unknown.kind(), TokenKind::Sentinel);
        assert_eq!(GestureToken::A.kind(), TokenKind::Letter);
        assert_eq!(GestureToken::Space.kind(), TokenKind::Command);
        assert_eq!(GestureToken::Delete.kind(), TokenKind::Command);
        assert_eq!(GestureToken::Yes.kind(), TokenKind::Word);
        assert_eq!(GestureToken::ThankYou.kind(), TokenKind::Word);
        for word in [
            GestureToken::Goodbye,
            GestureToken::Help,
            GestureToken::Call,
            GestureToken::Me,
            GestureToken::You,
        ] {
            assert_eq!(word.kind(), TokenKind::Word);
            assert!(word.text().is_some());
        }
    }

    #[test]
    fn test_rank_ordering() {
        assert!(TokenKind::Word.rank() > TokenKind::Command.rank());
        assert!(TokenKind::Command.rank() > TokenKind::Letter.rank());
        assert!(TokenKind::Letter.rank() > TokenKind::Sentinel.rank());
    }

    #[test]
    fn test_letters_are_single_characters() {
        for token in [GestureToken::A, GestureToken::L, GestureToken::Y] {
            assert_eq!(token.text().unwrap().chars().count(), 1);
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(GestureToken::NoHand.to_string(), "No Hand");
        assert_eq!(GestureToken::ThankYou.to_string(), "THANK YOU");
        assert_eq!(GestureToken::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&GestureToken::ThankYou).unwrap();
        assert_eq!(json, "\"thank_you\"");
        let kind: TokenKind = serde_json::from_str("\"word\"").unwrap();
        assert_eq!(kind, TokenKind::Word);
    }
}
