//! The ordered rule table.
//!
//! Motion rules come first so an open-palm wave is never read as the static
//! open-palm letter. Sideways and pointing shapes follow, ahead of the
//! upright fist rules they would otherwise fall into. Within the static
//! rules, the more specific shape of a pair (C before B, HELP before B,
//! U before V, L before D, Y before I) is listed first.
//!
//! CALL is a thumb-and-pinky hand turned sideways. An upright one is Y.

use handscribe_features::HandFeatures;
use serde::{Deserialize, Serialize};

use crate::token::GestureToken;

/// Geometric thresholds, in hand scales unless noted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierThresholds {
    /// Thumb tip to index knuckle distance that counts as "thumb out".
    pub thumb_out_min: f32,
    pub wave_min_path: f32,
    pub wave_min_reversals: u32,
    pub swipe_min_dx: f32,
    pub down_min_dy: f32,
    pub nod_min_path: f32,
    pub nod_min_reversals: u32,
    pub thumbs_up_min_lift: f32,
    pub thumbs_down_min_drop: f32,
    pub c_max_thumb_to_middle: f32,
    pub c_max_finger_length: f32,
    /// Fraction of palm width.
    pub u_max_spread: f32,
    /// Multiple of palm width.
    pub a_min_thumb_to_pinky: f32,
    pub t_max_thumb_to_index: f32,
    pub l_min_thumb_to_index: f32,
    pub y_min_thumb_to_index: f32,
    /// Wrist height in raw image units; above this line counts as at the head.
    pub goodbye_max_wrist_y: f32,
    pub help_max_thumb_to_index: f32,
    pub call_min_tilt: f32,
    pub me_min_thumb_reach: f32,
    pub you_min_depth_lead: f32,
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        Self {
            thumb_out_min: 0.6,
            wave_min_path: 1.2,
            wave_min_reversals: 1,
            swipe_min_dx: 1.0,
            down_min_dy: 0.6,
            nod_min_path: 0.3,
            nod_min_reversals: 1,
            thumbs_up_min_lift: 0.5,
            thumbs_down_min_drop: 0.2,
            c_max_thumb_to_middle: 0.8,
            c_max_finger_length: 0.6,
            u_max_spread: 0.4,
            a_min_thumb_to_pinky: 1.2,
            t_max_thumb_to_index: 0.4,
            l_min_thumb_to_index: 0.7,
            y_min_thumb_to_index: 0.8,
            goodbye_max_wrist_y: 0.35,
            help_max_thumb_to_index: 0.4,
            call_min_tilt: 0.7,
            me_min_thumb_reach: 0.7,
            you_min_depth_lead: 0.5,
        }
    }
}

type Predicate = fn(&HandFeatures, &ClassifierThresholds) -> bool;

/// One row of the cascade.
#[derive(Clone, Copy)]
pub struct GestureRule {
    pub name: &'static str,
    pub token: GestureToken,
    pub matches: Predicate,
}

impl std::fmt::Debug for GestureRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureRule")
            .field("name", &self.name)
            .field("token", &self.token)
            .finish()
    }
}

const fn rule(name: &'static str, token: GestureToken, matches: Predicate) -> GestureRule {
    GestureRule {
        name,
        token,
        matches,
    }
}

/// Evaluated top to bottom; first match wins.
pub const RULES: &[GestureRule] = &[
    rule("hello_wave", GestureToken::Hello, hello_wave),
    rule("thank_you_down", GestureToken::ThankYou, thank_you_down),
    rule("swipe_left", GestureToken::Delete, swipe_left),
    rule("swipe_right", GestureToken::Space, swipe_right),
    rule("fist_nod", GestureToken::Yes, fist_nod),
    rule("call_sideways", GestureToken::Call, call_sideways),
    rule("you_point", GestureToken::You, you_point),
    rule("thumbs_up", GestureToken::Yes, thumbs_up),
    rule("thumbs_down", GestureToken::No, thumbs_down),
    rule("me_thumb", GestureToken::Me, me_thumb),
    rule("love_sign", GestureToken::Love, love_sign),
    rule("letter_c", GestureToken::C, letter_c),
    rule("goodbye_salute", GestureToken::Goodbye, goodbye_salute),
    rule("help_palm", GestureToken::Help, help_palm),
    rule("letter_b", GestureToken::B, letter_b),
    rule("letter_u", GestureToken::U, letter_u),
    rule("letter_v", GestureToken::V, letter_v),
    rule("letter_e", GestureToken::E, letter_e),
    rule("letter_a", GestureToken::A, letter_a),
    rule("letter_t", GestureToken::T, letter_t),
    rule("letter_s", GestureToken::S, fist),
    rule("letter_l", GestureToken::L, letter_l),
    rule("letter_d", GestureToken::D, index_only),
    rule("letter_y", GestureToken::Y, letter_y),
    rule("letter_i", GestureToken::I, pinky_only),
];

// --- Shared shapes ---

fn fist(f: &HandFeatures, _: &ClassifierThresholds) -> bool {
    f.fingers.none_extended()
}

fn open_palm(f: &HandFeatures) -> bool {
    f.fingers.all_extended()
}

fn wide_open_palm(f: &HandFeatures, t: &ClassifierThresholds) -> bool {
    open_palm(f) && f.thumb_to_index_knuckle > t.thumb_out_min
}

fn index_only(f: &HandFeatures, _: &ClassifierThresholds) -> bool {
    f.fingers.is(true, false, false, false)
}

fn pinky_only(f: &HandFeatures, _: &ClassifierThresholds) -> bool {
    f.fingers.is(false, false, false, true)
}

fn index_and_middle(f: &HandFeatures) -> bool {
    f.fingers.is(true, true, false, false)
}

fn fingers_together(f: &HandFeatures, t: &ClassifierThresholds) -> bool {
    f.index_middle_spread < f.palm_width * t.u_max_spread
}

fn horizontal_swipe(f: &HandFeatures, t: &ClassifierThresholds) -> bool {
    let m = &f.motion;
    wide_open_palm(f, t) && m.reversals_x == 0 && m.dx.abs() > m.dy.abs()
}

// --- Motion rules ---

fn hello_wave(f: &HandFeatures, t: &ClassifierThresholds) -> bool {
    wide_open_palm(f, t)
        && f.motion.reversals_x >= t.wave_min_reversals
        && f.motion.path_x >= t.wave_min_path
}

fn thank_you_down(f: &HandFeatures, t: &ClassifierThresholds) -> bool {
    open_palm(f) && f.motion.dy >= t.down_min_dy && f.motion.dy > f.motion.dx.abs()
}

fn swipe_left(f: &HandFeatures, t: &ClassifierThresholds) -> bool {
    horizontal_swipe(f, t) && f.motion.dx <= -t.swipe_min_dx
}

fn swipe_right(f: &HandFeatures, t: &ClassifierThresholds) -> bool {
    horizontal_swipe(f, t) && f.motion.dx >= t.swipe_min_dx
}

fn fist_nod(f: &HandFeatures, t: &ClassifierThresholds) -> bool {
    fist(f, t)
        && f.motion.reversals_y >= t.nod_min_reversals
        && f.motion.path_y >= t.nod_min_path
        && f.thumb_above_wrist > 0.0
}

// --- Sideways and pointing ---

fn call_sideways(f: &HandFeatures, t: &ClassifierThresholds) -> bool {
    f.palm_tilt > t.call_min_tilt
        && f.reaching.is(false, false, false, true)
        && f.thumb_to_index_knuckle > t.thumb_out_min
}

fn you_point(f: &HandFeatures, t: &ClassifierThresholds) -> bool {
    let others_curled = !(f.fingers.middle || f.fingers.ring || f.fingers.pinky);
    others_curled && f.index_depth_lead > t.you_min_depth_lead
}

// --- Orientation rules ---

fn thumbs_up(f: &HandFeatures, t: &ClassifierThresholds) -> bool {
    fist(f, t) && f.thumb_lift > t.thumbs_up_min_lift
}

fn thumbs_down(f: &HandFeatures, t: &ClassifierThresholds) -> bool {
    fist(f, t) && f.thumb_drop > t.thumbs_down_min_drop
}

fn me_thumb(f: &HandFeatures, t: &ClassifierThresholds) -> bool {
    fist(f, t) && f.thumb_reach_x > t.me_min_thumb_reach && f.thumb_reach_x > f.thumb_lift.abs()
}

fn love_sign(f: &HandFeatures, t: &ClassifierThresholds) -> bool {
    f.fingers.is(true, false, false, true) && f.thumb_to_index_knuckle > t.thumb_out_min
}

// --- Static letters ---

fn letter_c(f: &HandFeatures, t: &ClassifierThresholds) -> bool {
    open_palm(f)
        && f.thumb_to_middle_tip < t.c_max_thumb_to_middle
        && f.middle_finger_length < t.c_max_finger_length
}

fn goodbye_salute(f: &HandFeatures, t: &ClassifierThresholds) -> bool {
    open_palm(f)
        && f.thumb_to_index_knuckle <= t.thumb_out_min
        && fingers_together(f, t)
        && f.wrist_y < t.goodbye_max_wrist_y
}

fn help_palm(f: &HandFeatures, t: &ClassifierThresholds) -> bool {
    open_palm(f) && f.thumb_to_index_knuckle < t.help_max_thumb_to_index
}

fn letter_b(f: &HandFeatures, _: &ClassifierThresholds) -> bool {
    open_palm(f)
}

fn letter_u(f: &HandFeatures, t: &ClassifierThresholds) -> bool {
    index_and_middle(f) && fingers_together(f, t)
}

fn letter_v(f: &HandFeatures, _: &ClassifierThresholds) -> bool {
    index_and_middle(f)
}

fn letter_e(f: &HandFeatures, t: &ClassifierThresholds) -> bool {
    fist(f, t) && f.thumb_below_middle_tip > 0.0
}

fn letter_a(f: &HandFeatures, t: &ClassifierThresholds) -> bool {
    fist(f, t) && f.thumb_to_pinky_knuckle > f.palm_width * t.a_min_thumb_to_pinky
}

fn letter_t(f: &HandFeatures, t: &ClassifierThresholds) -> bool {
    fist(f, t) && f.thumb_to_index_knuckle < t.t_max_thumb_to_index
}

fn letter_l(f: &HandFeatures, t: &ClassifierThresholds) -> bool {
    index_only(f, t) && f.thumb_to_index_knuckle > t.l_min_thumb_to_index
}

fn letter_y(f: &HandFeatures, t: &ClassifierThresholds) -> bool {
    pinky_only(f, t) && f.thumb_to_index_knuckle > t.y_min_thumb_to_index
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_rule_names_are_unique() {
        let names: HashSet<_> = RULES.iter().map(|r| r.name).collect();
        assert_eq!(names.len(), RULES.len());
    }

    #[test]
    fn test_no_rule_emits_a_sentinel() {
        assert!(RULES.iter().all(|r| !r.token.is_sentinel()));
    }

    #[test]
    fn test_motion_rules_precede_static_rules() {
        let position = |name: &str| RULES.iter().position(|r| r.name == name).unwrap();
        assert!(position("hello_wave") < position("letter_b"));
        assert!(position("thank_you_down") < position("letter_b"));
        assert!(position("fist_nod") < position("thumbs_up"));
        assert!(position("thumbs_up") < position("letter_s"));
        assert!(position("letter_c") < position("letter_b"));
        assert!(position("goodbye_salute") < position("help_palm"));
        assert!(position("help_palm") < position("letter_b"));
        assert!(position("call_sideways") < position("thumbs_up"));
        assert!(position("call_sideways") < position("letter_y"));
        assert!(position("you_point") < position("letter_d"));
        assert!(position("me_thumb") < position("letter_a"));
        assert!(position("letter_u") < position("letter_v"));
        assert!(position("letter_l") < position("letter_d"));
        assert!(position("letter_y") < position("letter_i"));
    }

    #[test]
    fn test_thresholds_deserialize_partially() {
        let t: ClassifierThresholds = serde_json::from_str(r#"{"swipe_min_dx": 2.5}"#).unwrap();
        assert_eq!(t.swipe_min_dx, 2.5);
        assert_eq!(t.thumb_out_min, ClassifierThresholds::default().thumb_out_min);
    }
}
