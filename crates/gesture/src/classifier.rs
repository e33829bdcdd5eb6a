//! Single evaluation loop over [`RULES`].

use handscribe_features::HandFeatures;

use crate::rules::{ClassifierThresholds, RULES};
use crate::token::GestureToken;

/// Result of classifying one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub token: GestureToken,
    /// Name of the matching rule, `None` when nothing matched.
    pub rule: Option<&'static str>,
}

/// Map features to exactly one token. First matching rule wins; no match
/// yields [`GestureToken::Unknown`].
pub fn classify(features: &HandFeatures, thresholds: &ClassifierThresholds) -> Classification {
    RULES
        .iter()
        .find(|rule| (rule.matches)(features, thresholds))
        .map(|rule| Classification {
            token: rule.token,
            rule: Some(rule.name),
        })
        .unwrap_or(Classification {
            token: GestureToken::Unknown,
            rule: None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use handscribe_features::{FingerStates, MotionFeatures};

    fn hand(index: bool, middle: bool, ring: bool, pinky: bool) -> HandFeatures {
        let fingers = FingerStates {
            index,
            middle,
            ring,
            pinky,
        };
        HandFeatures {
            fingers,
            reaching: fingers,
            hand_scale: 0.2,
            palm_width: 0.9,
            thumb_to_index_knuckle: 0.5,
            thumb_to_pinky_knuckle: 0.6,
            thumb_to_middle_tip: 1.5,
            index_middle_spread: 0.2,
            middle_finger_length: 0.9,
            thumb_lift: 0.0,
            thumb_drop: -0.5,
            thumb_below_middle_tip: -0.2,
            thumb_above_wrist: 0.5,
            thumb_reach_x: 0.3,
            palm_tilt: 0.0,
            index_depth_lead: 0.0,
            wrist_y: 0.7,
            motion: MotionFeatures::default(),
        }
    }

    fn open() -> HandFeatures {
        let mut f = hand(true, true, true, true);
        f.thumb_to_index_knuckle = 0.9;
        f
    }

    fn fist() -> HandFeatures {
        hand(false, false, false, false)
    }

    fn token(f: &HandFeatures) -> GestureToken {
        classify(f, &ClassifierThresholds::default()).token
    }

    #[test]
    fn test_identical_features_identical_token() {
        let f = open();
        let t = ClassifierThresholds::default();
        assert_eq!(classify(&f, &t), classify(&f, &t));
    }

    #[test]
    fn test_static_open_palm_is_b() {
        let result = classify(&open(), &ClassifierThresholds::default());
        assert_eq!(result.token, GestureToken::B);
        assert_eq!(result.rule, Some("letter_b"));
    }

    #[test]
    fn test_wave_is_hello() {
        let mut f = open();
        f.motion = MotionFeatures {
            dx: 0.2,
            path_x: 2.0,
            reversals_x: 2,
            samples: 12,
            ..Default::default()
        };
        assert_eq!(token(&f), GestureToken::Hello);
    }

    #[test]
    fn test_wave_without_thumb_out_is_not_hello() {
        let mut f = open();
        f.thumb_to_index_knuckle = 0.5;
        f.motion = MotionFeatures {
            path_x: 2.0,
            reversals_x: 2,
            ..Default::default()
        };
        assert_eq!(token(&f), GestureToken::B);
    }

    #[test]
    fn test_downward_palm_is_thank_you() {
        let mut f = open();
        f.motion.dy = 0.9;
        f.motion.path_y = 0.9;
        assert_eq!(token(&f), GestureToken::ThankYou);
    }

    #[test]
    fn test_single_swipes_are_commands() {
        let mut left = open();
        left.motion.dx = -1.4;
        left.motion.path_x = 1.4;
        assert_eq!(token(&left), GestureToken::Delete);

        let mut right = open();
        right.motion.dx = 1.4;
        right.motion.path_x = 1.4;
        assert_eq!(token(&right), GestureToken::Space);
    }

    #[test]
    fn test_swipe_with_reversal_long_enough_is_hello() {
        let mut f = open();
        f.motion = MotionFeatures {
            dx: 1.1,
            path_x: 1.5,
            reversals_x: 1,
            ..Default::default()
        };
        assert_eq!(token(&f), GestureToken::Hello);
    }

    #[test]
    fn test_nodding_fist_is_yes() {
        let mut f = fist();
        f.motion.path_y = 0.5;
        f.motion.reversals_y = 1;
        let result = classify(&f, &ClassifierThresholds::default());
        assert_eq!(result.token, GestureToken::Yes);
        assert_eq!(result.rule, Some("fist_nod"));
    }

    #[test]
    fn test_thumbs_up_and_down() {
        let mut up = fist();
        up.thumb_lift = 0.8;
        let result = classify(&up, &ClassifierThresholds::default());
        assert_eq!(result.token, GestureToken::Yes);
        assert_eq!(result.rule, Some("thumbs_up"));

        let mut down = fist();
        down.thumb_drop = 0.4;
        down.thumb_above_wrist = -0.4;
        assert_eq!(token(&down), GestureToken::No);
    }

    #[test]
    fn test_thumbs_up_wins_over_letter_a() {
        let mut f = fist();
        f.thumb_lift = 0.8;
        f.thumb_to_pinky_knuckle = 2.0;
        assert_eq!(token(&f), GestureToken::Yes);
    }

    #[test]
    fn test_fist_letters() {
        let mut e = fist();
        e.thumb_below_middle_tip = 0.1;
        assert_eq!(token(&e), GestureToken::E);

        let mut a = fist();
        a.thumb_to_pinky_knuckle = 1.2;
        assert_eq!(token(&a), GestureToken::A);

        let mut t = fist();
        t.thumb_to_index_knuckle = 0.2;
        assert_eq!(token(&t), GestureToken::T);

        assert_eq!(token(&fist()), GestureToken::S);
    }

    #[test]
    fn test_c_requires_curled_fingers() {
        let mut c = open();
        c.thumb_to_middle_tip = 0.5;
        c.middle_finger_length = 0.4;
        assert_eq!(token(&c), GestureToken::C);
    }

    #[test]
    fn test_u_and_v_split_on_spread() {
        let mut u = hand(true, true, false, false);
        u.index_middle_spread = 0.2;
        assert_eq!(token(&u), GestureToken::U);

        let mut v = hand(true, true, false, false);
        v.index_middle_spread = 0.6;
        assert_eq!(token(&v), GestureToken::V);
    }

    #[test]
    fn test_single_finger_letters() {
        let mut l = hand(true, false, false, false);
        l.thumb_to_index_knuckle = 0.9;
        assert_eq!(token(&l), GestureToken::L);
        assert_eq!(token(&hand(true, false, false, false)), GestureToken::D);

        let mut y = hand(false, false, false, true);
        y.thumb_to_index_knuckle = 1.0;
        assert_eq!(token(&y), GestureToken::Y);
        assert_eq!(token(&hand(false, false, false, true)), GestureToken::I);
    }

    #[test]
    fn test_love_sign() {
        let mut f = hand(true, false, false, true);
        f.thumb_to_index_knuckle = 0.9;
        assert_eq!(token(&f), GestureToken::Love);
    }

    #[test]
    fn test_tucked_thumb_palm_is_help() {
        let mut f = open();
        f.thumb_to_index_knuckle = 0.2;
        let result = classify(&f, &ClassifierThresholds::default());
        assert_eq!(result.token, GestureToken::Help);
        assert_eq!(result.rule, Some("help_palm"));
    }

    #[test]
    fn test_raised_flat_hand_is_goodbye() {
        let mut f = open();
        f.thumb_to_index_knuckle = 0.2;
        f.wrist_y = 0.25;
        let result = classify(&f, &ClassifierThresholds::default());
        assert_eq!(result.token, GestureToken::Goodbye);
        assert_eq!(result.rule, Some("goodbye_salute"));

        // Spread fingers at the head stay a plain open palm.
        f.index_middle_spread = 0.6;
        assert_eq!(token(&f), GestureToken::Help);
    }

    #[test]
    fn test_sideways_thumb_and_pinky_is_call() {
        // Turned sideways the upright extension test sees a fist with the
        // thumb up, which would otherwise read as thumbs-up.
        let mut f = fist();
        f.reaching = FingerStates {
            pinky: true,
            ..Default::default()
        };
        f.palm_tilt = 0.9;
        f.thumb_to_index_knuckle = 1.0;
        f.thumb_lift = 0.8;
        let result = classify(&f, &ClassifierThresholds::default());
        assert_eq!(result.token, GestureToken::Call);
        assert_eq!(result.rule, Some("call_sideways"));

        let mut y = hand(false, false, false, true);
        y.thumb_to_index_knuckle = 1.0;
        y.palm_tilt = 0.2;
        assert_eq!(token(&y), GestureToken::Y);
    }

    #[test]
    fn test_index_towards_camera_is_you() {
        let mut f = fist();
        f.index_depth_lead = 0.8;
        let result = classify(&f, &ClassifierThresholds::default());
        assert_eq!(result.token, GestureToken::You);
        assert_eq!(result.rule, Some("you_point"));

        let mut d = hand(true, false, false, false);
        d.index_depth_lead = 0.1;
        assert_eq!(token(&d), GestureToken::D);
    }

    #[test]
    fn test_sideways_thumb_is_me() {
        let mut f = fist();
        f.thumb_reach_x = 0.9;
        f.thumb_lift = 0.1;
        let result = classify(&f, &ClassifierThresholds::default());
        assert_eq!(result.token, GestureToken::Me);
        assert_eq!(result.rule, Some("me_thumb"));

        // Thumb resting against the side is still A.
        let mut a = fist();
        a.thumb_reach_x = 0.4;
        a.thumb_to_pinky_knuckle = 1.2;
        assert_eq!(token(&a), GestureToken::A);
    }

    #[test]
    fn test_unmatched_shape_is_unknown() {
        let result = classify(&hand(false, false, true, false), &ClassifierThresholds::default());
        assert_eq!(result.token, GestureToken::Unknown);
        assert_eq!(result.rule, None);
    }
}
