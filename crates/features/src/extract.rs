//! Per-frame geometric features.

use handscribe_hand::{HandLandmark as L, LandmarkFrame, Point3};
use serde::{Deserialize, Serialize};

use crate::motion::{MotionBuffer, MotionFeatures, MotionSample, MotionSettings};

/// Floor for the hand scale so a degenerate frame cannot divide by zero.
const MIN_HAND_SCALE: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureSettings {
    /// A fingertip must sit this far (in hand scales) above its knuckle to
    /// count as extended.
    pub extension_margin: f32,
    pub motion: MotionSettings,
}

impl Default for FeatureSettings {
    fn default() -> Self {
        Self {
            extension_margin: 0.1,
            motion: MotionSettings::default(),
        }
    }
}

/// Extension flags for the four non-thumb fingers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FingerStates {
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
}

impl FingerStates {
    pub fn all_extended(&self) -> bool {
        self.index && self.middle && self.ring && self.pinky
    }

    pub fn none_extended(&self) -> bool {
        !(self.index || self.middle || self.ring || self.pinky)
    }

    /// Exactly the given pattern, in index/middle/ring/pinky order.
    pub fn is(&self, index: bool, middle: bool, ring: bool, pinky: bool) -> bool {
        *self
            == FingerStates {
                index,
                middle,
                ring,
                pinky,
            }
    }
}

/// Everything the classifier looks at for one frame.
///
/// Distances are in hand scales unless noted. Vertical offsets are signed so
/// that positive always reads as the name says (`thumb_lift > 0` means the
/// thumb tip is above the index knuckle in the image).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HandFeatures {
    /// Fingertip above its knuckle; only meaningful for an upright hand.
    pub fingers: FingerStates,
    /// Fingertip farther from the wrist than its knuckle, in any orientation.
    pub reaching: FingerStates,
    /// Wrist to middle knuckle, in raw image units.
    pub hand_scale: f32,
    pub palm_width: f32,
    pub thumb_to_index_knuckle: f32,
    pub thumb_to_pinky_knuckle: f32,
    pub thumb_to_middle_tip: f32,
    pub index_middle_spread: f32,
    pub middle_finger_length: f32,
    /// Index knuckle y minus thumb tip y.
    pub thumb_lift: f32,
    /// Thumb tip y minus wrist y.
    pub thumb_drop: f32,
    /// Thumb tip y minus middle fingertip y.
    pub thumb_below_middle_tip: f32,
    /// Wrist y minus thumb tip y.
    pub thumb_above_wrist: f32,
    /// Horizontal offset of the thumb tip from the index knuckle, unsigned.
    pub thumb_reach_x: f32,
    /// Horizontal part of wrist to middle knuckle: 0 upright, 1 sideways.
    pub palm_tilt: f32,
    /// How much nearer the camera the index tip is than the middle tip.
    pub index_depth_lead: f32,
    /// Wrist height in raw image units, 0 at the top edge.
    pub wrist_y: f32,
    pub motion: MotionFeatures,
}

impl HandFeatures {
    /// Pure geometry: compute features for `frame` given precomputed motion.
    pub fn from_frame(frame: &LandmarkFrame, motion: MotionFeatures, margin: f32) -> Self {
        let p = |l: L| frame.point(l);
        let wrist = p(L::Wrist);
        let thumb_tip = p(L::ThumbTip);
        let index_knuckle = p(L::IndexMcp);
        let middle_knuckle = p(L::MiddleMcp);
        let pinky_knuckle = p(L::PinkyMcp);
        let middle_tip = p(L::MiddleTip);

        let scale = hand_scale(frame);
        let dist = |a: Point3, b: Point3| a.planar_distance(&b) / scale;
        let extended = |tip: L, knuckle: L| p(tip).y < p(knuckle).y - scale * margin;
        let reaching = |tip: L, knuckle: L| {
            p(tip).planar_distance(&wrist) > p(knuckle).planar_distance(&wrist) + scale * margin
        };

        HandFeatures {
            fingers: FingerStates {
                index: extended(L::IndexTip, L::IndexMcp),
                middle: extended(L::MiddleTip, L::MiddleMcp),
                ring: extended(L::RingTip, L::RingMcp),
                pinky: extended(L::PinkyTip, L::PinkyMcp),
            },
            reaching: FingerStates {
                index: reaching(L::IndexTip, L::IndexMcp),
                middle: reaching(L::MiddleTip, L::MiddleMcp),
                ring: reaching(L::RingTip, L::RingMcp),
                pinky: reaching(L::PinkyTip, L::PinkyMcp),
            },
            hand_scale: scale,
            palm_width: dist(index_knuckle, pinky_knuckle),
            thumb_to_index_knuckle: dist(thumb_tip, index_knuckle),
            thumb_to_pinky_knuckle: dist(thumb_tip, pinky_knuckle),
            thumb_to_middle_tip: dist(thumb_tip, middle_tip),
            index_middle_spread: dist(p(L::IndexTip), middle_tip),
            middle_finger_length: dist(middle_tip, middle_knuckle),
            thumb_lift: (index_knuckle.y - thumb_tip.y) / scale,
            thumb_drop: (thumb_tip.y - wrist.y) / scale,
            thumb_below_middle_tip: (thumb_tip.y - middle_tip.y) / scale,
            thumb_above_wrist: (wrist.y - thumb_tip.y) / scale,
            thumb_reach_x: (thumb_tip.x - index_knuckle.x).abs() / scale,
            palm_tilt: (middle_knuckle.x - wrist.x).abs() / scale,
            index_depth_lead: (p(L::IndexTip).z - middle_tip.z) / scale,
            wrist_y: wrist.y,
            motion,
        }
    }
}

/// Wrist to middle knuckle distance, floored.
pub(crate) fn hand_scale(frame: &LandmarkFrame) -> f32 {
    frame
        .point(L::Wrist)
        .planar_distance(&frame.point(L::MiddleMcp))
        .max(MIN_HAND_SCALE)
}

/// Stateful extractor owning the wrist motion history.
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    settings: FeatureSettings,
    motion: MotionBuffer,
}

impl FeatureExtractor {
    pub fn new(settings: FeatureSettings) -> Self {
        Self {
            settings,
            motion: MotionBuffer::new(settings.motion),
        }
    }

    pub fn settings(&self) -> &FeatureSettings {
        &self.settings
    }

    /// Record the wrist sample for `frame` and compute its features.
    pub fn extract(&mut self, frame: &LandmarkFrame) -> HandFeatures {
        let wrist = frame.point(L::Wrist);
        self.motion.push(MotionSample {
            x: wrist.x,
            y: wrist.y,
            timestamp_ms: frame.timestamp_ms(),
        });

        let motion = self.motion.features(hand_scale(frame));
        HandFeatures::from_frame(frame, motion, self.settings.extension_margin)
    }

    pub fn motion(&self) -> &MotionBuffer {
        &self.motion
    }

    pub fn reset(&mut self) {
        self.motion.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use handscribe_hand::LANDMARK_COUNT;

    /// Upright hand, wrist at (0.5, 0.8), hand scale 0.2.
    fn upright(extended: [bool; 4], timestamp_ms: u64) -> LandmarkFrame {
        let mut pts = vec![Point3::default(); LANDMARK_COUNT];
        pts[0] = Point3::new(0.5, 0.8, 0.0);
        pts[4] = Point3::new(0.35, 0.62, 0.0);
        let knuckles = [(5, 0.44), (9, 0.5), (13, 0.56), (17, 0.62)];
        for (finger, (mcp, x)) in knuckles.into_iter().enumerate() {
            pts[mcp] = Point3::new(x, 0.6, 0.0);
            let tip_y = if extended[finger] { 0.42 } else { 0.66 };
            pts[mcp + 1] = Point3::new(x, 0.55, 0.0);
            pts[mcp + 2] = Point3::new(x, 0.5, 0.0);
            pts[mcp + 3] = Point3::new(x, tip_y, 0.0);
        }
        LandmarkFrame::new(pts, timestamp_ms).unwrap()
    }

    #[test]
    fn test_hand_scale_is_wrist_to_middle_knuckle() {
        let frame = upright([true; 4], 0);
        assert!((hand_scale(&frame) - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_finger_extension_flags() {
        let frame = upright([true, true, false, false], 0);
        let features = HandFeatures::from_frame(&frame, MotionFeatures::default(), 0.1);
        assert!(features.fingers.is(true, true, false, false));
        assert!(!features.fingers.all_extended());
    }

    #[test]
    fn test_reaching_ignores_orientation() {
        let straight = upright([false, false, false, true], 0);
        let wrist = straight.point(L::Wrist);
        // Quarter turn about the wrist: fingers now point along +x.
        let turned: Vec<Point3> = straight
            .points()
            .iter()
            .map(|p| Point3::new(wrist.x + (wrist.y - p.y), wrist.y + (p.x - wrist.x), p.z))
            .collect();
        let turned = LandmarkFrame::new(turned, 0).unwrap();

        let a = HandFeatures::from_frame(&straight, MotionFeatures::default(), 0.1);
        let b = HandFeatures::from_frame(&turned, MotionFeatures::default(), 0.1);
        assert_eq!(a.reaching, a.fingers);
        assert_eq!(b.reaching, a.fingers);
        assert!(b.fingers.none_extended());
        assert!(a.palm_tilt < 1e-5);
        assert!((b.palm_tilt - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_index_depth_lead() {
        let frame = upright([true; 4], 0);
        let mut pts = *frame.points();
        pts[8].z = 0.1;
        let frame = LandmarkFrame::new(pts.to_vec(), 0).unwrap();

        let features = HandFeatures::from_frame(&frame, MotionFeatures::default(), 0.1);
        assert!((features.index_depth_lead - 0.5).abs() < 1e-5);
        assert!((features.wrist_y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_features_are_scale_invariant() {
        let small = upright([true; 4], 0);
        let scaled: Vec<Point3> = small
            .points()
            .iter()
            .map(|p| Point3::new(p.x * 2.0, p.y * 2.0, 0.0))
            .collect();
        let large = LandmarkFrame::new(scaled, 0).unwrap();

        let a = HandFeatures::from_frame(&small, MotionFeatures::default(), 0.1);
        let b = HandFeatures::from_frame(&large, MotionFeatures::default(), 0.1);
        assert_eq!(a.fingers, b.fingers);
        assert!((a.palm_width - b.palm_width).abs() < 1e-5);
        assert!((a.thumb_lift - b.thumb_lift).abs() < 1e-5);
    }

    #[test]
    fn test_extract_records_motion_sample() {
        let mut extractor = FeatureExtractor::default();
        extractor.extract(&upright([true; 4], 0));
        extractor.extract(&upright([true; 4], 33));

        assert_eq!(extractor.motion().len(), 2);
        extractor.reset();
        assert!(extractor.motion().is_empty());
    }

    #[test]
    fn test_degenerate_frame_stays_finite() {
        let pts = vec![Point3::new(0.5, 0.5, 0.0); LANDMARK_COUNT];
        let frame = LandmarkFrame::new(pts, 0).unwrap();

        let mut extractor = FeatureExtractor::default();
        let features = extractor.extract(&frame);
        assert!(features.palm_width.is_finite());
        assert!(features.motion.dx.is_finite());
    }
}
