//! Hand landmark geometry.

use serde::{Deserialize, Serialize};

use crate::{HandError, Result};

/// Number of landmarks emitted per hand by the pose estimator.
pub const LANDMARK_COUNT: usize = 21;

/// A point in normalized camera space (x right, y down, z towards camera).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Distance in the image plane. Depth is too noisy to be useful here.
    pub fn planar_distance(&self, other: &Point3) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Landmark indices in estimator order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum HandLandmark {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexMcp = 5,
    IndexPip = 6,
    IndexDip = 7,
    IndexTip = 8,
    MiddleMcp = 9,
    MiddlePip = 10,
    MiddleDip = 11,
    MiddleTip = 12,
    RingMcp = 13,
    RingPip = 14,
    RingDip = 15,
    RingTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

/// One observed hand: 21 landmarks plus the capture timestamp.
///
/// Immutable once built; the constructor guarantees the landmark count and
/// that every coordinate is finite, so geometry downstream never has to
/// re-check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    points: [Point3; LANDMARK_COUNT],
    timestamp_ms: u64,
}

impl LandmarkFrame {
    pub fn new(points: Vec<Point3>, timestamp_ms: u64) -> Result<Self> {
        let points: [Point3; LANDMARK_COUNT] =
            points
                .try_into()
                .map_err(|rejected: Vec<Point3>| HandError::InvalidLandmarkCount {
                    expected: LANDMARK_COUNT,
                    actual: rejected.len(),
                })?;

        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(HandError::NonFiniteCoordinate { index });
        }

        Ok(Self {
            points,
            timestamp_ms,
        })
    }

    /// Build a frame from `[x, y, z]` triples, the layout most estimators emit.
    pub fn from_triples(triples: &[[f32; 3]], timestamp_ms: u64) -> Result<Self> {
        let points = triples
            .iter()
            .map(|[x, y, z]| Point3::new(*x, *y, *z))
            .collect();
        Self::new(points, timestamp_ms)
    }

    #[inline]
    pub fn point(&self, landmark: HandLandmark) -> Point3 {
        self.points[landmark as usize]
    }

    pub fn points(&self) -> &[Point3; LANDMARK_COUNT] {
        &self.points
    }

    pub fn timestamp_ms(&self) -> u64 {
        self.timestamp_ms
    }
}
