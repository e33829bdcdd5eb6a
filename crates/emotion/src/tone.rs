//! Tone labels and the face-signal heuristics that produce them.
//!
//! Pure domain logic - no I/O.

use serde::{Deserialize, Serialize};

/// Tone attached to a finalized utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Tone {
    #[default]
    Neutral,
    Calm,
    Happy,
    Sad,
    Angry,
    Urgent,
}

impl Tone {
    pub fn label(&self) -> &'static str {
        match self {
            Tone::Neutral => "Neutral",
            Tone::Calm => "Calm",
            Tone::Happy => "Happy",
            Tone::Sad => "Sad",
            Tone::Angry => "Angry",
            Tone::Urgent => "Urgent",
        }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "neutral" => Ok(Tone::Neutral),
            "calm" => Ok(Tone::Calm),
            "happy" => Ok(Tone::Happy),
            "sad" => Ok(Tone::Sad),
            "angry" => Ok(Tone::Angry),
            "urgent" => Ok(Tone::Urgent),
            other => Err(format!("unknown tone: {other}")),
        }
    }
}

/// Latest best guess from the emotion collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct EmotionReading {
    pub tone: Tone,
    /// 0..=1
    pub confidence: f32,
    /// When the reading was taken (ms since epoch), if known.
    #[serde(default)]
    pub observed_at_ms: Option<i64>,
}

impl EmotionReading {
    pub fn new(tone: Tone, confidence: f32) -> Self {
        Self {
            tone,
            confidence: confidence.clamp(0.0, 1.0),
            observed_at_ms: None,
        }
    }
}

/// Seven-way expression probabilities from a face-expression network.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceExpressions {
    pub neutral: f32,
    pub happy: f32,
    pub sad: f32,
    pub angry: f32,
    pub surprised: f32,
    pub disgusted: f32,
    pub fearful: f32,
}

/// Collapse expression probabilities onto Happy/Sad/Angry/Neutral using the
/// strongest expression. Ties keep the earlier of happy, sad, angry,
/// neutral, surprised, disgusted, fearful.
pub fn tone_from_expressions(e: &FaceExpressions) -> EmotionReading {
    let ranked = [
        (Tone::Happy, e.happy),
        (Tone::Sad, e.sad),
        (Tone::Angry, e.angry),
        (Tone::Neutral, e.neutral),
        (Tone::Happy, e.surprised),
        (Tone::Angry, e.disgusted),
        (Tone::Sad, e.fearful),
    ];

    let (tone, score) = ranked
        .into_iter()
        .fold((Tone::Neutral, 0.0f32), |best, candidate| {
            if candidate.1 > best.1 {
                candidate
            } else {
                best
            }
        });

    EmotionReading::new(tone, score)
}

/// One named blendshape score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blendshape {
    pub name: String,
    pub score: f32,
}

fn score(shapes: &[Blendshape], name: &str) -> f32 {
    shapes
        .iter()
        .find(|s| s.name == name)
        .map(|s| s.score)
        .unwrap_or(0.0)
}

fn pair(shapes: &[Blendshape], left: &str, right: &str) -> f32 {
    (score(shapes, left) + score(shapes, right)) / 2.0
}

/// Heuristic tone from face blendshapes.
///
/// Checked in order: smile, sadness, urgency, anger, then a low-activation
/// face reads as calm.
pub fn tone_from_blendshapes(shapes: &[Blendshape]) -> EmotionReading {
    let smile = pair(shapes, "mouthSmileLeft", "mouthSmileRight");
    let frown = pair(shapes, "mouthFrownLeft", "mouthFrownRight");
    let mouth_lower_down = pair(shapes, "mouthLowerDownLeft", "mouthLowerDownRight");
    let mouth_press = pair(shapes, "mouthPressLeft", "mouthPressRight");
    let brow_down = pair(shapes, "browDownLeft", "browDownRight");
    let brow_inner_up = score(shapes, "browInnerUp");
    let eye_squint = pair(shapes, "eyeSquintLeft", "eyeSquintRight");
    let nose_sneer = pair(shapes, "noseSneerLeft", "noseSneerRight");
    let eye_wide = pair(shapes, "eyeWideLeft", "eyeWideRight");
    let jaw_open = score(shapes, "jawOpen");

    let sad = (0.55 * frown + 0.25 * mouth_lower_down + 0.2 * brow_inner_up).clamp(0.0, 1.0);
    let angry =
        (0.45 * brow_down + 0.25 * eye_squint + 0.2 * nose_sneer + 0.1 * mouth_press).clamp(0.0, 1.0);
    let urgent = (0.6 * eye_wide + 0.4 * jaw_open).clamp(0.0, 1.0);

    if smile > 0.45 {
        return EmotionReading::new(Tone::Happy, smile);
    }
    if sad > 0.22 {
        return EmotionReading::new(Tone::Sad, sad);
    }
    if urgent > 0.33 {
        return EmotionReading::new(Tone::Urgent, urgent);
    }
    if angry > 0.26 {
        return EmotionReading::new(Tone::Angry, angry);
    }

    let activation = smile.max(sad).max(angry).max(urgent);
    if activation < 0.08 {
        return EmotionReading::new(Tone::Calm, 0.6);
    }

    EmotionReading::new(Tone::Neutral, 0.5)
}
