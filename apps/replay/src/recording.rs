//! JSON-lines landmark recordings.
//!
//! One record per video frame:
//!
//! ```json
//! {"t": 1033, "hand": [[0.5, 0.8, 0.0], ...], "face": {"happy": 0.9}}
//! {"t": 1066, "hand": null}
//! ```
//!
//! `face` is optional and holds either face-expression probabilities or a
//! list of `{"name", "score"}` blendshapes.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use handscribe_emotion::{
    tone_from_blendshapes, tone_from_expressions, Blendshape, FaceExpressions, SharedEmotion,
};
use handscribe_hand::{FrameInput, HandError, HandPoseSource, LandmarkFrame, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Record {
    t: u64,
    #[serde(default)]
    hand: Option<Vec<[f32; 3]>>,
    #[serde(default)]
    face: Option<FaceRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FaceRecord {
    Blendshapes(Vec<Blendshape>),
    Expressions(FaceExpressions),
}

/// Replays a recording as a [`HandPoseSource`].
pub struct RecordingSource<R> {
    lines: Lines<R>,
    line_no: usize,
    /// Face records update this reading; `None` ignores them.
    emotion: Option<SharedEmotion>,
}

impl RecordingSource<BufReader<File>> {
    pub fn open(path: &Path, emotion: Option<SharedEmotion>) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| HandError::Source(format!("{}: {e}", path.display())))?;
        Ok(Self::new(BufReader::new(file), emotion))
    }
}

impl<R: BufRead> RecordingSource<R> {
    pub fn new(reader: R, emotion: Option<SharedEmotion>) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
            emotion,
        }
    }
}

fn apply_face(emotion: &SharedEmotion, face: &FaceRecord) {
    let reading = match face {
        FaceRecord::Blendshapes(shapes) => tone_from_blendshapes(shapes),
        FaceRecord::Expressions(expressions) => tone_from_expressions(expressions),
    };
    emotion.set(reading);
}

impl<R: BufRead> HandPoseSource for RecordingSource<R> {
    fn next_frame(&mut self) -> Result<Option<FrameInput>> {
        for line in self.lines.by_ref() {
            self.line_no += 1;
            let line = line.map_err(|e| HandError::Source(e.to_string()))?;
            if line.trim().is_empty() {
                continue;
            }

            let record: Record = serde_json::from_str(&line)
                .map_err(|e| HandError::Source(format!("line {}: {e}", self.line_no)))?;

            if let (Some(emotion), Some(face)) = (&self.emotion, &record.face) {
                apply_face(emotion, face);
            }

            let input = match record.hand {
                Some(points) => FrameInput::Hand(LandmarkFrame::from_triples(&points, record.t)?),
                None => FrameInput::NoHand {
                    timestamp_ms: record.t,
                },
            };
            return Ok(Some(input));
        }
        Ok(None)
    }
}
