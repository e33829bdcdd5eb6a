//! Cooperative frame loop.

use std::sync::atomic::{AtomicBool, Ordering};

use handscribe_hand::{FrameInput, HandPoseSource};

use crate::session::SignSession;

/// Counters from one [`drive`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriveSummary {
    pub frames: usize,
    pub hand_frames: usize,
    pub utterances: usize,
}

/// Feed frames from `source` into `session`, one tick per frame, until the
/// source is exhausted or `stop` is set.
pub fn drive<S>(
    source: &mut S,
    session: &mut SignSession,
    stop: &AtomicBool,
) -> handscribe_hand::Result<DriveSummary>
where
    S: HandPoseSource + ?Sized,
{
    let mut summary = DriveSummary::default();

    while !stop.load(Ordering::SeqCst) {
        let Some(input) = source.next_frame()? else {
            tracing::debug!(frames = summary.frames, "source exhausted");
            break;
        };

        summary.frames += 1;
        if matches!(input, FrameInput::Hand(_)) {
            summary.hand_frames += 1;
        }

        let output = session.process(&input);
        if output.finalized().is_some() {
            summary.utterances += 1;
        }
    }

    tracing::info!(
        frames = summary.frames,
        hand_frames = summary.hand_frames,
        utterances = summary.utterances,
        "frame loop finished"
    );
    Ok(summary)
}
