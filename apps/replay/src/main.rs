//! Replay a landmark recording through a sign session.
//!
//! Prints one `<tone>\t<text>` line per finalized utterance on stdout. Logs go
//! to stderr.

mod recording;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use handscribe_application::{drive, EngineConfig, SignSession, Utterance};
use handscribe_emotion::{EmotionPoller, EmotionReading, FixedEmotion, SharedEmotion, Tone};
use handscribe_events::{EngineEvent, EventSink};

use recording::RecordingSource;

/// Replay a JSON-lines hand landmark recording and print finalized utterances
#[derive(Parser)]
#[command(name = "handscribe-replay", version, about)]
struct Cli {
    /// Recording to replay (one JSON record per frame)
    #[arg(short, long)]
    input: PathBuf,

    /// Engine config JSON; missing fields keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fix the tone instead of reading face records (e.g. "happy")
    #[arg(long)]
    tone: Option<Tone>,

    /// Also print every engine event as a JSON line
    #[arg(long)]
    events: bool,
}

/// Writes each event as one JSON line on stdout.
struct StdoutSink {
    out: Mutex<std::io::Stdout>,
}

impl EventSink for StdoutSink {
    fn publish(&self, event: &EngineEvent) {
        let line = match event.to_json() {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!("failed to encode event: {}", e);
                return;
            }
        };
        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(e) = writeln!(out, "{line}") {
            tracing::warn!("failed to write event: {}", e);
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,handscribe=debug")),
        )
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let emotion = SharedEmotion::new();
    let mut poller = EmotionPoller::new();
    let face_target = match cli.tone {
        Some(tone) => {
            emotion.set(EmotionReading::new(tone, 1.0));
            poller.start(Arc::new(FixedEmotion::new(tone)), emotion.clone());
            None
        }
        None => Some(emotion.clone()),
    };

    let on_utterance = Arc::new(|u: Utterance| {
        println!("{}\t{}", u.tone_label(), u.text);
    });
    let mut session = SignSession::new(config, emotion, on_utterance)
        .context("invalid engine config")?;
    if cli.events {
        session = session.with_events(Arc::new(StdoutSink {
            out: Mutex::new(std::io::stdout()),
        }));
    }

    let mut source = RecordingSource::open(&cli.input, face_target)
        .with_context(|| format!("failed to open recording {}", cli.input.display()))?;

    let stop = AtomicBool::new(false);
    let summary = drive(&mut source, &mut session, &stop)
        .with_context(|| format!("replay of {} failed", cli.input.display()))?;

    poller.stop();
    tracing::info!(
        frames = summary.frames,
        utterances = summary.utterances,
        leftover = %session.buffer(),
        "replay finished"
    );
    Ok(())
}
