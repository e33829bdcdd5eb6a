//! Sign session: binds the engine to its collaborators.

use std::sync::Arc;

use handscribe_emotion::{EmotionReading, SharedEmotion};
use handscribe_events::{
    EngineEvent, EventSinkRef, GestureDisplayedEvent, TextCommittedEvent, UtteranceFinalizedEvent,
};
use handscribe_hand::FrameInput;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, EngineConfig};
use crate::engine::{EngineEffect, GestureEngine, TickOutput};

/// A finished utterance handed to the downstream consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub id: String,
    pub text: String,
    /// Emotion reading current at finalization time.
    pub emotion: EmotionReading,
    pub ts_ms: u64,
}

impl Utterance {
    /// Display label of the tone, e.g. "Happy".
    pub fn tone_label(&self) -> &'static str {
        self.emotion.tone.label()
    }
}

/// Downstream consumer, called once per non-empty finalization.
pub type UtteranceCallback = Arc<dyn Fn(Utterance) + Send + Sync>;

pub struct SignSession {
    engine: GestureEngine,
    emotion: SharedEmotion,
    on_utterance: UtteranceCallback,
    events: Option<EventSinkRef>,
    utterances: usize,
}

impl SignSession {
    /// Build the engine from `config`; fails on a misconfigured threshold set.
    pub fn new(
        config: EngineConfig,
        emotion: SharedEmotion,
        on_utterance: UtteranceCallback,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            engine: GestureEngine::new(config)?,
            emotion,
            on_utterance,
            events: None,
            utterances: 0,
        })
    }

    /// Publish live events to `sink` as well.
    pub fn with_events(mut self, sink: EventSinkRef) -> Self {
        self.events = Some(sink);
        self
    }

    pub fn engine(&self) -> &GestureEngine {
        &self.engine
    }

    pub fn emotion(&self) -> &SharedEmotion {
        &self.emotion
    }

    /// Text typed so far, for live preview.
    pub fn buffer(&self) -> &str {
        self.engine.buffer()
    }

    /// Utterances delivered so far.
    pub fn utterance_count(&self) -> usize {
        self.utterances
    }

    /// Run one tick and dispatch its effects.
    pub fn process(&mut self, input: &FrameInput) -> TickOutput {
        let output = self.engine.process(input);
        let ts_ms = output.timestamp_ms;

        for effect in &output.effects {
            match effect {
                EngineEffect::Displayed { token } => {
                    self.publish(EngineEvent::GestureDisplayed(GestureDisplayedEvent {
                        token: *token,
                        kind: token.kind(),
                        label: token.label().to_string(),
                        ts_ms,
                    }));
                }
                EngineEffect::Committed { token, edit } => {
                    self.publish(EngineEvent::TextCommitted(TextCommittedEvent {
                        token: *token,
                        edit: *edit,
                        buffer: output.buffer.clone(),
                        ts_ms,
                    }));
                }
                EngineEffect::Finalized { text } => {
                    let utterance = Utterance {
                        id: uuid::Uuid::new_v4().to_string(),
                        text: text.clone(),
                        emotion: self.emotion.current(),
                        ts_ms,
                    };
                    self.publish(EngineEvent::UtteranceFinalized(UtteranceFinalizedEvent {
                        id: utterance.id.clone(),
                        text: utterance.text.clone(),
                        tone: utterance.emotion.tone,
                        confidence: utterance.emotion.confidence,
                        ts_ms,
                    }));
                    self.utterances += 1;
                    (self.on_utterance)(utterance);
                }
            }
        }

        output
    }

    /// User-initiated clear of the current utterance.
    pub fn clear(&mut self) {
        self.engine.reset();
    }

    fn publish(&self, event: EngineEvent) {
        if let Some(sink) = &self.events {
            sink.publish(&event);
        }
    }
}
