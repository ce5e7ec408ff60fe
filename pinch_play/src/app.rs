//! The session loop.
//!
//! `Session` owns the engine, a landmark source and a message sink, and
//! pumps frames from one to the other until the source ends.  When it ends,
//! or fails, one final empty frame lets the watchdog release every pitch so
//! nothing is left hanging on the synth.

use pinch_gesture::{ConfigError, GestureEngine};
use pinch_midi::MidiMessage;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::settings::Settings;
use crate::sink::{MessageSink, SinkError};
use crate::source::{Frame, LandmarkSource, SourceError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Counters reported when a session ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Frames fed to the engine (the final release frame excluded).
    pub frames:   u64,
    /// Frames the source could not deliver.
    pub skipped:  u64,
    /// Messages handed to the sink.
    pub messages: u64,
}

pub struct Session<S, K> {
    engine:  GestureEngine,
    source:  S,
    sink:    K,
    summary: SessionSummary,
}

impl<S: LandmarkSource, K: MessageSink> Session<S, K> {
    pub fn new(engine: GestureEngine, source: S, sink: K) -> Self {
        Session { engine, source, sink, summary: SessionSummary::default() }
    }

    /// Build the engine from `settings` around an already-open sink.
    pub fn from_settings(settings: &Settings, source: S, sink: K) -> Result<Self, ConfigError> {
        let engine = GestureEngine::new(settings.gesture, settings.notes.note_map())?;
        Ok(Session::new(engine, source, sink))
    }

    pub fn engine(&self)  -> &GestureEngine  { &self.engine }
    pub fn summary(&self) -> SessionSummary  { self.summary }

    /// Give back the sink, e.g. to finish a recording.
    pub fn into_sink(self) -> K { self.sink }

    /// Run until the source ends.
    pub fn run(&mut self) -> Result<SessionSummary, AppError> {
        info!("session running");
        loop {
            let frame = match self.source.next_frame() {
                Ok(f)  => f,
                Err(e) => {
                    warn!(error = %e, "landmark source failed, releasing notes");
                    self.release_all()?;
                    return Err(e.into());
                }
            };

            match frame {
                Frame::Hands(hands) => {
                    let msgs = self.engine.process_frame(&hands);
                    self.forward(&msgs)?;
                    self.summary.frames += 1;
                }
                Frame::Unavailable => {
                    debug!("frame unavailable, skipped");
                    self.summary.skipped += 1;
                }
                Frame::End => {
                    self.release_all()?;
                    break;
                }
            }
        }

        let s = self.summary;
        info!(frames = s.frames, skipped = s.skipped, messages = s.messages, "session ended");
        Ok(s)
    }

    /// Process a frame with no hands.
    fn release_all(&mut self) -> Result<(), SinkError> {
        let msgs = self.engine.process_frame(&[]);
        self.forward(&msgs)
    }

    fn forward(&mut self, msgs: &[MidiMessage]) -> Result<(), SinkError> {
        for m in msgs {
            self.sink.send(m)?;
            self.summary.messages += 1;
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
