//! Message sinks — where control messages go.
//!
//! The session hands every message to a [`MessageSink`] in emission order.
//! Channel assignment happens here, at the last moment before bytes are
//! written; the gesture engine never sees a channel.

use std::path::Path;
use std::time::{Duration, Instant};

use pinch_midi::smf::{ms_to_ticks, SmfTrack};
use pinch_midi::{note_name, MidiMessage};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("MIDI send failed: {0}")]
    Send(#[from] midir::SendError),
    #[error("writing recording: {0}")]
    Io(#[from] std::io::Error),
}

// ════════════════════════════════════════════════════════════════════════════
// MessageSink trait
// ════════════════════════════════════════════════════════════════════════════

pub trait MessageSink {
    fn send(&mut self, msg: &MidiMessage) -> Result<(), SinkError>;
}

impl<S: MessageSink + ?Sized> MessageSink for Box<S> {
    fn send(&mut self, msg: &MidiMessage) -> Result<(), SinkError> {
        (**self).send(msg)
    }
}

// ── midir backend ─────────────────────────────────────────────────────────

/// An open MIDI output port.
pub struct MidirSink {
    conn:    midir::MidiOutputConnection,
    channel: u8,
}

impl MidirSink {
    pub fn new(conn: midir::MidiOutputConnection, channel: u8) -> Self {
        MidirSink { conn, channel: channel & 0x0F }
    }
}

impl MessageSink for MidirSink {
    fn send(&mut self, msg: &MidiMessage) -> Result<(), SinkError> {
        self.conn.send(&msg.to_bytes(self.channel))?;
        Ok(())
    }
}

// ── dry-run backend ───────────────────────────────────────────────────────

/// Logs each message instead of sending it.
#[derive(Debug, Default)]
pub struct LogSink {
    channel: u8,
    sent:    u64,
}

impl LogSink {
    pub fn new(channel: u8) -> Self {
        LogSink { channel: channel & 0x0F, sent: 0 }
    }

    pub fn sent(&self) -> u64 { self.sent }
}

impl MessageSink for LogSink {
    fn send(&mut self, msg: &MidiMessage) -> Result<(), SinkError> {
        let [status, d1, d2] = msg.to_bytes(self.channel);
        match msg.pitch() {
            Some(p) => info!(%msg, note = %note_name(p), "midi {:02X} {:02X} {:02X}", status, d1, d2),
            None    => info!(%msg, "midi {:02X} {:02X} {:02X}", status, d1, d2),
        }
        self.sent += 1;
        Ok(())
    }
}

// ── in-memory backend ─────────────────────────────────────────────────────

/// Collects every message.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub messages: Vec<MidiMessage>,
}

impl MessageSink for MemorySink {
    fn send(&mut self, msg: &MidiMessage) -> Result<(), SinkError> {
        self.messages.push(*msg);
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// RecordingSink — forward and capture as a Standard MIDI File
// ════════════════════════════════════════════════════════════════════════════

/// Forwards to `inner` and records every message with its wall-clock offset
/// from the first one.  Call [`finish`](Self::finish) to write the file.
pub struct RecordingSink<S> {
    inner:   S,
    track:   SmfTrack,
    started: Option<Instant>,
    /// Offset of the previous event, in whole milliseconds.
    last_ms: u64,
}

impl<S: MessageSink> RecordingSink<S> {
    pub fn new(inner: S, channel: u8) -> Self {
        RecordingSink {
            inner,
            track:   SmfTrack::new(channel & 0x0F, "pinch_play performance"),
            started: None,
            last_ms: 0,
        }
    }

    pub fn track(&self) -> &SmfTrack { &self.track }

    /// Forward `msg` and record it at offset `at` from the start of the
    /// recording.  Offsets must not go backwards; a smaller one records a
    /// zero delta.
    pub fn send_at(&mut self, msg: &MidiMessage, at: Duration) -> Result<(), SinkError> {
        self.inner.send(msg)?;
        let ms = at.as_millis().min(u64::MAX as u128) as u64;
        let delta_ms = ms.saturating_sub(self.last_ms);
        self.last_ms = self.last_ms.max(ms);
        let delta = ms_to_ticks(delta_ms, self.track.ticks_per_quarter, self.track.tempo_bpm);
        self.track.push(delta, *msg);
        Ok(())
    }

    /// Write the recording to `path` and hand back the inner sink.
    pub fn finish<P: AsRef<Path>>(self, path: P) -> Result<S, SinkError> {
        let path = path.as_ref();
        self.track.write_file(path)?;
        info!(
            path = %path.display(),
            events = self.track.events.len(),
            ticks = self.track.duration_ticks(),
            "recording written"
        );
        Ok(self.inner)
    }
}

impl<S: MessageSink> MessageSink for RecordingSink<S> {
    fn send(&mut self, msg: &MidiMessage) -> Result<(), SinkError> {
        let started = *self.started.get_or_insert_with(Instant::now);
        self.send_at(msg, started.elapsed())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
