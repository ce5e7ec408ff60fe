//! Standard MIDI File (Type 0) serialisation of a recorded performance.

use crate::message::MidiMessage;

/// Default MIDI resolution.
pub const DEFAULT_TPQ: u16 = 480;

/// Default recording tempo; only sets the tick ↔ time relation.
pub const DEFAULT_BPM: u32 = 120;

/// One recorded message with its delta time in ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimedMessage {
    pub delta_ticks: u32,
    pub message:     MidiMessage,
}

/// A single-track recording ready for serialisation.
#[derive(Clone, Debug)]
pub struct SmfTrack {
    pub events:            Vec<TimedMessage>,
    pub ticks_per_quarter: u16,
    pub tempo_bpm:         u32,
    pub channel:           u8,
    /// Embedded as the track name meta-event.
    pub description:       String,
}

impl SmfTrack {
    pub fn new(channel: u8, description: &str) -> Self {
        SmfTrack {
            events:            Vec::new(),
            ticks_per_quarter: DEFAULT_TPQ,
            tempo_bpm:         DEFAULT_BPM,
            channel:           channel & 0x0F,
            description:       description.to_string(),
        }
    }

    /// Append a message `delta_ticks` after the previous one.
    pub fn push(&mut self, delta_ticks: u32, message: MidiMessage) {
        self.events.push(TimedMessage { delta_ticks, message });
    }

    /// Total length of the track in ticks.
    pub fn duration_ticks(&self) -> u64 {
        self.events.iter().map(|e| e.delta_ticks as u64).sum()
    }

    /// Write the recording as a `.mid` file.
    pub fn write_file<P: AsRef<std::path::Path>>(&self, path: P) -> std::io::Result<()> {
        std::fs::write(path, self.to_bytes())
    }

    /// The complete file: an `MThd` header (format 0, one track) followed by
    /// the single `MTrk` chunk.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut header = [0u8; 6];
        header[2..4].copy_from_slice(&1u16.to_be_bytes());
        header[4..6].copy_from_slice(&self.ticks_per_quarter.to_be_bytes());

        let mut out = chunk(b"MThd", &header);
        out.extend(chunk(b"MTrk", &self.track_body()));
        out
    }

    /// Tempo and name meta-events, the recorded messages, End of Track.
    fn track_body(&self) -> Vec<u8> {
        let mut body = Vec::new();

        let tempo_us = (60_000_000 / self.tempo_bpm.max(1)).to_be_bytes();
        meta_event(&mut body, 0x51, &tempo_us[1..]);
        meta_event(&mut body, 0x03, self.description.as_bytes());

        for ev in &self.events {
            write_vlq(&mut body, ev.delta_ticks);
            body.extend(ev.message.to_bytes(self.channel));
        }

        meta_event(&mut body, 0x2F, &[]);
        body
    }
}

/// `id`, big-endian length, payload.
fn chunk(id: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + payload.len());
    out.extend_from_slice(id);
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(payload);
    out
}

/// A zero-delta meta-event of type `kind`.
fn meta_event(body: &mut Vec<u8>, kind: u8, data: &[u8]) {
    body.extend_from_slice(&[0x00, 0xFF, kind]);
    write_vlq(body, data.len() as u32);
    body.extend_from_slice(data);
}

/// Convert elapsed milliseconds to ticks given TPQ and BPM.
pub fn ms_to_ticks(ms: u64, tpq: u16, bpm: u32) -> u32 {
    // ticks = ms * tpq * bpm / 60_000
    let ticks = ms.saturating_mul(tpq as u64 * bpm.max(1) as u64) / 60_000;
    ticks.min(0x0FFF_FFFF) as u32
}

/// Write a MIDI variable-length quantity (VLQ).  Values are capped at the
/// 28-bit VLQ maximum.
fn write_vlq(buf: &mut Vec<u8>, value: u32) {
    let mut value = value.min(0x0FFF_FFFF);
    let mut bytes = [0u8; 4];
    let mut i = 3;
    bytes[i] = (value & 0x7F) as u8;
    value >>= 7;
    while value > 0 {
        i -= 1;
        bytes[i] = ((value & 0x7F) | 0x80) as u8;
        value >>= 7;
    }
    buf.extend_from_slice(&bytes[i..]);
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
