//! Channel-voice messages produced by the gesture engine.
//!
//! Messages carry no channel; the channel is a property of the destination
//! and is only applied by [`MidiMessage::to_bytes`].

use std::fmt;

// ════════════════════════════════════════════════════════════════════════════
// Status bytes
// ════════════════════════════════════════════════════════════════════════════

pub const NOTE_OFF:   u8 = 0x80;
pub const NOTE_ON:    u8 = 0x90;
pub const PITCH_BEND: u8 = 0xE0;

// ════════════════════════════════════════════════════════════════════════════
// PitchBend — 14-bit bend value
// ════════════════════════════════════════════════════════════════════════════

/// A 14-bit pitch-bend value.  `0x2000` is "no bend".
///
/// The value is always within `0..=0x3FFF`; constructors clamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PitchBend(u16);

impl PitchBend {
    pub const MIN:    u16 = 0;
    pub const CENTER: u16 = 0x2000;
    pub const MAX:    u16 = 0x3FFF;

    /// The rest position.
    pub const fn center() -> Self { PitchBend(Self::CENTER) }

    /// Build from a raw value, clamping into the 14-bit range.
    pub fn from_raw(raw: i32) -> Self {
        PitchBend(raw.clamp(Self::MIN as i32, Self::MAX as i32) as u16)
    }

    /// Bend from a normalized displacement.
    ///
    /// `displacement × scale` is truncated toward zero and added to the
    /// centre, then clamped.  A zero displacement is exactly the centre.
    pub fn from_displacement(displacement: f32, scale: f32) -> Self {
        let offset = (displacement * scale) as i32;
        Self::from_raw(offset.saturating_add(Self::CENTER as i32))
    }

    pub fn value(self) -> u16 { self.0 }

    /// Low 7 bits (first data byte on the wire).
    pub fn lsb(self) -> u8 { (self.0 & 0x7F) as u8 }

    /// High 7 bits (second data byte on the wire).
    pub fn msb(self) -> u8 { ((self.0 >> 7) & 0x7F) as u8 }
}

impl Default for PitchBend {
    fn default() -> Self { Self::center() }
}

// ════════════════════════════════════════════════════════════════════════════
// MidiMessage
// ════════════════════════════════════════════════════════════════════════════

/// One control message for the message sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MidiMessage {
    NoteOn  { pitch: u8, velocity: u8 },
    /// Always sent with release velocity 0.
    NoteOff { pitch: u8 },
    PitchBend(PitchBend),
}

impl MidiMessage {
    /// Serialise to the three wire bytes for `channel` (0–15).
    pub fn to_bytes(&self, channel: u8) -> [u8; 3] {
        let ch = channel & 0x0F;
        match *self {
            MidiMessage::NoteOn { pitch, velocity } =>
                [NOTE_ON | ch, pitch & 0x7F, velocity & 0x7F],
            MidiMessage::NoteOff { pitch } =>
                [NOTE_OFF | ch, pitch & 0x7F, 0],
            MidiMessage::PitchBend(bend) =>
                [PITCH_BEND | ch, bend.lsb(), bend.msb()],
        }
    }

    pub fn is_note_on(&self)  -> bool { matches!(self, MidiMessage::NoteOn  { .. }) }
    pub fn is_note_off(&self) -> bool { matches!(self, MidiMessage::NoteOff { .. }) }

    /// Pitch of a note message; `None` for bends.
    pub fn pitch(&self) -> Option<u8> {
        match *self {
            MidiMessage::NoteOn  { pitch, .. } | MidiMessage::NoteOff { pitch } => Some(pitch),
            MidiMessage::PitchBend(_) => None,
        }
    }
}

impl fmt::Display for MidiMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MidiMessage::NoteOn { pitch, velocity } =>
                write!(f, "note-on  {:>3} ({}) vel={}", pitch, note_name(pitch), velocity),
            MidiMessage::NoteOff { pitch } =>
                write!(f, "note-off {:>3} ({})", pitch, note_name(pitch)),
            MidiMessage::PitchBend(b) =>
                write!(f, "bend     {:>5} [{:#04x} {:#04x}]", b.value(), b.lsb(), b.msb()),
        }
    }
}

/// Scientific pitch name, e.g. 60 → "C4".
pub fn note_name(pitch: u8) -> String {
    const NAMES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];
    let octave = (pitch / 12) as i32 - 1;
    format!("{}{}", NAMES[(pitch % 12) as usize], octave)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
