//! Finger → pitch note maps.
//!
//! A [`NoteMap`] holds one [`HandNotes`] table per hand.  Each table is four
//! pitches in fixed finger order: index, middle, ring, pinky.  Exactly one
//! [`ScalePreset`] is chosen per session.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Semitone steps above the root for the scale-derived presets.
const MAJOR_STEPS: [u8; 7] = [0, 2, 4, 5, 7, 9, 11];
const MINOR_STEPS: [u8; 7] = [0, 2, 3, 5, 7, 8, 10];

/// Pitch of scale degree `degree` above `root`, climbing an octave each
/// time the steps run out.  Clamped to 127.
fn degree_pitch(steps: &[u8], root: u8, degree: usize) -> u8 {
    if steps.is_empty() { return root; }
    let octave = degree / steps.len();
    let pitch = root as usize + octave * 12 + steps[degree % steps.len()] as usize;
    pitch.min(127) as u8
}

// ════════════════════════════════════════════════════════════════════════════
// HandNotes / NoteMap
// ════════════════════════════════════════════════════════════════════════════

/// Pitches for one hand, ordered index, middle, ring, pinky.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandNotes(pub [u8; 4]);

impl HandNotes {
    /// Pitch at finger position `slot` (0 = index … 3 = pinky).
    pub fn get(&self, slot: usize) -> u8 { self.0[slot] }

    /// The four degrees starting at `first` of the scale built on `root`.
    fn from_steps(steps: &[u8], root: u8, first: usize) -> Self {
        HandNotes(std::array::from_fn(|i| degree_pitch(steps, root, first + i)))
    }

    fn clamped(self) -> Self {
        HandNotes(self.0.map(|p| p.min(127)))
    }
}

/// The session's finger-to-pitch assignment.  Immutable once built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NoteMap {
    left:  HandNotes,
    right: HandNotes,
}

impl NoteMap {
    /// Explicit tables; pitches above 127 are clamped.
    pub fn new(left: HandNotes, right: HandNotes) -> Self {
        NoteMap { left: left.clamped(), right: right.clamped() }
    }

    pub fn from_preset(preset: ScalePreset) -> Self {
        match preset {
            ScalePreset::Pentatonic => NoteMap::new(
                HandNotes([60, 62, 64, 67]),   // C D E G
                HandNotes([69, 72, 76, 79]),   // A C E G
            ),
            ScalePreset::Ryukyu => NoteMap::new(
                HandNotes([60, 64, 65, 67]),   // C E F G
                HandNotes([77, 79, 83, 84]),   // F G B C
            ),
            ScalePreset::Major => Self::stacked(&MAJOR_STEPS, 60),
            ScalePreset::Minor => Self::stacked(&MINOR_STEPS, 60),
        }
    }

    /// Left hand takes degrees 0–3, right hand degrees 4–7.
    fn stacked(steps: &[u8], root: u8) -> Self {
        NoteMap::new(
            HandNotes::from_steps(steps, root, 0),
            HandNotes::from_steps(steps, root, 4),
        )
    }

    pub fn left(&self)  -> &HandNotes { &self.left }
    pub fn right(&self) -> &HandNotes { &self.right }
}

impl Default for NoteMap {
    fn default() -> Self { NoteMap::from_preset(ScalePreset::default()) }
}

// ════════════════════════════════════════════════════════════════════════════
// ScalePreset
// ════════════════════════════════════════════════════════════════════════════

/// Built-in note maps, selectable at startup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalePreset {
    #[default]
    Pentatonic,
    Ryukyu,
    Major,
    Minor,
}

impl ScalePreset {
    pub const ALL: [ScalePreset; 4] = [
        ScalePreset::Pentatonic,
        ScalePreset::Ryukyu,
        ScalePreset::Major,
        ScalePreset::Minor,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ScalePreset::Pentatonic => "pentatonic",
            ScalePreset::Ryukyu     => "ryukyu",
            ScalePreset::Major      => "major",
            ScalePreset::Minor      => "minor",
        }
    }
}

impl fmt::Display for ScalePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an unrecognised preset name.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown scale preset {0:?} (expected one of: pentatonic, ryukyu, major, minor)")]
pub struct UnknownPreset(pub String);

impl FromStr for ScalePreset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScalePreset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownPreset(s.to_string()))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
