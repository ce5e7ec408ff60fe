//! Hand and finger identities, and the left/right classifier.

use std::fmt;

use crate::landmark::{HandObservation, LandmarkIndex};

// ════════════════════════════════════════════════════════════════════════════
// Handedness
// ════════════════════════════════════════════════════════════════════════════

/// Which hand an observation belongs to.  Derived from geometry only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub const ALL: [Handedness; 2] = [Handedness::Left, Handedness::Right];

    pub fn index(self) -> usize {
        match self {
            Handedness::Left  => 0,
            Handedness::Right => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Handedness::Left  => "left",
            Handedness::Right => "right",
        }
    }
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Finger
// ════════════════════════════════════════════════════════════════════════════

/// The four playable fingertips.  The thumb is the pinch reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    /// Fixed iteration order; per-frame message order depends on it.
    pub const ALL: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    /// Slot in a hand's note table (0 = index … 3 = pinky).
    pub fn index(self) -> usize {
        match self {
            Finger::Index  => 0,
            Finger::Middle => 1,
            Finger::Ring   => 2,
            Finger::Pinky  => 3,
        }
    }

    pub fn tip(self) -> LandmarkIndex {
        match self {
            Finger::Index  => LandmarkIndex::IndexFingerTip,
            Finger::Middle => LandmarkIndex::MiddleFingerTip,
            Finger::Ring   => LandmarkIndex::RingFingerTip,
            Finger::Pinky  => LandmarkIndex::PinkyTip,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Finger::Index  => "index",
            Finger::Middle => "middle",
            Finger::Ring   => "ring",
            Finger::Pinky  => "pinky",
        }
    }
}

impl fmt::Display for Finger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// classify
// ════════════════════════════════════════════════════════════════════════════

/// Label an observation Left or Right.
///
/// Front-facing camera image, mirrored: when the index knuckle lies to the
/// right of the pinky knuckle the hand is the performer's right.  Equal x
/// falls through to Left.
pub fn classify(obs: &HandObservation) -> Handedness {
    let index_x = obs.get(LandmarkIndex::IndexFingerMcp).x;
    let pinky_x = obs.get(LandmarkIndex::PinkyMcp).x;
    if index_x > pinky_x { Handedness::Right } else { Handedness::Left }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
