//! Wrist-driven pitch bend.
//!
//! Raising the wrist above where it was when the note started bends up;
//! lowering it bends down (image y grows downward).

use pinch_midi::PitchBend;

use crate::hand::Handedness;

/// Only the right hand drives pitch bend; the left hand plays unbent.
pub fn drives_bend(hand: Handedness) -> bool {
    hand == Handedness::Right
}

/// Bend for the current wrist height relative to the note's baseline.
pub fn wrist_bend(baseline_y: f32, wrist_y: f32, scale: f32) -> PitchBend {
    PitchBend::from_displacement(baseline_y - wrist_y, scale)
}
