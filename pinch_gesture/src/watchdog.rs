//! Presence watchdog: a hand missing from a frame has all its pitches
//! released.
//!
//! The forced note-offs are corrective only.  They do not touch the finger
//! phases, and they repeat every frame the hand stays missing; receivers
//! treat note-off as idempotent.

use pinch_midi::MidiMessage;

use crate::hand::{Finger, Handedness};
use crate::session::SessionState;

/// Which hands appeared in the current frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Presence {
    pub left:  bool,
    pub right: bool,
}

impl Presence {
    pub fn mark(&mut self, hand: Handedness) {
        match hand {
            Handedness::Left  => self.left = true,
            Handedness::Right => self.right = true,
        }
    }

    pub fn contains(&self, hand: Handedness) -> bool {
        match hand {
            Handedness::Left  => self.left,
            Handedness::Right => self.right,
        }
    }
}

/// Order in which absent hands are released.
const RELEASE_ORDER: [Handedness; 2] = [Handedness::Right, Handedness::Left];

/// Append note-offs for every pitch of every absent hand.  Returns the
/// number of messages added.
pub fn release_absent(presence: &Presence, state: &SessionState, out: &mut Vec<MidiMessage>) -> usize {
    let before = out.len();
    for hand in RELEASE_ORDER {
        if presence.contains(hand) { continue; }
        for finger in Finger::ALL {
            out.push(MidiMessage::NoteOff { pitch: state.pitch(hand, finger) });
        }
    }
    out.len() - before
}
