//! Session state: one [`FingerState`] per (hand, finger) pair.

use pinch_midi::NoteMap;

use crate::finger::FingerState;
use crate::hand::{Finger, Handedness};

/// Number of (hand, finger) pairs.
pub const PAIR_COUNT: usize = 8;

/// Composite key into the session's finger table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairKey {
    pub hand:   Handedness,
    pub finger: Finger,
}

impl PairKey {
    pub fn new(hand: Handedness, finger: Finger) -> Self { PairKey { hand, finger } }

    fn slot(self) -> usize {
        self.hand.index() * Finger::ALL.len() + self.finger.index()
    }

    /// All eight pairs: left hand first, fingers in iteration order.
    pub fn all() -> impl Iterator<Item = PairKey> {
        Handedness::ALL.into_iter()
            .flat_map(|h| Finger::ALL.into_iter().map(move |f| PairKey::new(h, f)))
    }
}

/// Everything the engine mutates across frames.
///
/// Created once at session start with every pair Silent; pairs are never
/// added or removed.
#[derive(Debug, Clone)]
pub struct SessionState {
    notes:   NoteMap,
    fingers: [FingerState; PAIR_COUNT],
}

impl SessionState {
    pub fn new(notes: NoteMap, velocity: u8) -> Self {
        let fingers = std::array::from_fn(|slot| {
            let hand = if slot < Finger::ALL.len() { Handedness::Left } else { Handedness::Right };
            let finger = Finger::ALL[slot % Finger::ALL.len()];
            FingerState::new(pitch_for(&notes, hand, finger), velocity)
        });
        SessionState { notes, fingers }
    }

    pub fn finger(&self, hand: Handedness, finger: Finger) -> &FingerState {
        &self.fingers[PairKey::new(hand, finger).slot()]
    }

    pub(crate) fn finger_mut(&mut self, hand: Handedness, finger: Finger) -> &mut FingerState {
        &mut self.fingers[PairKey::new(hand, finger).slot()]
    }

    /// Mapped pitch for a pair.
    pub fn pitch(&self, hand: Handedness, finger: Finger) -> u8 {
        pitch_for(&self.notes, hand, finger)
    }

    /// Pairs currently sounding.
    pub fn sounding(&self) -> impl Iterator<Item = PairKey> + '_ {
        PairKey::all().filter(|k| self.finger(k.hand, k.finger).is_sounding())
    }
}

fn pitch_for(notes: &NoteMap, hand: Handedness, finger: Finger) -> u8 {
    let table = match hand {
        Handedness::Left  => notes.left(),
        Handedness::Right => notes.right(),
    };
    table.get(finger.index())
}
