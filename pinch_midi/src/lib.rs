//! # pinch_midi
//!
//! The musical side of the pinch controller:
//!
//! * [`MidiMessage`] — note-on, note-off and 14-bit [`PitchBend`] values,
//!   serialised to wire bytes per channel.
//! * [`NoteMap`] — which pitch each finger of each hand plays, built from a
//!   [`ScalePreset`].
//! * [`smf`] — record a performance as a Type-0 Standard MIDI File.
//!
//! ## Quick start
//!
//! ```rust
//! use pinch_midi::{MidiMessage, NoteMap, PitchBend, ScalePreset};
//!
//! let notes = NoteMap::from_preset(ScalePreset::Pentatonic);
//! assert_eq!(notes.right().get(0), 69); // right index finger → A4
//!
//! let on = MidiMessage::NoteOn { pitch: 69, velocity: 112 };
//! assert_eq!(on.to_bytes(0), [0x90, 69, 112]);
//!
//! let bend = PitchBend::from_displacement(0.0, 8192.0);
//! assert_eq!(bend, PitchBend::center());
//! ```

pub mod message;
pub mod notes;
pub mod smf;

pub use message::{MidiMessage, PitchBend, note_name};
pub use notes::{HandNotes, NoteMap, ScalePreset, UnknownPreset};
pub use smf::SmfTrack;
