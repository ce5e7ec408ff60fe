//! # pinch_gesture
//!
//! Turns per-frame hand landmarks into note and pitch-bend messages: pinch a
//! fingertip against the thumb to play, raise or lower the right wrist to
//! bend.
//!
//! ## Gesture → Message mapping
//!
//! | Gesture | Hand | Message |
//! |---|---|---|
//! | Fingertip closes on thumb (`d < 0.5`) | Either | centre bend, then note-on for that finger's pitch |
//! | Fingertip opens away (`d > 0.9`) | Either | note-off |
//! | Wrist moves while a note is held | Right | pitch bend every frame |
//! | Hand leaves the frame | Either | note-off for all four of that hand's pitches, every frame |
//!
//! `d` is the thumb–fingertip image distance divided by
//! `|thumb_tip.z|^0.8`; see [`proximity`].  The gap between the two
//! thresholds is a hysteresis band that absorbs estimator jitter.
//!
//! ## Example
//!
//! ```rust
//! use pinch_gesture::{GestureConfig, GestureEngine};
//! use pinch_midi::{NoteMap, ScalePreset};
//!
//! let mut engine = GestureEngine::new(
//!     GestureConfig::default(),
//!     NoteMap::from_preset(ScalePreset::Pentatonic),
//! ).unwrap();
//!
//! // No hands: both hands are released.
//! let msgs = engine.process_frame(&[]);
//! assert_eq!(msgs.len(), 8);
//! ```

pub mod bend;
pub mod config;
pub mod engine;
pub mod finger;
pub mod hand;
pub mod landmark;
pub mod proximity;
pub mod session;
pub mod watchdog;

mod properties;

pub use config::{ConfigError, GestureConfig};
pub use engine::{GestureEngine, MAX_HANDS};
pub use finger::{FingerState, Phase};
pub use hand::{classify, Finger, Handedness};
pub use landmark::{HandObservation, Landmark, LandmarkError, LandmarkIndex, LANDMARK_COUNT};
pub use session::{PairKey, SessionState};
