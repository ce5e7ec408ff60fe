//! # pinch_play
//!
//! Live pinch-to-MIDI controller.  Hand landmarks come in from a pose
//! estimator, the [`pinch_gesture`] engine turns them into notes and pitch
//! bends, and the messages go out to a MIDI port.
//!
//! ## Pieces
//!
//! | Module | Role |
//! |---|---|
//! | [`source`] | `LandmarkSource`: estimator subprocess, JSON-lines file or stdin, in-memory replay |
//! | [`sink`] | `MessageSink`: midir port, dry-run log, `.mid` recording, in-memory |
//! | [`port`] | pick a MIDI output by index, name, virtual port or prompt |
//! | [`settings`] | TOML settings file |
//! | [`app`] | the session loop |
//!
//! ## Landmark input
//!
//! The estimator is any program that prints one JSON object per frame on
//! stdout (see [`source`]).  It may print `READY` first while its model
//! loads.
//!
//! ```text
//! pinch_play "FLUID" --estimator python3 hands_json.py
//! pinch_play --dry-run --input session.jsonl
//! ```

pub mod app;
pub mod port;
pub mod settings;
pub mod sink;
pub mod source;
