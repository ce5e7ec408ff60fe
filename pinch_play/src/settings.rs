//! Settings file.
//!
//! ```toml
//! [gesture]
//! on_threshold  = 0.5
//! off_threshold = 0.9
//!
//! [notes]
//! preset = "ryukyu"          # pentatonic | ryukyu | major | minor
//! # right = [69, 72, 76, 79] # overrides one hand of the preset
//!
//! [midi]
//! port         = "fluid"     # index or name substring
//! virtual_port = false
//! channel      = 0
//! client_name  = "pinch_play"
//! ```
//!
//! Every key is optional.  Command-line flags are applied on top by the
//! binary.

use std::path::Path;

use pinch_gesture::{ConfigError, GestureConfig};
use pinch_midi::{HandNotes, NoteMap, ScalePreset};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CLIENT_NAME: &str = "pinch_play";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("reading settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing settings: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("gesture settings: {0}")]
    Gesture(#[from] ConfigError),
    #[error("MIDI channel must be 0–15, got {0}")]
    Channel(u8),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub gesture: GestureConfig,
    pub notes:   NoteSettings,
    pub midi:    MidiSettings,
}

/// Which pitches the fingers play.  `left`/`right` replace that hand's
/// pitches from the preset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteSettings {
    pub preset: ScalePreset,
    pub left:   Option<HandNotes>,
    pub right:  Option<HandNotes>,
}

impl NoteSettings {
    pub fn note_map(&self) -> NoteMap {
        let base = NoteMap::from_preset(self.preset);
        NoteMap::new(
            self.left.unwrap_or(*base.left()),
            self.right.unwrap_or(*base.right()),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MidiSettings {
    /// Port index or name substring; `None` prompts.
    pub port:         Option<String>,
    pub virtual_port: bool,
    pub channel:      u8,
    pub client_name:  String,
}

impl Default for MidiSettings {
    fn default() -> Self {
        MidiSettings {
            port:         None,
            virtual_port: false,
            channel:      0,
            client_name:  DEFAULT_CLIENT_NAME.to_string(),
        }
    }
}

impl Settings {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        self.gesture.validate()?;
        if self.midi.channel > 15 {
            return Err(SettingsError::Channel(self.midi.channel));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_defaults() {
        let s = Settings::from_toml_str("").unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.notes.note_map(), NoteMap::from_preset(ScalePreset::Pentatonic));
        assert_eq!(s.midi.client_name, "pinch_play");
    }

    #[test]
    fn preset_and_partial_gesture() {
        let s = Settings::from_toml_str(r#"
            [gesture]
            off_threshold = 1.2

            [notes]
            preset = "ryukyu"
        "#).unwrap();
        assert_eq!(s.gesture.off_threshold, 1.2);
        assert_eq!(s.gesture.on_threshold, 0.5);
        assert_eq!(s.notes.note_map().right().0, [77, 79, 83, 84]);
    }

    #[test]
    fn custom_hand_overrides_preset() {
        let s = Settings::from_toml_str(r#"
            [notes]
            preset = "ryukyu"
            left = [48, 50, 52, 55]
        "#).unwrap();
        let map = s.notes.note_map();
        assert_eq!(map.left().0,  [48, 50, 52, 55]);
        assert_eq!(map.right().0, [77, 79, 83, 84]);
    }

    #[test]
    fn midi_section() {
        let s = Settings::from_toml_str(r#"
            [midi]
            port = "fluid"
            virtual_port = true
            channel = 9
        "#).unwrap();
        assert_eq!(s.midi.port.as_deref(), Some("fluid"));
        assert!(s.midi.virtual_port);
        assert_eq!(s.midi.channel, 9);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(Settings::from_toml_str("[midi]\nchannel = 16"),
                         Err(SettingsError::Channel(16))));
        assert!(matches!(Settings::from_toml_str("[gesture]\non_threshold = 1.0"),
                         Err(SettingsError::Gesture(_))));
        assert!(matches!(Settings::from_toml_str("[notes]\npreset = \"lydian\""),
                         Err(SettingsError::TomlParse(_))));
    }

    #[test]
    fn loads_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut f, b"[notes]\npreset = \"minor\"\n").unwrap();
        let s = Settings::from_file(f.path()).unwrap();
        assert_eq!(s.notes.preset, ScalePreset::Minor);
    }
}
