//! Tunable constants of the gesture engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pinch distance below which a silent finger starts sounding.
pub const DEFAULT_ON_THRESHOLD: f32 = 0.5;
/// Pinch distance above which a sounding finger goes silent.
pub const DEFAULT_OFF_THRESHOLD: f32 = 0.9;
/// Exponent applied to `|thumb_tip.z|` when normalizing pinch distance.
pub const DEFAULT_DEPTH_EXPONENT: f32 = 0.8;
/// Bend units per unit of normalized wrist displacement (2^13).
pub const DEFAULT_BEND_SCALE: f32 = 8192.0;
/// Note-on velocity.
pub const DEFAULT_VELOCITY: u8 = 112;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f32 },
    #[error("on_threshold must be > 0, got {0}")]
    OnThreshold(f32),
    #[error("on_threshold ({on}) must be below off_threshold ({off})")]
    InvertedBand { on: f32, off: f32 },
    #[error("velocity must be 0–127, got {0}")]
    Velocity(u8),
}

/// Thresholds and scales for the state machine and bend controller.
///
/// Distances are dimensionless (image-plane distance divided by
/// `|z|^depth_exponent`).  The band `[on_threshold, off_threshold]` is the
/// hysteresis band where no transition fires.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    pub on_threshold:   f32,
    pub off_threshold:  f32,
    pub depth_exponent: f32,
    pub bend_scale:     f32,
    pub velocity:       u8,
}

impl Default for GestureConfig {
    fn default() -> Self {
        GestureConfig {
            on_threshold:   DEFAULT_ON_THRESHOLD,
            off_threshold:  DEFAULT_OFF_THRESHOLD,
            depth_exponent: DEFAULT_DEPTH_EXPONENT,
            bend_scale:     DEFAULT_BEND_SCALE,
            velocity:       DEFAULT_VELOCITY,
        }
    }
}

impl GestureConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("on_threshold",   self.on_threshold),
            ("off_threshold",  self.off_threshold),
            ("depth_exponent", self.depth_exponent),
            ("bend_scale",     self.bend_scale),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field, value });
            }
        }
        if self.on_threshold <= 0.0 {
            return Err(ConfigError::OnThreshold(self.on_threshold));
        }
        if self.on_threshold >= self.off_threshold {
            return Err(ConfigError::InvertedBand { on: self.on_threshold, off: self.off_threshold });
        }
        if self.velocity > 127 {
            return Err(ConfigError::Velocity(self.velocity));
        }
        Ok(())
    }
}
