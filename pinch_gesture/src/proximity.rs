//! Depth-normalized pinch distance.
//!
//! The same physical gap between thumb and fingertip looks smaller in image
//! coordinates the farther the hand is from the camera, so the planar gap is
//! divided by `|thumb_tip.z|^exponent`.

use crate::hand::Finger;
use crate::landmark::HandObservation;

/// Pinch distance between `finger`'s tip and the thumb tip.
///
/// Returns exactly `0.0` when the two landmarks coincide; callers treat that
/// as a sensor artifact.  A zero thumb depth gives `+∞` (or NaN when the gap
/// is also zero), and neither fires a transition's lower bound.
pub fn pinch_distance(obs: &HandObservation, finger: Finger, exponent: f32) -> f32 {
    let thumb = obs.thumb_tip();
    let tip   = obs.get(finger.tip());
    tip.planar_distance(thumb) / thumb.z.abs().powf(exponent)
}
