//! The 21-point hand skeleton produced by the pose estimator.
//!
//! Coordinates follow the estimator's convention: `x`/`y` normalized to the
//! image (0.0–1.0), `z` a relative depth whose sign and scale the estimator
//! defines.

use thiserror::Error;

/// Number of landmarks in one hand observation.
pub const LANDMARK_COUNT: usize = 21;

// ════════════════════════════════════════════════════════════════════════════
// LandmarkIndex
// ════════════════════════════════════════════════════════════════════════════

/// Named landmark positions, in estimator order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum LandmarkIndex {
    Wrist           = 0,
    ThumbCmc        = 1,
    ThumbMcp        = 2,
    ThumbIp         = 3,
    ThumbTip        = 4,
    IndexFingerMcp  = 5,
    IndexFingerPip  = 6,
    IndexFingerDip  = 7,
    IndexFingerTip  = 8,
    MiddleFingerMcp = 9,
    MiddleFingerPip = 10,
    MiddleFingerDip = 11,
    MiddleFingerTip = 12,
    RingFingerMcp   = 13,
    RingFingerPip   = 14,
    RingFingerDip   = 15,
    RingFingerTip   = 16,
    PinkyMcp        = 17,
    PinkyPip        = 18,
    PinkyDip        = 19,
    PinkyTip        = 20,
}

impl LandmarkIndex {
    pub fn index(self) -> usize { self as usize }
}

// ════════════════════════════════════════════════════════════════════════════
// Landmark / HandObservation
// ════════════════════════════════════════════════════════════════════════════

/// One point of the hand skeleton.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self { Landmark { x, y, z } }

    /// Distance to `other` in the image plane, ignoring depth.
    pub fn planar_distance(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LandmarkError {
    #[error("expected 21 landmarks, got {0}")]
    WrongCount(usize),
}

/// All 21 landmarks of one detected hand in one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct HandObservation {
    landmarks: [Landmark; LANDMARK_COUNT],
}

impl HandObservation {
    pub fn new(landmarks: [Landmark; LANDMARK_COUNT]) -> Self {
        HandObservation { landmarks }
    }

    /// Build from a slice that must hold exactly 21 points.
    pub fn from_slice(points: &[Landmark]) -> Result<Self, LandmarkError> {
        let landmarks: [Landmark; LANDMARK_COUNT] = points
            .try_into()
            .map_err(|_| LandmarkError::WrongCount(points.len()))?;
        Ok(HandObservation { landmarks })
    }

    pub fn get(&self, idx: LandmarkIndex) -> &Landmark {
        &self.landmarks[idx.index()]
    }

    pub fn wrist(&self)     -> &Landmark { self.get(LandmarkIndex::Wrist) }
    pub fn thumb_tip(&self) -> &Landmark { self.get(LandmarkIndex::ThumbTip) }

    pub fn landmarks(&self) -> &[Landmark; LANDMARK_COUNT] { &self.landmarks }

    /// Replace one landmark (builder style).
    pub fn with(mut self, idx: LandmarkIndex, point: Landmark) -> Self {
        self.landmarks[idx.index()] = point;
        self
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_values_match_estimator_order() {
        assert_eq!(LandmarkIndex::Wrist.index(), 0);
        assert_eq!(LandmarkIndex::ThumbTip.index(), 4);
        assert_eq!(LandmarkIndex::IndexFingerMcp.index(), 5);
        assert_eq!(LandmarkIndex::IndexFingerTip.index(), 8);
        assert_eq!(LandmarkIndex::PinkyMcp.index(), 17);
        assert_eq!(LandmarkIndex::PinkyTip.index(), 20);
    }

    #[test]
    fn from_slice_rejects_wrong_count() {
        let pts = vec![Landmark::default(); 20];
        assert_eq!(HandObservation::from_slice(&pts), Err(LandmarkError::WrongCount(20)));
    }

    #[test]
    fn from_slice_keeps_order() {
        let pts: Vec<Landmark> = (0..21).map(|i| Landmark::new(i as f32, 0.0, 0.0)).collect();
        let obs = HandObservation::from_slice(&pts).unwrap();
        assert_eq!(obs.get(LandmarkIndex::RingFingerTip).x, 16.0);
    }

    #[test]
    fn planar_distance_ignores_depth() {
        let a = Landmark::new(0.0, 0.0, 5.0);
        let b = Landmark::new(0.3, 0.4, -5.0);
        assert!((a.planar_distance(&b) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn with_replaces_a_single_point() {
        let obs = HandObservation::new([Landmark::default(); 21])
            .with(LandmarkIndex::Wrist, Landmark::new(0.1, 0.2, 0.3));
        assert_eq!(obs.wrist().y, 0.2);
        assert_eq!(obs.thumb_tip(), &Landmark::default());
    }
}
