//! The gesture engine: one frame of hand observations in, control messages
//! out.
//!
//! Per frame, in order:
//!
//! 1. each observation (at most two) is classified Left/Right; a second
//!    observation of an already-seen hand is dropped, so each pair steps at
//!    most once;
//! 2. for each finger, index → pinky, the pinch distance drives that pair's
//!    state machine, and held right-hand notes emit a wrist bend;
//! 3. the presence watchdog releases every pitch of a hand that did not
//!    appear.

use pinch_midi::{MidiMessage, NoteMap};
use tracing::{debug, info, warn};

use crate::bend::drives_bend;
use crate::config::{ConfigError, GestureConfig};
use crate::finger::Transition;
use crate::hand::{classify, Finger};
use crate::landmark::HandObservation;
use crate::proximity::pinch_distance;
use crate::session::SessionState;
use crate::watchdog::{release_absent, Presence};

/// Observations beyond this count in one frame are ignored.
pub const MAX_HANDS: usize = 2;

/// Owns the session state; the only thing that mutates it.
#[derive(Debug, Clone)]
pub struct GestureEngine {
    config: GestureConfig,
    state:  SessionState,
    frames: u64,
}

impl GestureEngine {
    /// Start a session.  Every pair begins Silent.
    pub fn new(config: GestureConfig, notes: NoteMap) -> Result<Self, ConfigError> {
        config.validate()?;
        info!(
            left = ?notes.left().0,
            right = ?notes.right().0,
            on = config.on_threshold,
            off = config.off_threshold,
            "gesture session started"
        );
        Ok(GestureEngine {
            state: SessionState::new(notes, config.velocity),
            config,
            frames: 0,
        })
    }

    pub fn config(&self) -> &GestureConfig { &self.config }
    pub fn state(&self)  -> &SessionState  { &self.state }
    pub fn frames(&self) -> u64            { self.frames }

    /// Process one frame.  The returned messages are in emission order; an
    /// empty frame (no hands) releases both hands.
    pub fn process_frame(&mut self, hands: &[HandObservation]) -> Vec<MidiMessage> {
        let mut out = Vec::new();
        let mut presence = Presence::default();

        if hands.len() > MAX_HANDS {
            warn!(count = hands.len(), "more than {} hands in frame; extra ignored", MAX_HANDS);
        }

        for obs in hands.iter().take(MAX_HANDS) {
            let hand = classify(obs);
            if presence.contains(hand) {
                warn!(%hand, "hand seen twice in frame; second observation ignored");
                continue;
            }
            presence.mark(hand);
            let wrist_y = obs.wrist().y;
            let bends   = drives_bend(hand);

            for finger in Finger::ALL {
                let d = pinch_distance(obs, finger, self.config.depth_exponent);
                let fs = self.state.finger_mut(hand, finger);
                match fs.update(d, wrist_y, bends, &self.config, &mut out) {
                    Transition::Started =>
                        info!(%hand, %finger, pitch = fs.pitch(), d, "note on"),
                    Transition::Stopped =>
                        info!(%hand, %finger, pitch = fs.pitch(), d, "note off"),
                    Transition::Held | Transition::Idle => {}
                }
            }
        }

        let released = release_absent(&presence, &self.state, &mut out);
        if released > 0 {
            debug!(frame = self.frames, left = presence.left, right = presence.right,
                   released, "watchdog released absent hand");
        }

        self.frames += 1;
        out
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finger::Phase;
    use crate::hand::Handedness;
    use crate::landmark::{Landmark, LandmarkIndex};
    use pinch_midi::PitchBend;

    /// Thumb depth whose |z|^0.8 is exactly 1, so distance = planar gap.
    const UNIT_Z: f32 = -1.0;
    /// Pinch distance inside the hysteresis band.
    const REST: f32 = 0.7;

    /// A hand whose fingertips sit at the given pinch distances (index,
    /// middle, ring, pinky) from the thumb, with the wrist at `wrist_y`.
    fn hand(hand: Handedness, gaps: [f32; 4], wrist_y: f32) -> HandObservation {
        let (ix, px) = match hand {
            Handedness::Right => (0.7, 0.4),
            Handedness::Left  => (0.3, 0.6),
        };
        let thumb = Landmark::new(0.5, 0.5, UNIT_Z);
        let mut obs = HandObservation::new([Landmark::default(); 21])
            .with(LandmarkIndex::Wrist,          Landmark::new(0.5, wrist_y, 0.0))
            .with(LandmarkIndex::ThumbTip,       thumb)
            .with(LandmarkIndex::IndexFingerMcp, Landmark::new(ix, 0.6, 0.0))
            .with(LandmarkIndex::PinkyMcp,       Landmark::new(px, 0.6, 0.0));
        for (finger, gap) in Finger::ALL.into_iter().zip(gaps) {
            obs = obs.with(finger.tip(), Landmark::new(0.5, 0.5 - gap, UNIT_Z));
        }
        obs
    }

    fn right_index(d: f32, wrist_y: f32) -> HandObservation {
        hand(Handedness::Right, [d, REST, REST, REST], wrist_y)
    }

    fn left_rest() -> HandObservation {
        hand(Handedness::Left, [REST; 4], 0.5)
    }

    fn engine() -> GestureEngine {
        GestureEngine::new(GestureConfig::default(), NoteMap::default()).unwrap()
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = GestureConfig { on_threshold: 1.0, off_threshold: 0.5, ..Default::default() };
        assert!(GestureEngine::new(cfg, NoteMap::default()).is_err());
    }

    // ── the three-frame scenario ─────────────────────────────────────────
    #[test]
    fn right_index_on_then_off() {
        let mut e = engine();
        let pitch = e.state().pitch(Handedness::Right, Finger::Index);
        assert_eq!(pitch, 69);

        let f1 = e.process_frame(&[right_index(0.6, 0.5), left_rest()]);
        assert!(f1.is_empty());

        let f2 = e.process_frame(&[right_index(0.4, 0.5), left_rest()]);
        assert_eq!(f2, vec![
            MidiMessage::PitchBend(PitchBend::center()),
            MidiMessage::NoteOn { pitch, velocity: 112 },
        ]);

        let f3 = e.process_frame(&[right_index(0.95, 0.5), left_rest()]);
        assert_eq!(f3, vec![MidiMessage::NoteOff { pitch }]);
        assert_eq!(e.frames(), 3);
    }

    #[test]
    fn held_right_note_tracks_wrist() {
        let mut e = engine();
        e.process_frame(&[right_index(0.3, 0.6), left_rest()]);
        let out = e.process_frame(&[right_index(0.7, 0.5), left_rest()]);
        assert_eq!(out.len(), 1);
        match out[0] {
            MidiMessage::PitchBend(b) => assert!(b.value() > PitchBend::CENTER),
            other => panic!("expected bend, got {other:?}"),
        }
    }

    #[test]
    fn held_left_note_never_bends() {
        let mut e = engine();
        let l = |d: f32, y: f32| hand(Handedness::Left, [d, REST, REST, REST], y);
        let start = e.process_frame(&[l(0.3, 0.6), right_index(REST, 0.5)]);
        assert_eq!(start.len(), 2);
        assert_eq!(start[1], MidiMessage::NoteOn { pitch: 60, velocity: 112 });
        let held = e.process_frame(&[l(0.3, 0.1), right_index(REST, 0.5)]);
        assert!(held.is_empty());
    }

    // ── watchdog ─────────────────────────────────────────────────────────
    #[test]
    fn empty_frames_release_every_frame_without_changing_phase() {
        let mut e = engine();
        e.process_frame(&[right_index(0.3, 0.5), left_rest()]);
        assert_eq!(e.state().finger(Handedness::Right, Finger::Index).phase(), Phase::Sounding);

        for _ in 0..3 {
            let out = e.process_frame(&[]);
            assert_eq!(out.len(), 8);
            assert!(out.contains(&MidiMessage::NoteOff { pitch: 69 }));
            assert!(out.iter().all(|m| m.is_note_off()));
            assert_eq!(e.state().finger(Handedness::Right, Finger::Index).phase(), Phase::Sounding);
        }
    }

    #[test]
    fn missing_left_hand_is_released_after_transitions() {
        let mut e = engine();
        let out = e.process_frame(&[right_index(0.3, 0.5)]);
        assert_eq!(out.len(), 2 + 4);
        assert!(out[1].is_note_on());
        let offs: Vec<u8> = out[2..].iter().filter_map(|m| m.pitch()).collect();
        assert_eq!(offs, [60, 62, 64, 67]);
    }

    #[test]
    fn note_resumes_bending_after_hand_returns() {
        let mut e = engine();
        e.process_frame(&[right_index(0.3, 0.5), left_rest()]);
        e.process_frame(&[left_rest()]);
        let out = e.process_frame(&[right_index(REST, 0.5), left_rest()]);
        assert_eq!(out, vec![MidiMessage::PitchBend(PitchBend::center())]);
    }

    // ── ordering and limits ──────────────────────────────────────────────
    #[test]
    fn fingers_emit_in_fixed_order() {
        let mut e = engine();
        let both = hand(Handedness::Right, [REST, 0.2, REST, 0.1], 0.5);
        let out = e.process_frame(&[both, left_rest()]);
        let ons: Vec<u8> = out.iter().filter(|m| m.is_note_on()).filter_map(|m| m.pitch()).collect();
        assert_eq!(ons, [72, 79]); // middle before pinky
    }

    #[test]
    fn zero_distance_never_starts() {
        let mut e = engine();
        let out = e.process_frame(&[right_index(0.0, 0.5), left_rest()]);
        assert!(out.is_empty());
    }

    #[test]
    fn duplicate_hand_steps_each_pair_once() {
        let mut e = engine();
        let out = e.process_frame(&[right_index(0.3, 0.5), right_index(0.95, 0.2), left_rest()]);
        // Only the first right observation counts; the third (left) is
        // beyond MAX_HANDS, so the left hand is released.
        assert_eq!(out[..2], [
            MidiMessage::PitchBend(PitchBend::center()),
            MidiMessage::NoteOn { pitch: 69, velocity: 112 },
        ]);
        assert!(!out.contains(&MidiMessage::NoteOff { pitch: 69 }));
        assert_eq!(e.state().finger(Handedness::Right, Finger::Index).phase(), Phase::Sounding);

        // Held note: a duplicate right hand must not bend twice.
        let out = e.process_frame(&[right_index(REST, 0.5), right_index(REST, 0.1)]);
        let bends = out.iter().filter(|m| matches!(m, MidiMessage::PitchBend(_))).count();
        assert_eq!(bends, 1);
        assert_eq!(out.len(), 1 + 4);
    }

    #[test]
    fn third_hand_is_ignored() {
        let mut e = engine();
        let out = e.process_frame(&[left_rest(), left_rest(), right_index(0.2, 0.5)]);
        // The right hand was dropped, so it is absent and released.
        assert!(out.iter().all(|m| m.is_note_off()));
        assert_eq!(out.len(), 4);
        assert_eq!(e.state().sounding().count(), 0);
    }
}
