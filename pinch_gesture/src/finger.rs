//! Per-(hand, finger) note state machine.
//!
//! ```text
//!            0 < d < on
//!   Silent ───────────────▶ Sounding
//!      ▲                        │
//!      └────────────────────────┘
//!               d > off
//! ```
//!
//! Between the thresholds, and for the `d == 0` sensor artifact, nothing
//! happens.

use pinch_midi::{MidiMessage, PitchBend};

use crate::bend::wrist_bend;
use crate::config::GestureConfig;

/// Whether a finger's note is currently held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Silent,
    Sounding,
}

/// Outcome of one frame for one finger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Started,
    Stopped,
    Held,
    Idle,
}

/// The hysteresis rule on its own: the phase `phase` moves to for distance
/// `d`, or `None` when it stays put.
pub fn next_phase(phase: Phase, d: f32, cfg: &GestureConfig) -> Option<Phase> {
    match phase {
        Phase::Silent   if d > 0.0 && d < cfg.on_threshold   => Some(Phase::Sounding),
        Phase::Sounding if d != 0.0 && d > cfg.off_threshold => Some(Phase::Silent),
        _ => None,
    }
}

/// Persistent record for one (hand, finger) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct FingerState {
    phase:      Phase,
    /// Wrist y captured when the note started.
    baseline_y: f32,
    pitch:      u8,
    velocity:   u8,
}

impl FingerState {
    pub fn new(pitch: u8, velocity: u8) -> Self {
        FingerState { phase: Phase::Silent, baseline_y: 0.0, pitch, velocity }
    }

    pub fn phase(&self)      -> Phase { self.phase }
    pub fn is_sounding(&self) -> bool { self.phase == Phase::Sounding }
    pub fn baseline_y(&self) -> f32   { self.baseline_y }
    pub fn pitch(&self)      -> u8    { self.pitch }
    pub fn velocity(&self)   -> u8    { self.velocity }

    /// Advance one frame with pinch distance `d` and the observation's wrist
    /// height, appending this pair's messages to `out`.
    ///
    /// * start: centre bend, then note-on; wrist height becomes the baseline
    /// * stop:  note-off only
    /// * held:  a wrist bend when `bends` is set
    pub fn update(
        &mut self,
        d:       f32,
        wrist_y: f32,
        bends:   bool,
        cfg:     &GestureConfig,
        out:     &mut Vec<MidiMessage>,
    ) -> Transition {
        match (self.phase, next_phase(self.phase, d, cfg)) {
            (_, Some(Phase::Sounding)) => {
                self.baseline_y = wrist_y;
                self.phase = Phase::Sounding;
                out.push(MidiMessage::PitchBend(PitchBend::center()));
                out.push(MidiMessage::NoteOn { pitch: self.pitch, velocity: self.velocity });
                Transition::Started
            }
            (_, Some(Phase::Silent)) => {
                self.phase = Phase::Silent;
                out.push(MidiMessage::NoteOff { pitch: self.pitch });
                Transition::Stopped
            }
            (Phase::Sounding, None) => {
                if bends {
                    let bend = wrist_bend(self.baseline_y, wrist_y, cfg.bend_scale);
                    out.push(MidiMessage::PitchBend(bend));
                }
                Transition::Held
            }
            (Phase::Silent, None) => Transition::Idle,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> GestureConfig { GestureConfig::default() }

    fn step(s: &mut FingerState, d: f32, wrist_y: f32, bends: bool) -> (Transition, Vec<MidiMessage>) {
        let mut out = Vec::new();
        let t = s.update(d, wrist_y, bends, &cfg(), &mut out);
        (t, out)
    }

    // ── next_phase ───────────────────────────────────────────────────────
    #[test]
    fn silent_starts_only_below_on_threshold() {
        let c = cfg();
        assert_eq!(next_phase(Phase::Silent, 0.49, &c), Some(Phase::Sounding));
        assert_eq!(next_phase(Phase::Silent, 0.5,  &c), None);
        assert_eq!(next_phase(Phase::Silent, 0.7,  &c), None);
        assert_eq!(next_phase(Phase::Silent, 0.0,  &c), None);
    }

    #[test]
    fn sounding_stops_only_above_off_threshold() {
        let c = cfg();
        assert_eq!(next_phase(Phase::Sounding, 0.91, &c), Some(Phase::Silent));
        assert_eq!(next_phase(Phase::Sounding, 0.9,  &c), None);
        assert_eq!(next_phase(Phase::Sounding, 0.1,  &c), None);
        assert_eq!(next_phase(Phase::Sounding, 0.0,  &c), None);
    }

    #[test]
    fn nan_never_transitions() {
        let c = cfg();
        assert_eq!(next_phase(Phase::Silent,   f32::NAN, &c), None);
        assert_eq!(next_phase(Phase::Sounding, f32::NAN, &c), None);
    }

    #[test]
    fn infinite_distance_releases() {
        assert_eq!(next_phase(Phase::Sounding, f32::INFINITY, &cfg()), Some(Phase::Silent));
    }

    // ── update ───────────────────────────────────────────────────────────
    #[test]
    fn start_emits_center_bend_then_note_on() {
        let mut s = FingerState::new(69, 112);
        let (t, out) = step(&mut s, 0.4, 0.6, true);
        assert_eq!(t, Transition::Started);
        assert_eq!(out, vec![
            MidiMessage::PitchBend(PitchBend::center()),
            MidiMessage::NoteOn { pitch: 69, velocity: 112 },
        ]);
        assert_eq!(s.phase(), Phase::Sounding);
        assert_eq!(s.baseline_y(), 0.6);
    }

    #[test]
    fn stop_emits_note_off_without_bend() {
        let mut s = FingerState::new(69, 112);
        step(&mut s, 0.4, 0.6, true);
        let (t, out) = step(&mut s, 0.95, 0.3, true);
        assert_eq!(t, Transition::Stopped);
        assert_eq!(out, vec![MidiMessage::NoteOff { pitch: 69 }]);
        assert_eq!(s.phase(), Phase::Silent);
    }

    #[test]
    fn held_note_bends_every_frame() {
        let mut s = FingerState::new(60, 112);
        step(&mut s, 0.4, 0.6, true);
        for _ in 0..3 {
            let (t, out) = step(&mut s, 0.7, 0.6, true);
            assert_eq!(t, Transition::Held);
            assert_eq!(out, vec![MidiMessage::PitchBend(PitchBend::center())]);
        }
    }

    #[test]
    fn held_note_without_bend_is_quiet() {
        let mut s = FingerState::new(60, 112);
        step(&mut s, 0.4, 0.6, false);
        let (t, out) = step(&mut s, 0.3, 0.1, false);
        assert_eq!(t, Transition::Held);
        assert!(out.is_empty());
    }

    #[test]
    fn held_note_bends_even_on_zero_distance() {
        let mut s = FingerState::new(60, 112);
        step(&mut s, 0.4, 0.6, true);
        let (t, out) = step(&mut s, 0.0, 0.5, true);
        assert_eq!(t, Transition::Held);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn idle_in_band() {
        let mut s = FingerState::new(60, 112);
        let (t, out) = step(&mut s, 0.7, 0.5, true);
        assert_eq!(t, Transition::Idle);
        assert!(out.is_empty());
    }

    #[test]
    fn restart_takes_new_baseline() {
        let mut s = FingerState::new(60, 112);
        step(&mut s, 0.4, 0.6, true);
        step(&mut s, 0.95, 0.6, true);
        step(&mut s, 0.2, 0.4, true);
        assert_eq!(s.baseline_y(), 0.4);
    }
}
