//! Property tests for the hysteresis and bend invariants.
