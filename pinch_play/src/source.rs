//! Landmark sources — where hand frames come from.
//!
//! The public interface is [`LandmarkSource::next_frame`], called once per
//! loop iteration.  Consumers don't need to know whether frames came from a
//! live estimator process, a recorded JSON-lines file, or an in-memory
//! replay.
//!
//! ## Wire format
//!
//! One JSON object per line:
//!
//! ```text
//! {"hands":[{"landmarks":[{"x":0.51,"y":0.62,"z":-0.03}, … 21 points]}]}
//! {"hands":[]}
//! {"error":"camera frame dropped"}
//! ```
//!
//! Extra fields (e.g. an estimator-supplied `handedness` or `score`) are
//! ignored; handedness is always derived from geometry.

use std::collections::VecDeque;
use std::io::{self, BufRead, BufReader};
use std::process::{Child, ChildStdout, Command, Stdio};

use pinch_gesture::{HandObservation, Landmark};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

// ════════════════════════════════════════════════════════════════════════════
// Frame / errors
// ════════════════════════════════════════════════════════════════════════════

/// One step of a landmark source.
#[derive(Clone, Debug, PartialEq)]
pub enum Frame {
    /// A frame was analysed; zero or more hands were found.
    Hands(Vec<HandObservation>),
    /// The frame could not be read or analysed; skip it.
    Unavailable,
    /// The source is exhausted.
    End,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("reading landmark stream: {0}")]
    Io(#[from] io::Error),
    #[error("estimator command is empty")]
    EmptyCommand,
    #[error("failed to start estimator {command:?}: {source}")]
    Spawn { command: String, source: io::Error },
    #[error("estimator did not signal READY, got {0:?}")]
    Handshake(String),
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSource trait — unified interface for live and recorded input
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver hand frames.  `next_frame` may block until the
/// next frame is ready.
pub trait LandmarkSource {
    fn next_frame(&mut self) -> Result<Frame, SourceError>;
}

impl<S: LandmarkSource + ?Sized> LandmarkSource for Box<S> {
    fn next_frame(&mut self) -> Result<Frame, SourceError> {
        (**self).next_frame()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// JsonLinesSource — any buffered reader of JSON frames
// ════════════════════════════════════════════════════════════════════════════

#[derive(Deserialize, Debug)]
struct LandmarkJson {
    x: f32,
    y: f32,
    z: f32,
}

#[derive(Deserialize, Debug)]
struct HandJson {
    landmarks: Vec<LandmarkJson>,
}

#[derive(Deserialize, Debug)]
struct FrameJson {
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

/// Reads newline-delimited JSON frames from `reader`.
pub struct JsonLinesSource<R> {
    reader: R,
    line:   Vec<u8>,
    lines:  u64,
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        JsonLinesSource { reader, line: Vec::new(), lines: 0 }
    }

    /// Number of lines consumed so far.
    pub fn lines_read(&self) -> u64 { self.lines }
}

impl<R: BufRead> LandmarkSource for JsonLinesSource<R> {
    fn next_frame(&mut self) -> Result<Frame, SourceError> {
        self.line.clear();
        if self.reader.read_until(b'\n', &mut self.line)? == 0 {
            return Ok(Frame::End);
        }
        self.lines += 1;
        match std::str::from_utf8(&self.line) {
            Ok(text) => Ok(parse_frame(text.trim(), self.lines)),
            Err(e)   => {
                warn!(line = self.lines, error = %e, "landmark frame is not UTF-8, skipping");
                Ok(Frame::Unavailable)
            }
        }
    }
}

/// Decode one line.  Anything malformed becomes [`Frame::Unavailable`].
fn parse_frame(line: &str, line_no: u64) -> Frame {
    if line.is_empty() {
        return Frame::Unavailable;
    }

    let frame: FrameJson = match serde_json::from_str(line) {
        Ok(f)  => f,
        Err(e) => {
            warn!(line = line_no, error = %e, "malformed landmark frame, skipping");
            return Frame::Unavailable;
        }
    };

    if let Some(error) = frame.error {
        debug!(line = line_no, %error, "estimator reported no frame");
        return Frame::Unavailable;
    }

    let mut hands = Vec::with_capacity(frame.hands.len());
    for hand in frame.hands {
        let points: Vec<Landmark> = hand.landmarks.iter()
            .map(|lm| Landmark::new(lm.x, lm.y, lm.z))
            .collect();
        match HandObservation::from_slice(&points) {
            Ok(obs) => hands.push(obs),
            Err(e)  => {
                warn!(line = line_no, error = %e, "bad hand in frame, skipping frame");
                return Frame::Unavailable;
            }
        }
    }
    Frame::Hands(hands)
}

// ════════════════════════════════════════════════════════════════════════════
// EstimatorProcess — live pose estimator as a child process
// ════════════════════════════════════════════════════════════════════════════

/// A pose-estimator subprocess writing JSON frames on stdout.
///
/// The child's stderr is inherited.  The child is killed when this value is
/// dropped.
pub struct EstimatorProcess {
    child:  Child,
    frames: JsonLinesSource<BufReader<ChildStdout>>,
}

impl EstimatorProcess {
    /// Start `command` (program followed by arguments).
    ///
    /// With `wait_ready`, the first stdout line must be `READY`; this lets
    /// slow-loading models finish before the session starts.
    pub fn spawn(command: &[String], wait_ready: bool) -> Result<Self, SourceError> {
        let (program, args) = command.split_first().ok_or(SourceError::EmptyCommand)?;
        let cmdline = command.join(" ");

        info!(command = %cmdline, "starting pose estimator");
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| SourceError::Spawn { command: cmdline.clone(), source })?;

        let stdout = match child.stdout.take() {
            Some(s) => s,
            None    => {
                let _ = child.kill();
                return Err(SourceError::Spawn {
                    command: cmdline,
                    source:  io::Error::new(io::ErrorKind::Other, "no stdout pipe"),
                });
            }
        };
        let mut reader = BufReader::new(stdout);

        if wait_ready {
            let mut ready = String::new();
            if let Err(e) = reader.read_line(&mut ready) {
                let _ = child.kill();
                return Err(e.into());
            }
            if ready.trim() != "READY" {
                let _ = child.kill();
                return Err(SourceError::Handshake(ready.trim().to_string()));
            }
            info!("pose estimator ready");
        }

        Ok(EstimatorProcess { child, frames: JsonLinesSource::new(reader) })
    }
}

impl LandmarkSource for EstimatorProcess {
    fn next_frame(&mut self) -> Result<Frame, SourceError> {
        self.frames.next_frame()
    }
}

impl Drop for EstimatorProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ReplaySource — in-memory frames
// ════════════════════════════════════════════════════════════════════════════

/// Yields a fixed list of frames, then [`Frame::End`] forever.
#[derive(Debug, Default)]
pub struct ReplaySource {
    frames: VecDeque<Frame>,
}

impl ReplaySource {
    pub fn new(frames: impl IntoIterator<Item = Frame>) -> Self {
        ReplaySource { frames: frames.into_iter().collect() }
    }
}

impl LandmarkSource for ReplaySource {
    fn next_frame(&mut self) -> Result<Frame, SourceError> {
        Ok(self.frames.pop_front().unwrap_or(Frame::End))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
