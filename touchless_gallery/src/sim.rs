//! Body sensors that need no depth camera.
//!
//! * [`SimulatedSensor`] synthesises a skeleton from the gallery window's
//!   mouse position and two grip keys, sent over a `mpsc` channel as
//!   [`SimInput`].  The pointer is mapped back through the interaction
//!   rectangle, so the hand cursor lands where the mouse is.
//! * [`ReplaySensor`] plays back a recorded session from CSV.
//!
//! Both pace themselves to one frame per poll interval, like a camera.

use std::collections::VecDeque;
use std::fs::File;
use std::path::Path;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

use body_gesture::{BodySensor, HandStatus, SensorError, TrackedBody, VirtualRect};
use nalgebra::Vector3;
use serde::Deserialize;
use tracing::{debug, info};

/// Spine base of the simulated user, metres in camera space.
const SIM_SPINE: [f32; 3] = [0.0, 0.0, 2.0];
/// Resting left hand relative to the spine.
const SIM_LEFT_HAND: [f32; 3] = [-0.25, 0.45, -0.35];
/// Depth of the right hand relative to the spine.
const SIM_HAND_DEPTH: f32 = -0.4;

/// Frame pacing shared by both sensors.
#[derive(Debug)]
struct Pacer {
    interval: Duration,
    last:     Option<Instant>,
}

impl Pacer {
    fn new(interval: Duration) -> Self { Pacer { interval, last: None } }

    fn ready(&mut self) -> bool {
        let now = Instant::now();
        match self.last {
            Some(t) if now.duration_since(t) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimulatedSensor
// ════════════════════════════════════════════════════════════════════════════

/// Raw input from the simulation window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// Mouse position as a fraction of the window, 0.0–1.0 on each axis.
    Pointer { x: f32, y: f32 },
    /// Right hand closed (held grip key).
    RightGrip(bool),
    /// Left hand closed (held zoom key).
    LeftGrip(bool),
    /// The simulated user stepped into or out of view.
    Presence(bool),
}

pub struct SimulatedSensor {
    rx:      Receiver<SimInput>,
    rect:    VirtualRect,
    pacer:   Pacer,
    pointer: (f32, f32),
    right:   bool,
    left:    bool,
    present: bool,
}

impl SimulatedSensor {
    pub fn new(rx: Receiver<SimInput>, rect: VirtualRect, interval: Duration) -> Self {
        SimulatedSensor {
            rx,
            rect,
            pacer:   Pacer::new(interval),
            pointer: (0.5, 0.5),
            right:   false,
            left:    false,
            present: false,
        }
    }

    fn drain(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(SimInput::Pointer { x, y }) => self.pointer = (x.clamp(0.0, 1.0), y.clamp(0.0, 1.0)),
                Ok(SimInput::RightGrip(closed)) => self.right = closed,
                Ok(SimInput::LeftGrip(closed)) => self.left = closed,
                Ok(SimInput::Presence(present)) => {
                    if present != self.present {
                        debug!(present, "simulated user presence");
                    }
                    self.present = present;
                }
                // A closed window keeps the last pose.
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
    }

    /// Hand offset from the spine that maps to the current pointer.
    fn hand_offset(&self) -> Vector3<f32> {
        let r = &self.rect;
        Vector3::new(
            r.l_x + self.pointer.0 * (r.r_x - r.l_x),
            r.l_y + self.pointer.1 * (r.r_y - r.l_y),
            SIM_HAND_DEPTH,
        )
    }

    fn body(&self) -> TrackedBody {
        if !self.present {
            return TrackedBody::untracked();
        }
        let status = |closed: bool| if closed { HandStatus::Closed } else { HandStatus::Open };
        let spine = Vector3::from(SIM_SPINE);
        TrackedBody::new(
            spine + self.hand_offset(),
            spine + Vector3::from(SIM_LEFT_HAND),
            spine,
            status(self.right),
            status(self.left),
        )
    }
}

impl BodySensor for SimulatedSensor {
    fn poll_body_frame(&mut self) -> Option<Vec<TrackedBody>> {
        self.drain();
        if !self.pacer.ready() {
            return None;
        }
        Some(vec![self.body()])
    }

    fn name(&self) -> &str { "simulated" }
}

// ════════════════════════════════════════════════════════════════════════════
// ReplaySensor
// ════════════════════════════════════════════════════════════════════════════

/// One CSV row of a recorded session.  Positions are camera-space metres.
///
/// ```text
/// tracked,right_x,right_y,right_z,left_x,left_y,left_z,spine_x,spine_y,spine_z,right_hand,left_hand
/// true,0.25,0.45,1.6,-0.25,0.45,1.6,0.0,0.0,2.0,closed,open
/// ```
#[derive(Debug, Deserialize)]
struct ReplayRecord {
    tracked:    bool,
    right_x:    f32,
    right_y:    f32,
    right_z:    f32,
    left_x:     f32,
    left_y:     f32,
    left_z:     f32,
    spine_x:    f32,
    spine_y:    f32,
    spine_z:    f32,
    right_hand: String,
    left_hand:  String,
}

impl ReplayRecord {
    fn into_body(self, record: usize) -> Result<TrackedBody, SensorError> {
        if !self.tracked {
            return Ok(TrackedBody::untracked());
        }
        Ok(TrackedBody::new(
            Vector3::new(self.right_x, self.right_y, self.right_z),
            Vector3::new(self.left_x, self.left_y, self.left_z),
            Vector3::new(self.spine_x, self.spine_y, self.spine_z),
            parse_hand(&self.right_hand, record)?,
            parse_hand(&self.left_hand, record)?,
        ))
    }
}

fn parse_hand(s: &str, record: usize) -> Result<HandStatus, SensorError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "open" => Ok(HandStatus::Open),
        "closed" => Ok(HandStatus::Closed),
        "" | "unknown" => Ok(HandStatus::Unknown),
        other => Err(SensorError::Format { record, reason: format!("bad hand state {other:?}") }),
    }
}

/// Plays a recorded session once, then reports no further frames.
#[derive(Debug)]
pub struct ReplaySensor {
    frames: VecDeque<TrackedBody>,
    pacer:  Pacer,
    done:   bool,
}

impl ReplaySensor {
    pub fn open(path: &Path, interval: Duration) -> Result<Self, SensorError> {
        let file = File::open(path)?;
        let sensor = Self::from_reader(file, interval)?;
        info!(path = %path.display(), frames = sensor.remaining(), "replay loaded");
        Ok(sensor)
    }

    pub fn from_reader<R: std::io::Read>(reader: R, interval: Duration) -> Result<Self, SensorError> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut frames = VecDeque::new();
        for (i, row) in rdr.deserialize::<ReplayRecord>().enumerate() {
            // Header is line 1; records are numbered from 1 after it.
            let record = i + 1;
            let row = row.map_err(|e| SensorError::Format { record, reason: e.to_string() })?;
            frames.push_back(row.into_body(record)?);
        }
        Ok(ReplaySensor { frames, pacer: Pacer::new(interval), done: false })
    }

    pub fn remaining(&self) -> usize { self.frames.len() }
}

impl BodySensor for ReplaySensor {
    fn poll_body_frame(&mut self) -> Option<Vec<TrackedBody>> {
        if self.done || !self.pacer.ready() {
            return None;
        }
        match self.frames.pop_front() {
            Some(body) => Some(vec![body]),
            None => {
                info!("replay finished");
                self.done = true;
                None
            }
        }
    }

    fn name(&self) -> &str { "replay" }
}
