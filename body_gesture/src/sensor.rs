//! The body-tracking sensor seam.
//!
//! Anything that can hand over a frame of bodies implements [`BodySensor`].
//! The recognizer thread neither knows nor cares whether frames come from
//! hardware, a recording or the keyboard/mouse simulator.

use std::collections::VecDeque;

use thiserror::Error;

use crate::joint::TrackedBody;

// ════════════════════════════════════════════════════════════════════════════
// SensorError
// ════════════════════════════════════════════════════════════════════════════

/// Failures while bringing a sensor up.  Per-frame hiccups are not errors;
/// `poll_body_frame` simply returns `None`.
#[derive(Debug, Error)]
pub enum SensorError {
    /// A device call failed during initialisation.
    #[error("{call} failed with status {status:#010x}")]
    Init { call: &'static str, status: i32 },

    #[error("sensor source I/O: {0}")]
    Io(#[from] std::io::Error),

    /// A recording or device stream held unusable data.
    #[error("malformed sensor data at record {record}: {reason}")]
    Format { record: usize, reason: String },
}

// ════════════════════════════════════════════════════════════════════════════
// BodySensor
// ════════════════════════════════════════════════════════════════════════════

/// A source of skeletal frames.
pub trait BodySensor: Send + 'static {
    /// The latest frame, or `None` when no new frame is ready yet.
    fn poll_body_frame(&mut self) -> Option<Vec<TrackedBody>>;

    /// Human-readable source name for logs.
    fn name(&self) -> &str { "sensor" }
}

impl<S: BodySensor + ?Sized> BodySensor for Box<S> {
    fn poll_body_frame(&mut self) -> Option<Vec<TrackedBody>> { (**self).poll_body_frame() }
    fn name(&self) -> &str { (**self).name() }
}

// ════════════════════════════════════════════════════════════════════════════
// ScriptedSensor — a fixed frame queue
// ════════════════════════════════════════════════════════════════════════════

/// Plays back a prepared list of frames once; `None` entries model ticks
/// where no frame was available.
#[derive(Debug, Default)]
pub struct ScriptedSensor {
    frames: VecDeque<Option<Vec<TrackedBody>>>,
}

impl ScriptedSensor {
    pub fn new<I>(frames: I) -> Self
    where
        I: IntoIterator<Item = Option<Vec<TrackedBody>>>,
    {
        ScriptedSensor { frames: frames.into_iter().collect() }
    }

    pub fn remaining(&self) -> usize { self.frames.len() }
}

impl BodySensor for ScriptedSensor {
    fn poll_body_frame(&mut self) -> Option<Vec<TrackedBody>> {
        self.frames.pop_front().flatten()
    }

    fn name(&self) -> &str { "scripted" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_sensor_drains_in_order() {
        let mut s = ScriptedSensor::new(vec![
            None,
            Some(vec![TrackedBody::untracked()]),
        ]);
        assert!(s.poll_body_frame().is_none());
        assert_eq!(s.poll_body_frame().map(|b| b.len()), Some(1));
        assert!(s.poll_body_frame().is_none());
        assert_eq!(s.remaining(), 0);
    }

    #[test]
    fn init_error_reports_call_and_status() {
        let e = SensorError::Init { call: "open_body_reader", status: -2147467259 };
        assert_eq!(e.to_string(), "open_body_reader failed with status 0x80004005");
    }
}
