//! State shared between the recognizer thread and the UI loop, and the
//! thread itself.
//!
//! Every field has exactly one writer:
//!
//! | Field | Writer | Reader |
//! |---|---|---|
//! | `snapshot` | recognizer | UI loop |
//! | `mode` | UI loop | recognizer |
//! | `running` | UI loop | recognizer |
//!
//! The snapshot is copied whole under a short lock, so a reader never sees
//! a hand offset with some components from one frame and some from the next.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use nalgebra::Vector3;
use tracing::{debug, info, trace};

use crate::gesture::Gesture;
use crate::joint::first_tracked;
use crate::recognizer::{GestureRecognizer, RecognizerConfig};
use crate::sensor::BodySensor;

// ════════════════════════════════════════════════════════════════════════════
// DisplayMode
// ════════════════════════════════════════════════════════════════════════════

/// Top-level UI state.  The recognizer only needs to know whether the
/// gallery is showing; the UI owns the transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum DisplayMode {
    #[default]
    Gallery            = 0,
    FromGalleryToImage = 1,
    Image              = 2,
}

impl DisplayMode {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => DisplayMode::FromGalleryToImage,
            2 => DisplayMode::Image,
            _ => DisplayMode::Gallery,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureSnapshot
// ════════════════════════════════════════════════════════════════════════════

/// Everything the UI reads from the recognizer in one tick.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct GestureSnapshot {
    pub gesture:     Gesture,
    /// Smoothed right-hand offset from the spine base.
    pub hand_offset: Vector3<f32>,
    /// A body was tracked on the most recent processed frame.
    pub tracked:     bool,
    /// Number of tracked frames processed so far.
    pub frame:       u64,
}

// ════════════════════════════════════════════════════════════════════════════
// SharedGestureState
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct SharedGestureState {
    snapshot: Mutex<GestureSnapshot>,
    mode:     AtomicU8,
    running:  AtomicBool,
}

impl Default for SharedGestureState {
    fn default() -> Self {
        SharedGestureState {
            snapshot: Mutex::new(GestureSnapshot::default()),
            mode:     AtomicU8::new(DisplayMode::Gallery as u8),
            running:  AtomicBool::new(true),
        }
    }
}

impl SharedGestureState {
    pub fn new() -> Arc<Self> { Arc::new(SharedGestureState::default()) }

    fn lock(&self) -> MutexGuard<'_, GestureSnapshot> {
        // Plain `Copy` data: a poisoned lock still holds a whole snapshot.
        self.snapshot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Copy of the latest recognizer output.
    pub fn snapshot(&self) -> GestureSnapshot { *self.lock() }

    pub fn publish(&self, snapshot: GestureSnapshot) { *self.lock() = snapshot; }

    /// Mark the body as lost while keeping the last gesture and offset.
    pub fn mark_untracked(&self) { self.lock().tracked = false; }

    pub fn mode(&self) -> DisplayMode { DisplayMode::from_u8(self.mode.load(Ordering::Acquire)) }

    pub fn set_mode(&self, mode: DisplayMode) { self.mode.store(mode as u8, Ordering::Release); }

    pub fn is_running(&self) -> bool { self.running.load(Ordering::Acquire) }

    /// Ask the recognizer thread to stop after its current iteration.
    pub fn stop(&self) { self.running.store(false, Ordering::Release); }
}

// ════════════════════════════════════════════════════════════════════════════
// Recognizer thread
// ════════════════════════════════════════════════════════════════════════════

/// Owner's handle on a running recognizer thread.
#[derive(Debug)]
pub struct RecognizerHandle {
    shared: Arc<SharedGestureState>,
    join:   Option<JoinHandle<u64>>,
}

impl RecognizerHandle {
    pub fn shared(&self) -> &Arc<SharedGestureState> { &self.shared }

    /// Clear the running flag and wait for the thread.  Returns the number
    /// of tracked frames processed.
    pub fn shutdown(mut self) -> u64 { self.stop_and_join() }

    fn stop_and_join(&mut self) -> u64 {
        self.shared.stop();
        match self.join.take() {
            Some(handle) => handle.join().unwrap_or(0),
            None => 0,
        }
    }
}

impl Drop for RecognizerHandle {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}

/// Spawn the recognizer polling `sensor` on its own thread.
pub fn spawn_recognizer<S: BodySensor>(
    sensor: S,
    config: RecognizerConfig,
    shared: Arc<SharedGestureState>,
) -> std::io::Result<RecognizerHandle> {
    let thread_shared = Arc::clone(&shared);
    let join = thread::Builder::new()
        .name("gesture-recognizer".into())
        .spawn(move || run_recognizer(sensor, config, &thread_shared))?;
    Ok(RecognizerHandle { shared, join: Some(join) })
}

/// The polling loop.  Runs until the shared running flag clears; the flag is
/// checked once per iteration.
pub fn run_recognizer<S: BodySensor>(
    mut sensor: S,
    config: RecognizerConfig,
    shared: &SharedGestureState,
) -> u64 {
    let idle = config.poll_interval();
    let mut recognizer = GestureRecognizer::new(config);
    let mut frames = 0u64;
    info!(source = sensor.name(), "gesture recognizer started");

    while shared.is_running() {
        let Some(bodies) = sensor.poll_body_frame() else {
            thread::sleep(idle);
            continue;
        };

        let Some(sample) = first_tracked(&bodies).and_then(|b| b.sample()) else {
            trace!("no tracked body this frame");
            shared.mark_untracked();
            continue;
        };

        frames += 1;
        let gesture = recognizer.process(&sample, Instant::now(), shared.mode());
        shared.publish(GestureSnapshot {
            gesture,
            hand_offset: recognizer.hand_offset(),
            tracked: true,
            frame: frames,
        });
    }

    debug!(frames, "gesture recognizer stopped");
    frames
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joint::{HandStatus, TrackedBody};
    use crate::sensor::ScriptedSensor;

    /// Stops the shared flag once its script runs out.
    struct StopAtEnd {
        inner:  ScriptedSensor,
        shared: Arc<SharedGestureState>,
    }

    impl BodySensor for StopAtEnd {
        fn poll_body_frame(&mut self) -> Option<Vec<TrackedBody>> {
            if self.inner.remaining() == 0 {
                self.shared.stop();
                return None;
            }
            self.inner.poll_body_frame()
        }
    }

    fn body(x: f32, right: HandStatus) -> TrackedBody {
        TrackedBody::new(
            Vector3::new(x, 0.5, 1.5),
            Vector3::new(-0.2, 0.5, 1.5),
            Vector3::new(0.0, 0.0, 2.0),
            right,
            HandStatus::Open,
        )
    }

    fn quick() -> RecognizerConfig {
        RecognizerConfig { poll_interval_ms: 1, ..Default::default() }
    }

    #[test]
    fn mode_round_trips_through_atomic() {
        let s = SharedGestureState::default();
        for m in [DisplayMode::Image, DisplayMode::FromGalleryToImage, DisplayMode::Gallery] {
            s.set_mode(m);
            assert_eq!(s.mode(), m);
        }
    }

    #[test]
    fn loop_publishes_tracked_frames_and_skips_others() {
        let shared = SharedGestureState::new();
        let sensor = StopAtEnd {
            inner: ScriptedSensor::new(vec![
                Some(vec![body(0.3, HandStatus::Open)]),
                None,
                Some(vec![TrackedBody::untracked()]),
                Some(vec![TrackedBody::untracked(), body(0.3, HandStatus::Closed)]),
            ]),
            shared: Arc::clone(&shared),
        };
        let frames = run_recognizer(sensor, quick(), &shared);
        assert_eq!(frames, 2);

        let snap = shared.snapshot();
        assert!(snap.tracked);
        assert_eq!(snap.frame, 2);
        assert_eq!(snap.gesture, Gesture::Panning { dx: 0.0, dy: 0.0 });
        assert!((snap.hand_offset.x - 0.3).abs() < 1e-6);
    }

    #[test]
    fn lost_body_keeps_last_gesture() {
        let shared = SharedGestureState::new();
        let sensor = StopAtEnd {
            inner: ScriptedSensor::new(vec![
                Some(vec![body(0.3, HandStatus::Closed)]),
                Some(vec![TrackedBody::untracked()]),
            ]),
            shared: Arc::clone(&shared),
        };
        run_recognizer(sensor, quick(), &shared);
        let snap = shared.snapshot();
        assert!(!snap.tracked);
        assert!(snap.gesture.is_panning());
    }

    #[test]
    fn spawned_thread_stops_on_shutdown() {
        let shared = SharedGestureState::new();
        let handle = spawn_recognizer(ScriptedSensor::default(), quick(), Arc::clone(&shared)).unwrap();
        assert!(handle.shared().is_running());
        assert_eq!(handle.shutdown(), 0);
        assert!(!shared.is_running());
    }
}
