//! Frame-by-frame gesture classification.
//!
//! # Algorithm
//!
//! * Right-hand and spine-base samples go through moving-average buffers;
//!   the hand offset is `mean(hand) - mean(spine)`, which cancels whole-body
//!   movement while damping jitter.
//! * **Right hand closes** → a pan anchor and a dwell timer start; the frame
//!   classifies as `Panning` with a zero delta.
//! * **Right hand held closed** → in Gallery mode the horizontal distance
//!   from the anchor is checked first: past the swap threshold the span
//!   latches as `Panning` until the hand opens.  Otherwise the dwell timer
//!   decides between `SelectionProgress` and a latched `Select`.  In any
//!   other mode a held hand pans.
//! * **Right hand opens** → `NoGesture`, anchor cleared.
//! * **Left hand** while the right is closed: closing records the two-hand
//!   distance; later frames compare against it and emit `ZoomIn`/`ZoomOut`
//!   once the change leaves the dead-zone.  A zoom in progress is finalized
//!   on the frame either hand opens.

use std::time::{Duration, Instant};

use nalgebra::{Vector2, Vector3};
use serde::Deserialize;
use tracing::{debug, trace};

use crate::gesture::Gesture;
use crate::hand::HandState;
use crate::joint::JointSample;
use crate::shared::DisplayMode;
use crate::smoothing::{SmoothingBuffer, DEFAULT_CAPACITY};

// ════════════════════════════════════════════════════════════════════════════
// RecognizerConfig
// ════════════════════════════════════════════════════════════════════════════

/// Thresholds for the recognizer.  Distances are in sensor metres.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    /// Samples averaged per axis.
    pub buffer_capacity:     usize,
    /// Horizontal hand travel that turns a held fist into a pan.
    pub swap_threshold:      f32,
    /// Seconds a still fist must be held to select.
    pub dwell_secs:          f32,
    /// Two-hand distance change below which zoom is ignored.
    pub zoom_threshold:      f32,
    /// Sleep between sensor polls when no frame is available.
    pub poll_interval_ms:    u64,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        RecognizerConfig {
            buffer_capacity:  DEFAULT_CAPACITY,
            swap_threshold:   0.005,
            dwell_secs:       1.0,
            zoom_threshold:   0.1,
            poll_interval_ms: 33,
        }
    }
}

impl RecognizerConfig {
    pub fn dwell(&self) -> Duration {
        Duration::from_secs_f32(self.dwell_secs.max(0.0))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureRecognizer
// ════════════════════════════════════════════════════════════════════════════

/// Per-span state of a closed right hand.
#[derive(Clone, Copy, Debug)]
struct GripSpan {
    anchor:   Vector2<f32>,
    started:  Instant,
    /// Moved past the swap threshold; stays a pan until release.
    panning:  bool,
    /// Dwell reached; stays selected unless it turns into a pan.
    selected: bool,
}

/// Converts joint samples into [`Gesture`]s.
#[derive(Debug)]
pub struct GestureRecognizer {
    config:      RecognizerConfig,
    hand_buf:    SmoothingBuffer,
    spine_buf:   SmoothingBuffer,
    right:       HandState,
    left:        HandState,
    grip:        Option<GripSpan>,
    zoom_anchor: Option<f32>,
    offset:      Vector3<f32>,
    last:        Gesture,
}

impl GestureRecognizer {
    pub fn new(config: RecognizerConfig) -> Self {
        let cap = config.buffer_capacity;
        GestureRecognizer {
            config,
            hand_buf:    SmoothingBuffer::new(cap),
            spine_buf:   SmoothingBuffer::new(cap),
            right:       HandState::default(),
            left:        HandState::default(),
            grip:        None,
            zoom_anchor: None,
            offset:      Vector3::zeros(),
            last:        Gesture::NoGesture,
        }
    }

    pub fn config(&self) -> &RecognizerConfig { &self.config }

    /// Smoothed, spine-relative right-hand offset from the last frame.
    pub fn hand_offset(&self) -> Vector3<f32> { self.offset }

    /// Horizontal pan anchor, `0.0` while the right hand is open.
    pub fn pan_anchor_x(&self) -> f32 {
        self.grip.map(|g| g.anchor.x).unwrap_or(0.0)
    }

    /// Process one tracked frame taken at `now`.
    pub fn process(&mut self, sample: &JointSample, now: Instant, mode: DisplayMode) -> Gesture {
        self.hand_buf.push(sample.right_hand);
        self.spine_buf.push(sample.spine_base);
        self.offset = self.hand_buf.mean() - self.spine_buf.mean();

        self.right.update(sample.right_closed);
        self.left.update(sample.left_closed);

        let current = Vector2::new(self.offset.x, self.offset.y);
        let distance = sample.hands_distance();

        let gesture = if self.right.just_closed() {
            self.grip = Some(GripSpan {
                anchor:   current,
                started:  now,
                panning:  false,
                selected: false,
            });
            self.zoom_anchor = if self.left.is_closed() { Some(distance) } else { None };
            debug!(anchor_x = current.x, anchor_y = current.y, "right hand closed");
            Gesture::Panning { dx: 0.0, dy: 0.0 }
        } else if self.right.is_closed() {
            let held = self.classify_held(current, now, mode);
            self.track_zoom(distance).unwrap_or(held)
        } else if self.right.just_opened() {
            debug!("right hand opened");
            let finished = self.finish_zoom(distance);
            self.grip = None;
            finished.unwrap_or(Gesture::NoGesture)
        } else {
            self.grip = None;
            self.zoom_anchor = None;
            Gesture::NoGesture
        };

        if !gesture.same_kind(&self.last) {
            debug!(gesture = %gesture, "classification changed");
        } else {
            trace!(gesture = %gesture, "frame classified");
        }
        self.last = gesture;
        gesture
    }

    // ── right hand held closed ───────────────────────────────────────────

    fn classify_held(&mut self, current: Vector2<f32>, now: Instant, mode: DisplayMode) -> Gesture {
        let dwell = self.config.dwell();
        let threshold = self.config.swap_threshold;
        let Some(grip) = self.grip.as_mut() else {
            // Closed on the very first frame we saw; nothing to anchor to.
            return Gesture::NoGesture;
        };

        let dx = grip.anchor.x - current.x;
        let dy = grip.anchor.y - current.y;

        if mode != DisplayMode::Gallery {
            return Gesture::Panning { dx, dy };
        }

        // Distance wins over dwell.
        if grip.panning || dx.abs() > threshold {
            if !grip.panning {
                debug!(dx, "pan latched");
            }
            grip.panning = true;
            return Gesture::Panning { dx, dy };
        }

        let elapsed = now.saturating_duration_since(grip.started);
        if grip.selected || elapsed >= dwell {
            grip.selected = true;
            return Gesture::Select;
        }

        let progress = if dwell.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f32() / dwell.as_secs_f32()).clamp(0.0, 1.0)
        };
        Gesture::SelectionProgress { progress }
    }

    // ── left hand zoom (only while the right hand is closed) ─────────────

    fn track_zoom(&mut self, distance: f32) -> Option<Gesture> {
        if self.left.just_closed() {
            debug!(distance, "zoom anchored");
            self.zoom_anchor = Some(distance);
            return None;
        }
        if self.left.just_opened() {
            return self.finish_zoom(distance);
        }
        if self.left.is_closed() {
            return self.zoom_anchor.and_then(|a| self.zoom_for(distance - a));
        }
        None
    }

    fn finish_zoom(&mut self, distance: f32) -> Option<Gesture> {
        let anchor = self.zoom_anchor.take()?;
        let zoom = self.zoom_for(distance - anchor);
        debug!(delta = distance - anchor, "zoom finished");
        zoom
    }

    fn zoom_for(&self, delta: f32) -> Option<Gesture> {
        if delta > self.config.zoom_threshold {
            Some(Gesture::ZoomIn { delta })
        } else if delta < -self.config.zoom_threshold {
            Some(Gesture::ZoomOut { delta })
        } else {
            None
        }
    }
}

impl Default for GestureRecognizer {
    fn default() -> Self { GestureRecognizer::new(RecognizerConfig::default()) }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
