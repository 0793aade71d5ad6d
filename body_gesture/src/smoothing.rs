//! Moving-average smoothing of joint positions.
//!
//! Each axis of each joint keeps its own fixed-capacity FIFO.  Pushing past
//! capacity evicts the oldest sample, so the mean is always taken over the
//! `min(capacity, samples_seen)` most recent values.

use std::collections::VecDeque;

use nalgebra::Vector3;

/// Default number of frames averaged per axis (~0.33 s at 30 Hz).
pub const DEFAULT_CAPACITY: usize = 10;

// ════════════════════════════════════════════════════════════════════════════
// AxisBuffer — one scalar axis
// ════════════════════════════════════════════════════════════════════════════

/// Fixed-capacity FIFO of scalar samples with a running mean.
#[derive(Clone, Debug)]
pub struct AxisBuffer {
    samples:  VecDeque<f32>,
    capacity: usize,
}

impl AxisBuffer {
    /// A capacity of zero is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        AxisBuffer {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest one when full.
    pub fn push(&mut self, value: f32) {
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    /// Arithmetic mean of the retained samples, `0.0` when empty.
    pub fn mean(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f32>() / self.samples.len() as f32
    }

    pub fn len(&self) -> usize { self.samples.len() }
    pub fn is_empty(&self) -> bool { self.samples.is_empty() }
    pub fn capacity(&self) -> usize { self.capacity }
}

// ════════════════════════════════════════════════════════════════════════════
// SmoothingBuffer — three axes of one joint
// ════════════════════════════════════════════════════════════════════════════

/// Per-axis smoothing for one tracked joint.
#[derive(Clone, Debug)]
pub struct SmoothingBuffer {
    x: AxisBuffer,
    y: AxisBuffer,
    z: AxisBuffer,
}

impl SmoothingBuffer {
    pub fn new(capacity: usize) -> Self {
        SmoothingBuffer {
            x: AxisBuffer::new(capacity),
            y: AxisBuffer::new(capacity),
            z: AxisBuffer::new(capacity),
        }
    }

    pub fn push(&mut self, p: Vector3<f32>) {
        self.x.push(p.x);
        self.y.push(p.y);
        self.z.push(p.z);
    }

    /// Moving-average position.
    pub fn mean(&self) -> Vector3<f32> {
        Vector3::new(self.x.mean(), self.y.mean(), self.z.mean())
    }

    /// Number of samples currently averaged (identical on all axes).
    pub fn len(&self) -> usize { self.x.len() }
    pub fn is_empty(&self) -> bool { self.x.is_empty() }
}

impl Default for SmoothingBuffer {
    fn default() -> Self { SmoothingBuffer::new(DEFAULT_CAPACITY) }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_mean_is_zero() {
        let b = AxisBuffer::new(10);
        assert_eq!(b.mean(), 0.0);
        assert!(b.is_empty());
    }

    #[test]
    fn partial_fill_averages_what_was_seen() {
        let mut b = AxisBuffer::new(10);
        for v in [2.0, 4.0, 6.0] { b.push(v); }
        assert_eq!(b.len(), 3);
        assert_eq!(b.mean(), 4.0);
    }

    #[test]
    fn overflow_evicts_oldest() {
        // 1..=12 at capacity 10 keeps 3..=12, whose mean is 7.5
        let mut b = AxisBuffer::new(10);
        for v in 1..=12 { b.push(v as f32); }
        assert_eq!(b.len(), 10);
        let expected = (3..=12).sum::<i32>() as f32 / 10.0;
        assert_eq!(b.mean(), expected);
        assert_eq!(b.mean(), 7.5);
    }

    #[test]
    fn never_exceeds_capacity() {
        let mut b = AxisBuffer::new(4);
        for v in 0..100 {
            b.push(v as f32);
            assert!(b.len() <= 4);
        }
    }

    #[test]
    fn zero_capacity_is_bumped() {
        let mut b = AxisBuffer::new(0);
        b.push(3.0);
        b.push(5.0);
        assert_eq!(b.capacity(), 1);
        assert_eq!(b.mean(), 5.0);
    }

    #[test]
    fn joint_buffer_smooths_each_axis() {
        let mut j = SmoothingBuffer::new(2);
        j.push(Vector3::new(1.0, 10.0, -1.0));
        j.push(Vector3::new(3.0, 20.0, -3.0));
        j.push(Vector3::new(5.0, 30.0, -5.0));
        assert_eq!(j.len(), 2);
        assert_eq!(j.mean(), Vector3::new(4.0, 25.0, -4.0));
    }
}
