//! Skeletal frame types as delivered by a body-tracking sensor.

use nalgebra::Vector3;

/// Joints the recognizer reads from a tracked body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JointId {
    HandRight,
    HandLeft,
    SpineBase,
}

impl JointId {
    fn slot(self) -> usize {
        match self {
            JointId::HandRight => 0,
            JointId::HandLeft  => 1,
            JointId::SpineBase => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandSide {
    Left,
    Right,
}

/// Hand pose as reported by the sensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HandStatus {
    Open,
    Closed,
    #[default]
    Unknown,
}

impl HandStatus {
    /// Only an explicit `Closed` counts; `Unknown` is treated as open.
    pub fn is_closed(self) -> bool { self == HandStatus::Closed }
}

// ════════════════════════════════════════════════════════════════════════════
// TrackedBody
// ════════════════════════════════════════════════════════════════════════════

/// One body slot in a sensor frame.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackedBody {
    pub tracked: bool,
    joints:      [Vector3<f32>; 3],
    right_hand:  HandStatus,
    left_hand:   HandStatus,
}

impl TrackedBody {
    /// A body slot the sensor reports but is not tracking.
    pub fn untracked() -> Self {
        TrackedBody {
            tracked:    false,
            joints:     [Vector3::zeros(); 3],
            right_hand: HandStatus::Unknown,
            left_hand:  HandStatus::Unknown,
        }
    }

    pub fn new(
        right_hand_pos: Vector3<f32>,
        left_hand_pos:  Vector3<f32>,
        spine_base_pos: Vector3<f32>,
        right_hand:     HandStatus,
        left_hand:      HandStatus,
    ) -> Self {
        TrackedBody {
            tracked: true,
            joints:  [right_hand_pos, left_hand_pos, spine_base_pos],
            right_hand,
            left_hand,
        }
    }

    pub fn is_tracked(&self) -> bool { self.tracked }

    pub fn joint_position(&self, joint: JointId) -> Vector3<f32> {
        self.joints[joint.slot()]
    }

    pub fn hand_state(&self, side: HandSide) -> HandStatus {
        match side {
            HandSide::Left  => self.left_hand,
            HandSide::Right => self.right_hand,
        }
    }

    /// The recognizer's per-frame input, or `None` when not tracked.
    pub fn sample(&self) -> Option<JointSample> {
        if !self.tracked {
            return None;
        }
        Some(JointSample {
            right_hand:   self.joint_position(JointId::HandRight),
            left_hand:    self.joint_position(JointId::HandLeft),
            spine_base:   self.joint_position(JointId::SpineBase),
            right_closed: self.right_hand.is_closed(),
            left_closed:  self.left_hand.is_closed(),
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// JointSample
// ════════════════════════════════════════════════════════════════════════════

/// One frame of joint positions for a single tracked body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JointSample {
    pub right_hand:   Vector3<f32>,
    pub left_hand:    Vector3<f32>,
    pub spine_base:   Vector3<f32>,
    pub right_closed: bool,
    pub left_closed:  bool,
}

impl JointSample {
    /// Distance between the two hands in the X/Y plane.
    pub fn hands_distance(&self) -> f32 {
        let d = self.right_hand - self.left_hand;
        (d.x * d.x + d.y * d.y).sqrt()
    }
}

/// First tracked body of a frame; the recognizer follows one user.
pub fn first_tracked(bodies: &[TrackedBody]) -> Option<&TrackedBody> {
    bodies.iter().find(|b| b.is_tracked())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untracked_body_yields_no_sample() {
        assert!(TrackedBody::untracked().sample().is_none());
    }

    #[test]
    fn unknown_hand_is_not_closed() {
        let b = TrackedBody::new(
            Vector3::zeros(), Vector3::zeros(), Vector3::zeros(),
            HandStatus::Unknown, HandStatus::Closed,
        );
        let s = b.sample().unwrap();
        assert!(!s.right_closed);
        assert!(s.left_closed);
    }

    #[test]
    fn hands_distance_ignores_depth() {
        let b = TrackedBody::new(
            Vector3::new(3.0, 4.0, 9.0), Vector3::new(0.0, 0.0, -2.0), Vector3::zeros(),
            HandStatus::Open, HandStatus::Open,
        );
        assert_eq!(b.sample().unwrap().hands_distance(), 5.0);
    }

    #[test]
    fn first_tracked_skips_empty_slots() {
        let tracked = TrackedBody::new(
            Vector3::new(1.0, 0.0, 0.0), Vector3::zeros(), Vector3::zeros(),
            HandStatus::Open, HandStatus::Open,
        );
        let bodies = vec![TrackedBody::untracked(), tracked.clone()];
        assert_eq!(first_tracked(&bodies), Some(&tracked));
    }
}
