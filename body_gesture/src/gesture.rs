//! The classified output of the recognizer.

// ════════════════════════════════════════════════════════════════════════════
// Gesture
// ════════════════════════════════════════════════════════════════════════════

/// A UI intent derived from one processed sensor frame.
///
/// Deltas are in sensor units (metres, spine-relative).  Pan deltas are
/// `anchor - current`, so a hand moving to the left yields a positive `dx`.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum Gesture {
    /// Right hand open, nothing in progress.
    #[default]
    NoGesture,

    /// Right hand closed and moving (or just closed).
    Panning { dx: f32, dy: f32 },

    /// Right hand closed and stationary; `progress` runs 0.0–1.0 toward
    /// the dwell threshold.
    SelectionProgress { progress: f32 },

    /// Dwell threshold reached without moving past the swap threshold.
    Select,

    /// Two-hand distance grew by `delta` since the left hand closed.
    ZoomIn { delta: f32 },

    /// Two-hand distance shrank; `delta` is negative.
    ZoomOut { delta: f32 },

    /// Shift the gallery candidates by whole slots (positive = forward).
    /// [`GestureRecognizer`](crate::GestureRecognizer) reports drags as
    /// `Panning`; this comes from sensors with a discrete swipe.
    SwapCandidates { steps: i32 },
}

impl Gesture {
    pub fn name(&self) -> &'static str {
        match self {
            Gesture::NoGesture              => "no-gesture",
            Gesture::Panning { .. }         => "panning",
            Gesture::SelectionProgress { .. } => "selection-progress",
            Gesture::Select                 => "select",
            Gesture::ZoomIn { .. }          => "zoom-in",
            Gesture::ZoomOut { .. }         => "zoom-out",
            Gesture::SwapCandidates { .. }  => "swap-candidates",
        }
    }

    pub fn is_panning(&self) -> bool { matches!(self, Gesture::Panning { .. }) }

    /// Same variant, ignoring payloads.
    pub fn same_kind(&self, other: &Gesture) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl std::fmt::Display for Gesture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gesture::Panning { dx, dy } => write!(f, "panning dx={:.3} dy={:.3}", dx, dy),
            Gesture::SelectionProgress { progress } => write!(f, "selecting {:.0}%", progress * 100.0),
            Gesture::ZoomIn { delta } | Gesture::ZoomOut { delta } =>
                write!(f, "{} delta={:.3}", self.name(), delta),
            Gesture::SwapCandidates { steps } => write!(f, "swap-candidates {:+}", steps),
            _ => f.write_str(self.name()),
        }
    }
}
