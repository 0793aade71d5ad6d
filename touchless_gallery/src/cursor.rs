//! On-screen cursor feedback.

use body_gesture::{DisplayMode, Gesture};

/// What the cursor currently signals to the user.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum CursorMode {
    #[default]
    Normal,
    PanningGallery,
    PanningImage,
    /// Dwell ring filling toward a selection, 0.0–1.0.
    Selecting { progress: f32 },
    Selected,
    /// Quit ring filling while the zoom-out-to-quit gesture is held.
    Exit { progress: f32 },
}

impl CursorMode {
    /// Cursor for the current gesture.  A pending quit takes precedence.
    pub fn for_gesture(mode: DisplayMode, gesture: &Gesture, quit_progress: f32) -> Self {
        if quit_progress > 0.0 {
            return CursorMode::Exit { progress: quit_progress.min(1.0) };
        }
        match (gesture, mode) {
            (Gesture::Panning { .. }, DisplayMode::Gallery) => CursorMode::PanningGallery,
            (Gesture::Panning { .. }, DisplayMode::Image)   => CursorMode::PanningImage,
            (Gesture::SelectionProgress { progress }, DisplayMode::Gallery) =>
                CursorMode::Selecting { progress: *progress },
            (Gesture::Select, DisplayMode::Gallery) => CursorMode::Selected,
            _ => CursorMode::Normal,
        }
    }

    /// Fill fraction of the progress ring, if this mode draws one.
    pub fn ring_progress(&self) -> Option<f32> {
        match self {
            CursorMode::Selecting { progress } | CursorMode::Exit { progress } => Some(*progress),
            CursorMode::Selected => Some(1.0),
            _ => None,
        }
    }

    pub fn color(&self) -> u32 {
        match self {
            CursorMode::Normal         => 0xFFFFFFFF,
            CursorMode::PanningGallery => 0xFF4FC3F7,
            CursorMode::PanningImage   => 0xFF81C784,
            CursorMode::Selecting { .. } => 0xFFFFD54F,
            CursorMode::Selected       => 0xFFFFA000,
            CursorMode::Exit { .. }    => 0xFFE53935,
        }
    }
}
