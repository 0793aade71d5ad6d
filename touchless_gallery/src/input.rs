//! Windowing-agnostic input events.
//!
//! The visualizer translates raw window state into these once per frame;
//! [`crate::app::AppState`] only ever sees `InputEvent`s.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Keys the gallery reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Escape,
    Left,
    Right,
    Up,
    Down,
    W,
    A,
    S,
    D,
    /// Zoom in (`I`, `+`).
    ZoomIn,
    /// Zoom out (`O`, `-`).
    ZoomOut,
    Q,
    /// Toggle the cursor source between mouse and tracked hand.
    C,
    /// Number row `1`–`9`; picks a gallery slot directly.
    Digit(u8),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    MouseMove { x: i32, y: i32 },
    MouseButtonUp { button: MouseButton, x: i32, y: i32 },
    KeyDown(Key),
    WindowResized { width: u32, height: u32 },
    /// Positive `dy` scrolls up / away from the user.
    MouseWheel { dy: f32 },
    Quit,
}

impl Key {
    /// Slot index (0-based) for a number key.
    pub fn slot(self) -> Option<usize> {
        match self {
            Key::Digit(d @ 1..=9) => Some(d as usize - 1),
            _ => None,
        }
    }
}
