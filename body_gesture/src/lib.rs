//! # body_gesture
//!
//! Turns skeletal joint streams from a depth camera into discrete UI
//! intents for a touchless kiosk.
//!
//! ## Gesture → Intent mapping
//!
//! | Gesture | Hand | Intent |
//! |---|---|---|
//! | Close and move sideways | Right | `Panning { dx, dy }` |
//! | Close and hold still | Right | `SelectionProgress` → `Select` after the dwell time |
//! | Close while right is closed, spread | Left | `ZoomIn { delta }` |
//! | Close while right is closed, bring together | Left | `ZoomOut { delta }` |
//! | Open | Right | `NoGesture` |
//!
//! ## Threading
//!
//! [`spawn_recognizer`] runs a [`BodySensor`] poll loop on its own thread
//! and publishes a [`GestureSnapshot`] into a [`SharedGestureState`] after
//! every tracked frame.  The UI thread copies the snapshot once per tick and
//! writes the current [`DisplayMode`] back.

pub mod cursor;
pub mod gesture;
pub mod hand;
pub mod joint;
pub mod recognizer;
pub mod sensor;
pub mod shared;
pub mod smoothing;

pub use cursor::{map_hand_to_cursor, VirtualRect};
pub use gesture::Gesture;
pub use hand::HandState;
pub use joint::{HandSide, HandStatus, JointId, JointSample, TrackedBody};
pub use recognizer::{GestureRecognizer, RecognizerConfig};
pub use sensor::{BodySensor, ScriptedSensor, SensorError};
pub use shared::{
    run_recognizer, spawn_recognizer, DisplayMode, GestureSnapshot, RecognizerHandle,
    SharedGestureState,
};
pub use smoothing::{AxisBuffer, SmoothingBuffer};
