//! # touchless_gallery
//!
//! A kiosk photo gallery operated without touching anything.  A strip of
//! images scrolls with a closed right hand, a held-still hand selects, and
//! the selected image opens into a pan/zoom view.  Everything also works
//! with mouse and keyboard.
//!
//! ## Controls
//!
//! | Input | Gallery | Image |
//! |---|---|---|
//! | Right hand closed + move | scroll strip | pan |
//! | Right hand closed + hold 1 s (twice) | select, then open | |
//! | Left hand closed + spread / bring together | hold to quit (together) | zoom in / out |
//! | Left click (twice) | select, then open | |
//! | Right click | | back to gallery |
//! | `←` `→` / `A` `D` | shift by one image | pan |
//! | `↑` `↓` / `W` `S` | | pan |
//! | `1`–`9` | open that slot | |
//! | `I` `O` / `+` `-` / wheel | wheel shifts strip | zoom |
//! | `Esc` | quit | back to gallery |
//! | `Q` | quit | |
//! | `C` | toggle hand / mouse cursor | same |
//!
//! In simulation mode `Space` holds the right hand closed and `Z` the left.

pub mod app;
pub mod config;
pub mod cursor;
pub mod error;
pub mod gallery;
pub mod input;
pub mod library;
pub mod sim;
pub mod surface;
pub mod viewer;
pub mod visualizer;

pub use app::{run, AppState, SensorSource};
pub use config::{AppConfig, GalleryConfig};
pub use error::GalleryError;
pub use library::{ImageLibrary, Picture};
