//! Application configuration.
//!
//! Every field has a default; an optional TOML file overrides any subset:
//!
//! ```toml
//! window_width = 1920
//!
//! [gallery]
//! visible_slots = 6
//!
//! [recognizer]
//! dwell_secs = 1.5
//! ```

use std::path::Path;

use body_gesture::{RecognizerConfig, VirtualRect};
use serde::Deserialize;

use crate::error::{GalleryError, Result};

// ════════════════════════════════════════════════════════════════════════════
// GalleryConfig
// ════════════════════════════════════════════════════════════════════════════

/// Interaction tuning for gallery and image view.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Images shown side by side in the gallery strip.
    pub visible_slots:     usize,
    /// Scale units per second while zooming into a selected image.
    pub zoom_speed:        f32,
    /// Key/wheel zoom step as a fraction of the base scale.
    pub zoom_step:         f32,
    /// Gesture zoom rate as a fraction of the base scale per second.
    pub gesture_zoom_rate: f32,
    /// Upper zoom bound as a multiple of the base scale.
    pub max_zoom:          f32,
    /// Consecutive zoom-out ticks (nothing selected) that quit the gallery.
    pub quit_ticks:        u32,
    /// Key pan distance in image view, pixels.
    pub pan_step_px:       f32,
    /// Height of the thumbnail strip, pixels.
    pub thumb_height:      u32,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        GalleryConfig {
            visible_slots:     5,
            zoom_speed:        2.0,
            zoom_step:         0.1,
            gesture_zoom_rate: 0.8,
            max_zoom:          8.0,
            quit_ticks:        90,
            pan_step_px:       40.0,
            thumb_height:      80,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window_width:  usize,
    pub window_height: usize,
    /// Drive the cursor from the tracked hand instead of the mouse.
    pub sensor_cursor: bool,
    pub gallery:       GalleryConfig,
    pub recognizer:    RecognizerConfig,
    /// Interaction rectangle for hand-to-cursor mapping.
    pub rect:          VirtualRect,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            window_width:  1280,
            window_height: 720,
            sensor_cursor: true,
            gallery:       GalleryConfig::default(),
            recognizer:    RecognizerConfig::default(),
            rect:          VirtualRect::default(),
        }
    }
}

impl AppConfig {
    /// Parse a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| GalleryError::Config {
            path:   path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&text).map_err(|reason| GalleryError::Config {
            path: path.to_path_buf(),
            reason,
        })
    }

    pub fn from_toml(text: &str) -> std::result::Result<Self, String> {
        let cfg: AppConfig = toml::from_str(text).map_err(|e| e.to_string())?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> std::result::Result<(), String> {
        let g = &self.gallery;
        if g.visible_slots == 0 {
            return Err("gallery.visible_slots must be at least 1".into());
        }
        if g.quit_ticks == 0 {
            return Err("gallery.quit_ticks must be at least 1".into());
        }
        for (name, value) in [
            ("zoom_speed", g.zoom_speed),
            ("zoom_step", g.zoom_step),
            ("gesture_zoom_rate", g.gesture_zoom_rate),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(format!("gallery.{name} must be positive"));
            }
        }
        if !(g.max_zoom.is_finite() && g.max_zoom >= 1.0) {
            return Err("gallery.max_zoom must be at least 1".into());
        }
        if self.window_width == 0 || self.window_height == 0 {
            return Err("window size must be non-zero".into());
        }
        if self.rect.r_x == self.rect.l_x || self.rect.r_y == self.rect.l_y {
            return Err("rect corners must differ on both axes".into());
        }
        Ok(())
    }
}
