//! Hand-to-screen mapping.
//!
//! A "virtual interaction rectangle" in spine-relative sensor space is
//! mapped affinely onto the full screen.  Corner `l` lands on `(0, 0)` and
//! corner `r` on `(width, height)`; anything outside clamps to the edges.

use nalgebra::Vector3;
use serde::Deserialize;

/// Two opposite corners of the interaction rectangle, in metres relative to
/// the spine base.  `l` maps to the top-left of the screen.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct VirtualRect {
    pub l_x: f32,
    pub l_y: f32,
    pub r_x: f32,
    pub r_y: f32,
}

impl Default for VirtualRect {
    fn default() -> Self {
        VirtualRect { l_x: 0.15, l_y: 0.65, r_x: 0.35, r_y: 0.25 }
    }
}

impl VirtualRect {
    /// Map a smoothed hand offset to clamped screen coordinates.
    pub fn map_hand_to_cursor(&self, hand: Vector3<f32>, screen_w: u32, screen_h: u32) -> (i32, i32) {
        let w = screen_w as f32;
        let h = screen_h as f32;
        // Normalise first so the corners land on exactly 0.0 and 1.0.
        let tx = (hand.x - self.l_x) / (self.r_x - self.l_x);
        let ty = (hand.y - self.l_y) / (self.r_y - self.l_y);
        let x = (tx * w).clamp(0.0, w);
        let y = (ty * h).clamp(0.0, h);
        (x.round() as i32, y.round() as i32)
    }

    /// Screen pixels per sensor metre along x.
    pub fn pixels_per_unit_x(&self, screen_w: u32) -> f32 {
        screen_w as f32 / (self.r_x - self.l_x).abs()
    }

    /// Screen pixels per sensor metre along y.
    pub fn pixels_per_unit_y(&self, screen_h: u32) -> f32 {
        screen_h as f32 / (self.r_y - self.l_y).abs()
    }

    /// Convert a pan delta (sensor units) to screen pixels.
    pub fn delta_to_pixels(&self, dx: f32, dy: f32, screen_w: u32, screen_h: u32) -> (f32, f32) {
        (dx * self.pixels_per_unit_x(screen_w), dy * self.pixels_per_unit_y(screen_h))
    }
}

/// Convenience wrapper over [`VirtualRect::map_hand_to_cursor`] for the
/// default rectangle.
pub fn map_hand_to_cursor(hand: Vector3<f32>, screen_w: u32, screen_h: u32) -> (i32, i32) {
    VirtualRect::default().map_hand_to_cursor(hand, screen_w, screen_h)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
