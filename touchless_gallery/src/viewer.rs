//! The single-image view: zoom-in transition, zoom and pan.

use nalgebra::Vector2;

use crate::surface::Rect;

/// The image opened from the gallery.  Borrowed by index from the library.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActiveImage {
    pub index: usize,
    scale:     f32,
    target:    f32,
    /// Fit-to-window scale, fixed once the transition lands.
    base:      f32,
    /// Offset of the image centre from the window centre, pixels.
    pan:       Vector2<f32>,
}

impl ActiveImage {
    /// Start the zoom-in transition toward `target_scale`.
    pub fn begin(index: usize, target_scale: f32) -> Self {
        ActiveImage {
            index,
            scale:  0.0,
            target: target_scale,
            base:   0.0,
            pan:    Vector2::zeros(),
        }
    }

    pub fn scale(&self) -> f32 { self.scale }

    pub fn base_scale(&self) -> f32 { self.base }

    pub fn target_scale(&self) -> f32 { self.target }

    pub fn pan(&self) -> Vector2<f32> { self.pan }

    /// Grow the scale by `speed * dt`.  Returns `true` once the target is
    /// reached; the scale then snaps to it exactly and it becomes the base.
    pub fn advance_transition(&mut self, speed: f32, dt: f32) -> bool {
        self.scale += speed * dt;
        if self.scale >= self.target {
            self.scale = self.target;
            self.base = self.target;
            return true;
        }
        false
    }

    /// Change the scale by `amount` base-scales, capped at `max_zoom` times
    /// the base.  There is no lower cap; see [`Self::below_exit_threshold`].
    pub fn zoom_by(&mut self, amount: f32, max_zoom: f32) {
        self.scale = (self.scale + amount * self.base).min(self.base * max_zoom).max(0.0);
    }

    /// Zoomed out far enough that the view should close.
    pub fn below_exit_threshold(&self) -> bool { self.scale < self.base / 5.0 }

    pub fn pan_by(&mut self, dx: f32, dy: f32) { self.pan += Vector2::new(dx, dy); }

    /// Keep the window covered when zoomed past the base scale.  An axis
    /// that does not overflow the window is centred.
    pub fn clamp_pan(&mut self, img_w: u32, img_h: u32, win_w: u32, win_h: u32) {
        if self.scale <= self.base {
            return;
        }
        self.pan.x = clamp_axis(self.pan.x, img_w as f32 * self.scale, win_w as f32);
        self.pan.y = clamp_axis(self.pan.y, img_h as f32 * self.scale, win_h as f32);
    }

    /// Source crop and on-screen box for the visible part of the image, or
    /// `None` when nothing is visible.
    pub fn placement(&self, img_w: u32, img_h: u32, win_w: u32, win_h: u32) -> Option<(Rect, Rect)> {
        let s = self.scale;
        if s <= 0.0 || img_w == 0 || img_h == 0 {
            return None;
        }
        let (ww, wh) = (win_w as f32, win_h as f32);
        let disp_w = img_w as f32 * s;
        let disp_h = img_h as f32 * s;
        let x0 = (ww - disp_w) / 2.0 + self.pan.x;
        let y0 = (wh - disp_h) / 2.0 + self.pan.y;

        let vx0 = x0.max(0.0);
        let vy0 = y0.max(0.0);
        let vx1 = (x0 + disp_w).min(ww);
        let vy1 = (y0 + disp_h).min(wh);
        if vx1 - vx0 < 1.0 || vy1 - vy0 < 1.0 {
            return None;
        }

        let dest = Rect::new(
            vx0.round() as i32,
            vy0.round() as i32,
            (vx1.round() - vx0.round()) as i32,
            (vy1.round() - vy0.round()) as i32,
        );
        let src = Rect::new(
            ((vx0 - x0) / s).floor() as i32,
            ((vy0 - y0) / s).floor() as i32,
            ((vx1 - vx0) / s).round().max(1.0) as i32,
            ((vy1 - vy0) / s).round().max(1.0) as i32,
        );
        Some((src, dest))
    }
}

fn clamp_axis(pan: f32, displayed: f32, window: f32) -> f32 {
    if displayed <= window {
        return 0.0;
    }
    let limit = (displayed - window) / 2.0;
    pan.clamp(-limit, limit)
}
