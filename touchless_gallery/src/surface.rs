//! The drawing seam between interaction logic and the window.
//!
//! [`DisplaySurface`] is all the state machine needs from a renderer: the
//! window size, a fit-to-window scale, and a handful of draw calls.  The
//! minifb [`crate::visualizer::Visualizer`] implements it for real; tests use
//! a recording surface.

use crate::cursor::CursorMode;
use crate::library::Picture;

// ════════════════════════════════════════════════════════════════════════════
// Rect
// ════════════════════════════════════════════════════════════════════════════

/// Integer rectangle in pixels; `w`/`h` of zero or less is empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self { Rect { x, y, w, h } }

    pub fn is_empty(&self) -> bool { self.w <= 0 || self.h <= 0 }

    pub fn right(&self) -> i32 { self.x + self.w }

    pub fn bottom(&self) -> i32 { self.y + self.h }

    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        let r = Rect::new(x0, y0, x1 - x0, y1 - y0);
        (!r.is_empty()).then_some(r)
    }

    /// Grow (or shrink, for negative `by`) on every side.
    pub fn inflate(&self, by: i32) -> Rect {
        Rect::new(self.x - by, self.y - by, self.w + 2 * by, self.h + 2 * by)
    }
}

/// Largest scale at which a `w`×`h` image fits entirely inside the window.
pub fn fit_scale(w: u32, h: u32, win_w: u32, win_h: u32) -> f32 {
    if w == 0 || h == 0 {
        return 1.0;
    }
    (win_w as f32 / w as f32).min(win_h as f32 / h as f32)
}

// ════════════════════════════════════════════════════════════════════════════
// DisplaySurface
// ════════════════════════════════════════════════════════════════════════════

pub trait DisplaySurface {
    fn window_size(&self) -> (u32, u32);

    /// Scale at which `picture` fills the window without cropping.
    fn maximize_to_window(&self, picture: &Picture) -> f32 {
        let (w, h) = self.window_size();
        fit_scale(picture.width(), picture.height(), w, h)
    }

    fn clear(&mut self, color: u32);

    /// Blit the `src` region of `picture` scaled into `dest`.  Either may lie
    /// partly outside its bounds; implementations clip.
    fn draw(&mut self, picture: &Picture, src: Rect, dest: Rect);

    fn fill(&mut self, rect: Rect, color: u32);

    fn outline(&mut self, rect: Rect, color: u32);

    fn draw_cursor(&mut self, x: i32, y: i32, mode: CursorMode);

    fn label(&mut self, text: &str, x: i32, y: i32, color: u32);

    fn present(&mut self);
}

// ════════════════════════════════════════════════════════════════════════════
// RecordingSurface — test double
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
pub(crate) mod recording {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    pub enum DrawCall {
        Clear,
        Draw { path: std::path::PathBuf, src: Rect, dest: Rect },
        Fill(Rect),
        Outline(Rect, u32),
        Cursor(i32, i32, CursorMode),
        Label(String),
        Present,
    }

    /// Fixed-size surface that logs every call.
    #[derive(Debug)]
    pub struct RecordingSurface {
        pub size:  (u32, u32),
        pub calls: Vec<DrawCall>,
    }

    impl RecordingSurface {
        pub fn new(w: u32, h: u32) -> Self { RecordingSurface { size: (w, h), calls: Vec::new() } }

        pub fn draws(&self) -> Vec<(std::path::PathBuf, Rect, Rect)> {
            self.calls.iter().filter_map(|c| match c {
                DrawCall::Draw { path, src, dest } => Some((path.clone(), *src, *dest)),
                _ => None,
            }).collect()
        }

        pub fn cursor(&self) -> Option<(i32, i32, CursorMode)> {
            self.calls.iter().rev().find_map(|c| match c {
                DrawCall::Cursor(x, y, m) => Some((*x, *y, *m)),
                _ => None,
            })
        }
    }

    impl DisplaySurface for RecordingSurface {
        fn window_size(&self) -> (u32, u32) { self.size }
        fn clear(&mut self, _color: u32) { self.calls.push(DrawCall::Clear); }
        fn draw(&mut self, picture: &Picture, src: Rect, dest: Rect) {
            self.calls.push(DrawCall::Draw { path: picture.path().to_path_buf(), src, dest });
        }
        fn fill(&mut self, rect: Rect, _color: u32) { self.calls.push(DrawCall::Fill(rect)); }
        fn outline(&mut self, rect: Rect, color: u32) { self.calls.push(DrawCall::Outline(rect, color)); }
        fn draw_cursor(&mut self, x: i32, y: i32, mode: CursorMode) {
            self.calls.push(DrawCall::Cursor(x, y, mode));
        }
        fn label(&mut self, text: &str, _x: i32, _y: i32, _color: u32) {
            self.calls.push(DrawCall::Label(text.to_string()));
        }
        fn present(&mut self) { self.calls.push(DrawCall::Present); }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersect_clips_and_rejects_disjoint() {
        let win = Rect::new(0, 0, 100, 50);
        assert_eq!(Rect::new(-10, 10, 30, 100).intersect(&win), Some(Rect::new(0, 10, 20, 40)));
        assert_eq!(Rect::new(100, 0, 10, 10).intersect(&win), None);
    }

    #[test]
    fn fit_scale_picks_limiting_axis() {
        assert_eq!(fit_scale(400, 100, 800, 600), 2.0);
        assert_eq!(fit_scale(100, 400, 800, 600), 1.5);
    }
}
