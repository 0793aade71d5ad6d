//! Gallery strip state: which images are in view, which slot is hovered,
//! and how far a selection has progressed.

use crate::surface::Rect;

/// Padding inside each gallery slot, pixels.
const SLOT_PAD: i32 = 12;

// ════════════════════════════════════════════════════════════════════════════
// GalleryIndexState
// ════════════════════════════════════════════════════════════════════════════

/// First visible image plus a sub-slot scroll offset.
///
/// `start` is always `< count` and `offset_px` stays in `[0, slot_w)`; whole
/// slots scrolled are folded into `start`, wrapping modulo the image count.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct GalleryIndexState {
    start:     usize,
    offset_px: f32,
}

impl GalleryIndexState {
    pub fn start(&self) -> usize { self.start }

    pub fn offset_px(&self) -> f32 { self.offset_px }

    /// Scroll by `dx_px`; positive moves the strip left, toward later images.
    pub fn scroll(&mut self, dx_px: f32, slot_w: f32, count: usize) {
        if count == 0 || slot_w <= 0.0 || !dx_px.is_finite() {
            return;
        }
        self.offset_px += dx_px;
        let whole = (self.offset_px / slot_w).floor();
        self.offset_px -= whole * slot_w;
        // Float rounding can land a hair outside `[0, slot_w)`.
        if !(0.0..slot_w).contains(&self.offset_px) {
            self.offset_px = 0.0;
        }
        self.shift(whole as i64, count);
    }

    /// Move by whole images, wrapping at both ends.
    pub fn shift(&mut self, steps: i64, count: usize) {
        if count == 0 {
            return;
        }
        self.start = (self.start as i64 + steps).rem_euclid(count as i64) as usize;
    }

    /// Image index shown in `slot`.
    pub fn image_at(&self, slot: usize, count: usize) -> usize {
        if count == 0 { 0 } else { (self.start + slot) % count }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SelectionState
// ════════════════════════════════════════════════════════════════════════════

/// Two-step selection: the first click marks the hovered slot, the second
/// confirms it.  Moving to another slot starts over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct SelectionState {
    hover:           Option<usize>,
    selected_index:  Option<usize>,
    click_count:     u8,
    selected:        bool,
    /// Consecutive zoom-out ticks with nothing selected.
    willing_to_quit: u32,
    /// Zoom-out ticks are ignored until the gesture is released once.
    quit_blocked:    bool,
}

impl SelectionState {
    pub fn hover(&self) -> Option<usize> { self.hover }

    /// Slot marked by the last click, while still selected.
    pub fn selected_index(&self) -> Option<usize> { self.selected_index }

    pub fn click_count(&self) -> u8 { self.click_count }

    pub fn is_selected(&self) -> bool { self.selected }

    pub fn willing_to_quit(&self) -> u32 { self.willing_to_quit }

    /// Returns `true` when the hovered slot changed (and the clicks reset).
    pub fn set_hover(&mut self, slot: usize) -> bool {
        if self.hover == Some(slot) {
            return false;
        }
        self.hover = Some(slot);
        self.reset();
        true
    }

    /// Register a click on the hovered slot.  Returns `true` on the
    /// confirming (second) click.
    pub fn click(&mut self) -> bool {
        self.click_count = (self.click_count + 1).min(2);
        self.selected = true;
        self.selected_index = self.hover;
        self.click_count == 2
    }

    pub fn reset(&mut self) {
        self.click_count = 0;
        self.selected = false;
        self.selected_index = None;
    }

    /// Count one tick toward quitting.  Any tick that is not a zoom-out with
    /// nothing selected starts the count over.
    pub fn count_quit_tick(&mut self, zooming_out: bool) -> u32 {
        if !zooming_out {
            self.quit_blocked = false;
        }
        if zooming_out && !self.selected && !self.quit_blocked {
            self.willing_to_quit += 1;
        } else {
            self.willing_to_quit = 0;
        }
        self.willing_to_quit
    }

    pub fn clear_quit(&mut self) { self.willing_to_quit = 0; }

    /// Ignore the zoom-out in progress; only a new one counts toward quitting.
    pub fn block_quit(&mut self) {
        self.willing_to_quit = 0;
        self.quit_blocked = true;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Layout
// ════════════════════════════════════════════════════════════════════════════

/// Pixel geometry of the gallery for one window size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GalleryLayout {
    pub win_w:   u32,
    pub win_h:   u32,
    /// Slots actually shown: the configured count, or fewer with few images.
    pub slots:   usize,
    pub strip_h: u32,
}

impl GalleryLayout {
    pub fn new(win_w: u32, win_h: u32, visible_slots: usize, count: usize, strip_h: u32) -> Self {
        GalleryLayout {
            win_w,
            win_h,
            slots: visible_slots.min(count).max(1),
            strip_h: strip_h.min(win_h / 2),
        }
    }

    pub fn slot_w(&self) -> f32 { self.win_w as f32 / self.slots as f32 }

    /// Hovered slot for a cursor x; positions off either edge clamp.
    pub fn hover_slot(&self, cursor_x: i32) -> usize {
        let slot = (cursor_x as f32 / self.slot_w()).floor();
        (slot.max(0.0) as usize).min(self.slots - 1)
    }

    /// Screen box of `slot`, shifted left by the scroll offset.
    pub fn slot_rect(&self, slot: usize, offset_px: f32) -> Rect {
        let x = (slot as f32 * self.slot_w() - offset_px).round() as i32;
        Rect::new(x, 0, self.slot_w().round() as i32, (self.win_h - self.strip_h) as i32)
    }

    /// Cell of image `index` in the thumbnail strip along the bottom.
    pub fn thumb_rect(&self, index: usize, count: usize) -> Rect {
        let cell = self.win_w as f32 / count.max(1) as f32;
        let x0 = (index as f32 * cell).round() as i32;
        let x1 = ((index + 1) as f32 * cell).round() as i32;
        Rect::new(x0, (self.win_h - self.strip_h) as i32, x1 - x0, self.strip_h as i32)
    }

    /// Boxes over the thumbnails currently in view; two when the view wraps.
    pub fn thumb_highlight(&self, start: usize, count: usize) -> Vec<Rect> {
        let count = count.max(1);
        let end = start + self.slots;
        let span = |a: usize, b: usize| {
            let first = self.thumb_rect(a, count);
            let last = self.thumb_rect(b - 1, count);
            Rect::new(first.x, first.y, last.right() - first.x, first.h)
        };
        if end <= count {
            vec![span(start, end)]
        } else {
            vec![span(start, count), span(0, end - count)]
        }
    }
}

/// Largest `w`×`h` box centred in `area` (minus padding) keeping aspect.
pub fn fit_within(area: Rect, w: u32, h: u32, pad: i32) -> Rect {
    let inner = area.inflate(-pad);
    if w == 0 || h == 0 || inner.is_empty() {
        return Rect::new(inner.x, inner.y, 0, 0);
    }
    let s = (inner.w as f32 / w as f32).min(inner.h as f32 / h as f32);
    let dw = (w as f32 * s).round() as i32;
    let dh = (h as f32 * s).round() as i32;
    Rect::new(inner.x + (inner.w - dw) / 2, inner.y + (inner.h - dh) / 2, dw, dh)
}

/// Picture box inside a gallery slot.
pub fn slot_picture_rect(slot: Rect, w: u32, h: u32) -> Rect { fit_within(slot, w, h, SLOT_PAD) }
