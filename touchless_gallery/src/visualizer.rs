//! Software-rendered window using `minifb`.
//!
//! Owns the framebuffer and turns raw window state into [`InputEvent`]s once
//! per frame.  The same pass feeds the simulated sensor: the pointer position,
//! `Space` (right grip), `Z` (left grip) and mouse presence go out as
//! [`SimInput`] so the gallery can be driven by "gestures" without a camera.

use std::sync::mpsc::Sender;
use std::time::Duration;

use minifb::{Key as WinKey, KeyRepeat, MouseButton as WinButton, MouseMode, Window, WindowOptions};
use tracing::warn;

use crate::cursor::CursorMode;
use crate::error::{GalleryError, Result};
use crate::input::{InputEvent, Key, MouseButton};
use crate::library::Picture;
use crate::sim::SimInput;
use crate::surface::{DisplaySurface, Rect};

const CURSOR_R:   i32 = 14;
const RING_W:     i32 = 4;
const GLYPH_SIZE: i32 = 2;

/// Edge-tracked state of the inputs that feed the simulated sensor.
#[derive(Debug, Default)]
struct SimState {
    pointer: Option<(f32, f32)>,
    right:   bool,
    left:    bool,
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:  Window,
    buf:     Vec<u32>,
    w:       usize,
    h:       usize,
    sim_tx:  Sender<SimInput>,
    sim:     SimState,
    mouse:   Option<(i32, i32)>,
    buttons: [bool; 3],
}

impl Visualizer {
    pub fn new(width: usize, height: usize, sim_tx: Sender<SimInput>) -> Result<Self> {
        let mut window = Window::new(
            "Touchless Gallery",
            width, height,
            WindowOptions {
                resize: true,
                ..WindowOptions::default()
            },
        ).map_err(|e| GalleryError::Window(e.to_string()))?;

        window.limit_update_rate(Some(Duration::from_millis(16))); // ~60fps
        window.set_cursor_visibility(false);

        Ok(Visualizer {
            window,
            buf: vec![0; width * height],
            w: width,
            h: height,
            sim_tx,
            sim: SimState::default(),
            mouse: None,
            buttons: [false; 3],
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Collect this frame's input events and forward grip/pointer state to
    /// the simulated sensor.
    pub fn poll_input(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();
        if !self.window.is_open() {
            events.push(InputEvent::Quit);
            return events;
        }

        // ── Resize ────────────────────────────────────────────────────────
        let (w, h) = self.window.get_size();
        if (w, h) != (self.w, self.h) && w > 0 && h > 0 {
            self.w = w;
            self.h = h;
            self.buf = vec![0; w * h];
            events.push(InputEvent::WindowResized { width: w as u32, height: h as u32 });
        }

        // ── Mouse ─────────────────────────────────────────────────────────
        let pos = self.window.get_mouse_pos(MouseMode::Discard)
            .map(|(x, y)| (x.round() as i32, y.round() as i32));
        if let Some((x, y)) = pos {
            if self.mouse != Some((x, y)) {
                events.push(InputEvent::MouseMove { x, y });
            }
        }
        if pos.is_some() {
            self.mouse = pos;
        }
        let (mx, my) = self.mouse.unwrap_or((0, 0));

        for (i, (win_button, button)) in [
            (WinButton::Left, MouseButton::Left),
            (WinButton::Right, MouseButton::Right),
            (WinButton::Middle, MouseButton::Middle),
        ].into_iter().enumerate() {
            let down = self.window.get_mouse_down(win_button);
            if self.buttons[i] && !down {
                events.push(InputEvent::MouseButtonUp { button, x: mx, y: my });
            }
            self.buttons[i] = down;
        }

        if let Some((_, dy)) = self.window.get_scroll_wheel() {
            if dy != 0.0 {
                events.push(InputEvent::MouseWheel { dy });
            }
        }

        // ── Keys (first press only) ───────────────────────────────────────
        for k in self.window.get_keys_pressed(KeyRepeat::No) {
            if let Some(key) = map_key(k) {
                events.push(InputEvent::KeyDown(key));
            }
        }
        // Pan keys repeat while held.
        for k in [WinKey::Left, WinKey::Right, WinKey::Up, WinKey::Down] {
            if self.window.is_key_pressed(k, KeyRepeat::Yes) && !self.window.is_key_pressed(k, KeyRepeat::No) {
                if let Some(key) = map_key(k) {
                    events.push(InputEvent::KeyDown(key));
                }
            }
        }

        self.feed_simulator(pos);
        events
    }

    fn feed_simulator(&mut self, pos: Option<(i32, i32)>) {
        let pointer = pos.map(|(x, y)| (x as f32 / self.w.max(1) as f32, y as f32 / self.h.max(1) as f32));
        if pointer.is_some() != self.sim.pointer.is_some() {
            let _ = self.sim_tx.send(SimInput::Presence(pointer.is_some()));
        }
        if let Some((x, y)) = pointer {
            if self.sim.pointer != pointer {
                let _ = self.sim_tx.send(SimInput::Pointer { x, y });
            }
        }
        self.sim.pointer = pointer;

        let right = self.window.is_key_down(WinKey::Space);
        if right != self.sim.right {
            let _ = self.sim_tx.send(SimInput::RightGrip(right));
            self.sim.right = right;
        }
        let left = self.window.is_key_down(WinKey::Z);
        if left != self.sim.left {
            let _ = self.sim_tx.send(SimInput::LeftGrip(left));
            self.sim.left = left;
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.buf[y as usize * self.w + x as usize] = color;
        }
    }

    fn bounds(&self) -> Rect { Rect::new(0, 0, self.w as i32, self.h as i32) }

    fn fill_circle(&mut self, cx: i32, cy: i32, r: i32, color: u32) {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// Ring arc starting at 12 o'clock, clockwise, covering `fraction` of it.
    fn draw_ring(&mut self, cx: i32, cy: i32, r: i32, fraction: f32, color: u32) {
        let inner = (r - RING_W) * (r - RING_W);
        let limit = fraction.clamp(0.0, 1.0) * std::f32::consts::TAU;
        for dy in -r..=r {
            for dx in -r..=r {
                let d2 = dx * dx + dy * dy;
                if d2 > r * r || d2 < inner {
                    continue;
                }
                // Angle measured clockwise from straight up, 0..TAU.
                let angle = (dx as f32).atan2(-dy as f32).rem_euclid(std::f32::consts::TAU);
                if angle <= limit {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// Minimal bitmap font: 3×5 glyphs, scaled by `GLYPH_SIZE`.
    fn draw_label(&mut self, text: &str, x: i32, y: i32, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3 {
                    if bits & (1 << (2 - col)) != 0 {
                        for sy in 0..GLYPH_SIZE {
                            for sx in 0..GLYPH_SIZE {
                                self.set_pixel(
                                    cx + col * GLYPH_SIZE + sx,
                                    y + row as i32 * GLYPH_SIZE + sy,
                                    color,
                                );
                            }
                        }
                    }
                }
            }
            cx += 4 * GLYPH_SIZE; // 3 wide + 1 gap
            if cx >= self.w as i32 { break; }
        }
    }
}

impl DisplaySurface for Visualizer {
    fn window_size(&self) -> (u32, u32) { (self.w as u32, self.h as u32) }

    fn clear(&mut self, color: u32) { self.buf.fill(color); }

    fn draw(&mut self, picture: &Picture, src: Rect, dest: Rect) {
        let (pw, ph) = (picture.width(), picture.height());
        if src.is_empty() || dest.is_empty() || pw == 0 || ph == 0 {
            return;
        }
        let Some(clip) = dest.intersect(&self.bounds()) else { return };
        // Nearest-neighbour: map each destination pixel centre back into `src`.
        for y in clip.y..clip.bottom() {
            let sy = src.y + ((y - dest.y) as i64 * src.h as i64 / dest.h as i64) as i32;
            let sy = sy.clamp(0, ph as i32 - 1) as u32;
            let row = y as usize * self.w;
            for x in clip.x..clip.right() {
                let sx = src.x + ((x - dest.x) as i64 * src.w as i64 / dest.w as i64) as i32;
                let sx = sx.clamp(0, pw as i32 - 1) as u32;
                let px = picture.pixel(sx, sy);
                if px >> 24 != 0 {
                    self.buf[row + x as usize] = px | 0xFF000000;
                }
            }
        }
    }

    fn fill(&mut self, rect: Rect, color: u32) {
        let Some(r) = rect.intersect(&self.bounds()) else { return };
        for y in r.y..r.bottom() {
            let row = y as usize * self.w;
            self.buf[row + r.x as usize..row + r.right() as usize].fill(color);
        }
    }

    fn outline(&mut self, rect: Rect, color: u32) {
        if rect.is_empty() {
            return;
        }
        for t in 0..2 {
            let r = rect.inflate(-t);
            for x in r.x..r.right() {
                self.set_pixel(x, r.y, color);
                self.set_pixel(x, r.bottom() - 1, color);
            }
            for y in r.y..r.bottom() {
                self.set_pixel(r.x, y, color);
                self.set_pixel(r.right() - 1, y, color);
            }
        }
    }

    fn draw_cursor(&mut self, x: i32, y: i32, mode: CursorMode) {
        let color = mode.color();
        match mode {
            CursorMode::Normal => {
                self.draw_ring(x, y, CURSOR_R / 2, 1.0, color);
            }
            CursorMode::PanningGallery | CursorMode::PanningImage => {
                self.fill_circle(x, y, CURSOR_R / 2, color);
            }
            _ => {
                self.draw_ring(x, y, CURSOR_R, 1.0, 0xFF404040);
                if let Some(p) = mode.ring_progress() {
                    self.draw_ring(x, y, CURSOR_R, p, color);
                }
                self.fill_circle(x, y, 3, color);
            }
        }
    }

    fn label(&mut self, text: &str, x: i32, y: i32, color: u32) {
        // Backing strip keeps text readable over pictures.
        let w = text.chars().count() as i32 * 4 * GLYPH_SIZE + 8;
        self.fill(Rect::new(x - 4, y - 4, w, 5 * GLYPH_SIZE + 8), 0xFF000000);
        self.draw_label(text, x, y, color);
    }

    fn present(&mut self) {
        if let Err(e) = self.window.update_with_buffer(&self.buf, self.w, self.h) {
            warn!("frame not presented: {e}");
        }
    }
}

fn map_key(k: WinKey) -> Option<Key> {
    Some(match k {
        WinKey::Escape => Key::Escape,
        WinKey::Left   => Key::Left,
        WinKey::Right  => Key::Right,
        WinKey::Up     => Key::Up,
        WinKey::Down   => Key::Down,
        WinKey::W      => Key::W,
        WinKey::A      => Key::A,
        WinKey::S      => Key::S,
        WinKey::D      => Key::D,
        WinKey::I | WinKey::Equal | WinKey::NumPadPlus    => Key::ZoomIn,
        WinKey::O | WinKey::Minus | WinKey::NumPadMinus   => Key::ZoomOut,
        WinKey::Q      => Key::Q,
        WinKey::C      => Key::C,
        WinKey::Key1   => Key::Digit(1),
        WinKey::Key2   => Key::Digit(2),
        WinKey::Key3   => Key::Digit(3),
        WinKey::Key4   => Key::Digit(4),
        WinKey::Key5   => Key::Digit(5),
        WinKey::Key6   => Key::Digit(6),
        WinKey::Key7   => Key::Digit(7),
        WinKey::Key8   => Key::Digit(8),
        WinKey::Key9   => Key::Digit(9),
        _ => return None,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '%' => [0b101, 0b001, 0b010, 0b100, 0b101],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}
