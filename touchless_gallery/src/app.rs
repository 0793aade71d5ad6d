//! Top-level application state machine.
//!
//! `AppState` owns the image library, the gallery and selection state and the
//! active image.  Each frame it takes the window's [`InputEvent`]s, one
//! [`GestureSnapshot`] from the recognizer thread, and draws itself onto a
//! [`DisplaySurface`].

use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Instant;

use body_gesture::{
    spawn_recognizer, BodySensor, DisplayMode, Gesture, GestureSnapshot, SharedGestureState,
    VirtualRect,
};
use tracing::{debug, info};

use crate::config::{AppConfig, GalleryConfig};
use crate::cursor::CursorMode;
use crate::error::{GalleryError, Result};
use crate::gallery::{fit_within, slot_picture_rect, GalleryIndexState, GalleryLayout, SelectionState};
use crate::input::{InputEvent, Key, MouseButton};
use crate::library::ImageLibrary;
use crate::sim::{ReplaySensor, SimInput, SimulatedSensor};
use crate::surface::{DisplaySurface, Rect};
use crate::viewer::ActiveImage;
use crate::visualizer::Visualizer;

const BG_COLOR:        u32 = 0xFF101018;
const STRIP_BG:        u32 = 0xFF1C1C28;
const HOVER_COLOR:     u32 = 0xFF9E9E9E;
const SELECTED_COLOR:  u32 = 0xFFFFA000;
const HIGHLIGHT_COLOR: u32 = 0xFFFFD700;
const STATUS_COLOR:    u32 = 0xFFEEEEEE;

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    config:  GalleryConfig,
    rect:    VirtualRect,
    library: ImageLibrary,

    // ── mode ─────────────────────────────────────────────────────────────
    mode:      DisplayMode,
    gallery:   GalleryIndexState,
    selection: SelectionState,
    active:    Option<ActiveImage>,

    // ── cursor ───────────────────────────────────────────────────────────
    win:           (u32, u32),
    mouse:         (i32, i32),
    /// Cursor position from the tracked hand; `None` while no body is tracked.
    hand_cursor:   Option<(i32, i32)>,
    sensor_cursor: bool,

    // ── gesture bookkeeping ──────────────────────────────────────────────
    /// Gesture seen on the previous tick, for edge detection.
    gesture:         Gesture,
    /// Pixels of the current pan span already applied.
    pan_applied:     (f32, f32),
    /// A `Select` already counted for the current grip span.
    select_latched:  bool,
    quit:            bool,

    pub status: String,
}

impl AppState {
    pub fn new(cfg: &AppConfig, library: ImageLibrary, win: (u32, u32)) -> Self {
        let status = format!("{} images", library.len());
        AppState {
            config:          cfg.gallery.clone(),
            rect:            cfg.rect,
            library,
            mode:            DisplayMode::Gallery,
            gallery:         GalleryIndexState::default(),
            selection:       SelectionState::default(),
            active:          None,
            win,
            mouse:           (win.0 as i32 / 2, win.1 as i32 / 2),
            hand_cursor:     None,
            sensor_cursor:   cfg.sensor_cursor,
            gesture:         Gesture::NoGesture,
            pan_applied:     (0.0, 0.0),
            select_latched:  false,
            quit:            false,
            status,
        }
    }

    // ── input events ─────────────────────────────────────────────────────

    pub fn handle_event(&mut self, event: InputEvent, surface: &dyn DisplaySurface) {
        match event {
            InputEvent::Quit => self.request_quit("window closed"),
            InputEvent::MouseMove { x, y } => self.mouse = (x, y),
            InputEvent::MouseButtonUp { button, x, y } => {
                self.mouse = (x, y);
                match (button, self.mode) {
                    (MouseButton::Left, DisplayMode::Gallery) => {
                        let slot = self.layout().hover_slot(x);
                        self.click_slot(slot, surface);
                    }
                    (MouseButton::Right, DisplayMode::Image) => self.close_image("right click"),
                    _ => {}
                }
            }
            InputEvent::KeyDown(key) => self.handle_key(key, surface),
            InputEvent::WindowResized { width, height } => {
                debug!(width, height, "window resized");
                self.win = (width, height);
                self.clamp_active();
            }
            InputEvent::MouseWheel { dy } => match self.mode {
                DisplayMode::Gallery if dy != 0.0 =>
                    self.apply_swap(if dy > 0.0 { -1 } else { 1 }),
                DisplayMode::Image if dy != 0.0 => self.zoom_step(dy.signum()),
                _ => {}
            },
        }
    }

    fn handle_key(&mut self, key: Key, surface: &dyn DisplaySurface) {
        if key == Key::C {
            self.sensor_cursor = !self.sensor_cursor;
            self.status = format!("cursor: {}", if self.sensor_cursor { "hand" } else { "mouse" });
            info!(sensor_cursor = self.sensor_cursor, "cursor source toggled");
            return;
        }
        match self.mode {
            DisplayMode::Gallery => match key {
                Key::Escape | Key::Q => self.request_quit("quit key"),
                Key::Left | Key::A   => self.apply_swap(-1),
                Key::Right | Key::D  => self.apply_swap(1),
                k => {
                    if let Some(slot) = k.slot().filter(|s| *s < self.layout().slots) {
                        self.selection.set_hover(slot);
                        self.open_slot(slot, surface);
                    }
                }
            },
            DisplayMode::Image => {
                let step = self.config.pan_step_px;
                match key {
                    Key::Escape          => self.close_image("escape"),
                    Key::Left | Key::A   => self.pan_image(-step, 0.0),
                    Key::Right | Key::D  => self.pan_image(step, 0.0),
                    Key::Up | Key::W     => self.pan_image(0.0, -step),
                    Key::Down | Key::S   => self.pan_image(0.0, step),
                    Key::ZoomIn          => self.zoom_step(1.0),
                    Key::ZoomOut         => self.zoom_step(-1.0),
                    _ => {}
                }
            }
            DisplayMode::FromGalleryToImage => {}
        }
    }

    // ── per-frame update ─────────────────────────────────────────────────

    /// Advance one frame: apply the recognizer's latest gesture, run the
    /// zoom-in transition and refresh the hovered slot.
    pub fn update(&mut self, snapshot: &GestureSnapshot, dt: f32, surface: &dyn DisplaySurface) {
        let (w, h) = self.win;
        self.hand_cursor = snapshot
            .tracked
            .then(|| self.rect.map_hand_to_cursor(snapshot.hand_offset, w, h));

        if self.mode == DisplayMode::Gallery {
            let slot = self.layout().hover_slot(self.cursor().0);
            if self.selection.set_hover(slot) {
                debug!(slot, "hover changed");
            }
        }

        if snapshot.tracked {
            self.apply_gesture(snapshot.gesture, dt, surface);
        } else {
            // Body lost: keep the last gesture as the edge reference but fire nothing.
            self.selection.clear_quit();
        }

        if self.mode == DisplayMode::FromGalleryToImage {
            let speed = self.config.zoom_speed;
            if let Some(active) = self.active.as_mut() {
                if active.advance_transition(speed, dt) {
                    self.mode = DisplayMode::Image;
                    info!(index = active.index, scale = active.scale(), "image view");
                }
            }
        }
    }

    fn apply_gesture(&mut self, gesture: Gesture, dt: f32, surface: &dyn DisplaySurface) {
        let fresh = !gesture.same_kind(&self.gesture);
        match gesture {
            // A zoom inside the same grip span does not re-arm selection.
            Gesture::Select | Gesture::ZoomIn { .. } | Gesture::ZoomOut { .. } => {}
            _ => self.select_latched = false,
        }

        match self.mode {
            DisplayMode::Gallery => {
                match gesture {
                    Gesture::Panning { dx, dy } => {
                        let (sx, _) = self.pan_step(dx, dy);
                        let slot_w = self.layout().slot_w();
                        let start = self.gallery.start();
                        self.gallery.scroll(sx, slot_w, self.library.len());
                        if self.gallery.start() != start {
                            self.selection.reset();
                        }
                    }
                    Gesture::Select if !self.select_latched => {
                        self.select_latched = true;
                        let slot = self.layout().hover_slot(self.cursor().0);
                        self.click_slot(slot, surface);
                    }
                    Gesture::SwapCandidates { steps } if fresh => self.apply_swap(steps),
                    _ => {}
                }

                let zooming_out = matches!(gesture, Gesture::ZoomOut { .. });
                if self.selection.count_quit_tick(zooming_out) >= self.config.quit_ticks {
                    self.request_quit("zoom-out gesture held");
                }
            }
            DisplayMode::Image => match gesture {
                Gesture::Panning { dx, dy } => {
                    let (sx, sy) = self.pan_step(dx, dy);
                    self.pan_image(-sx, sy);
                }
                Gesture::ZoomIn { .. } => self.zoom_by(self.config.gesture_zoom_rate * dt),
                Gesture::ZoomOut { .. } => self.zoom_by(-self.config.gesture_zoom_rate * dt),
                _ => {}
            },
            DisplayMode::FromGalleryToImage => {}
        }

        if !gesture.is_panning() {
            self.pan_applied = (0.0, 0.0);
        }
        self.gesture = gesture;
    }

    /// Pixel step for a pan delta measured from the grip anchor.  The same
    /// snapshot read twice yields a zero second step.
    fn pan_step(&mut self, dx: f32, dy: f32) -> (f32, f32) {
        let (px, py) = self.rect.delta_to_pixels(dx, dy, self.win.0, self.win.1);
        let step = (px - self.pan_applied.0, py - self.pan_applied.1);
        self.pan_applied = (px, py);
        step
    }

    // ── gallery actions ──────────────────────────────────────────────────

    fn apply_swap(&mut self, steps: i32) {
        self.gallery.shift(steps as i64, self.library.len());
        self.selection.reset();
        self.status = format!("showing from image {}", self.gallery.start() + 1);
    }

    fn click_slot(&mut self, slot: usize, surface: &dyn DisplaySurface) {
        self.selection.set_hover(slot);
        if self.selection.click() {
            self.open_slot(slot, surface);
        } else {
            let index = self.gallery.image_at(slot, self.library.len());
            debug!(slot, index, "slot selected");
            self.status = format!("selected image {}", index + 1);
        }
    }

    fn open_slot(&mut self, slot: usize, surface: &dyn DisplaySurface) {
        let index = self.gallery.image_at(slot, self.library.len());
        let Some(picture) = self.library.get(index) else { return };
        let target = surface.maximize_to_window(picture);
        info!(index, target, path = %picture.path().display(), "opening image");

        self.active = Some(ActiveImage::begin(index, target));
        self.mode = DisplayMode::FromGalleryToImage;
        self.selection.reset();
        self.selection.clear_quit();
        self.status = format!("image {}/{}", index + 1, self.library.len());
    }

    // ── image actions ────────────────────────────────────────────────────

    fn close_image(&mut self, reason: &str) {
        if let Some(active) = self.active.take() {
            info!(index = active.index, reason, "back to gallery");
        }
        self.mode = DisplayMode::Gallery;
        self.selection.reset();
        self.selection.block_quit();
        self.pan_applied = (0.0, 0.0);
        self.status = format!("{} images", self.library.len());
    }

    fn pan_image(&mut self, dx: f32, dy: f32) {
        if let Some(active) = self.active.as_mut() {
            active.pan_by(dx, dy);
        }
        self.clamp_active();
    }

    fn zoom_step(&mut self, direction: f32) { self.zoom_by(direction * self.config.zoom_step); }

    fn zoom_by(&mut self, amount: f32) {
        let max_zoom = self.config.max_zoom;
        let Some(active) = self.active.as_mut() else { return };
        active.zoom_by(amount, max_zoom);
        if active.below_exit_threshold() {
            self.close_image("zoomed out");
            return;
        }
        self.clamp_active();
    }

    fn clamp_active(&mut self) {
        let (w, h) = self.win;
        if let Some(active) = self.active.as_mut() {
            if let Some(pic) = self.library.get(active.index) {
                active.clamp_pan(pic.width(), pic.height(), w, h);
            }
        }
    }

    fn request_quit(&mut self, reason: &str) {
        if !self.quit {
            info!(reason, "quit requested");
        }
        self.quit = true;
    }

    // ── rendering ────────────────────────────────────────────────────────

    pub fn render(&self, surface: &mut dyn DisplaySurface) {
        surface.clear(BG_COLOR);
        match self.mode {
            DisplayMode::Gallery => self.render_gallery(surface),
            DisplayMode::FromGalleryToImage | DisplayMode::Image => self.render_image(surface),
        }
        surface.label(&self.status, 8, 8, STATUS_COLOR);
        let (x, y) = self.cursor();
        surface.draw_cursor(x, y, self.cursor_mode());
        surface.present();
    }

    fn render_gallery(&self, surface: &mut dyn DisplaySurface) {
        let layout = self.layout();
        let n = self.library.len();
        let offset = self.gallery.offset_px();
        // A partly scrolled strip shows a sliver of one more image.
        let extra = usize::from(offset > 0.0 && n > layout.slots);

        for slot in 0..layout.slots + extra {
            let Some(pic) = self.library.get(self.gallery.image_at(slot, n)) else { continue };
            let dest = slot_picture_rect(layout.slot_rect(slot, offset), pic.width(), pic.height());
            surface.draw(pic, Rect::new(0, 0, pic.width() as i32, pic.height() as i32), dest);
        }

        if let Some(hover) = self.selection.hover() {
            let color = if self.selection.is_selected() { SELECTED_COLOR } else { HOVER_COLOR };
            surface.outline(layout.slot_rect(hover, 0.0).inflate(-4), color);
        }

        surface.fill(Rect::new(0, (layout.win_h - layout.strip_h) as i32, layout.win_w as i32, layout.strip_h as i32), STRIP_BG);
        for i in 0..n {
            let Some(thumb) = self.library.thumb(i) else { continue };
            let dest = fit_within(layout.thumb_rect(i, n), thumb.width(), thumb.height(), 2);
            surface.draw(thumb, Rect::new(0, 0, thumb.width() as i32, thumb.height() as i32), dest);
        }
        for r in layout.thumb_highlight(self.gallery.start(), n) {
            surface.outline(r, HIGHLIGHT_COLOR);
        }
    }

    fn render_image(&self, surface: &mut dyn DisplaySurface) {
        let Some(active) = &self.active else { return };
        let Some(pic) = self.library.get(active.index) else { return };
        let (w, h) = self.win;
        if let Some((src, dest)) = active.placement(pic.width(), pic.height(), w, h) {
            surface.draw(pic, src, dest);
        }
    }

    // ── accessors ────────────────────────────────────────────────────────

    pub fn layout(&self) -> GalleryLayout {
        GalleryLayout::new(self.win.0, self.win.1, self.config.visible_slots, self.library.len(), self.config.thumb_height)
    }

    /// Effective cursor: the tracked hand when enabled and tracked, else the mouse.
    pub fn cursor(&self) -> (i32, i32) {
        match self.hand_cursor {
            Some(pos) if self.sensor_cursor => pos,
            _ => self.mouse,
        }
    }

    pub fn cursor_mode(&self) -> CursorMode {
        let quit_progress = self.selection.willing_to_quit() as f32 / self.config.quit_ticks.max(1) as f32;
        CursorMode::for_gesture(self.mode, &self.gesture, quit_progress)
    }

    pub fn mode(&self)            -> DisplayMode            { self.mode }
    pub fn active(&self)          -> Option<&ActiveImage>   { self.active.as_ref() }
    pub fn selection(&self)       -> &SelectionState        { &self.selection }
    pub fn gallery(&self)         -> &GalleryIndexState     { &self.gallery }
    pub fn sensor_cursor(&self)   -> bool                   { self.sensor_cursor }
    pub fn should_quit(&self)     -> bool                   { self.quit }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Where skeletal frames come from.
#[derive(Clone, Debug, PartialEq)]
pub enum SensorSource {
    /// Synthesised from the mouse and grip keys of the gallery window.
    Simulated,
    /// A recorded CSV session.
    Replay(PathBuf),
}

/// Run the full application.
///
/// Starts the recognizer thread on the chosen sensor, opens the window and
/// drives the event/update/render loop until quit.  The recognizer is
/// stopped and joined before returning.
pub fn run(cfg: AppConfig, library: ImageLibrary, source: SensorSource) -> Result<()> {
    // ── Sim input channel (window → simulated sensor) ────────────────────
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();

    let sensor: Box<dyn BodySensor> = match &source {
        SensorSource::Simulated => Box::new(SimulatedSensor::new(sim_rx, cfg.rect, cfg.recognizer.poll_interval())),
        SensorSource::Replay(path) => Box::new(ReplaySensor::open(path, cfg.recognizer.poll_interval())?),
    };

    let shared = SharedGestureState::new();
    let recognizer = spawn_recognizer(sensor, cfg.recognizer.clone(), shared.clone())
        .map_err(GalleryError::Thread)?;

    // ── Visualizer (owns the window and the sim input sender) ────────────
    let mut vis = Visualizer::new(cfg.window_width, cfg.window_height, sim_tx)?;
    let mut app = AppState::new(&cfg, library, vis.window_size());
    info!(?source, "gallery running");

    // ── Main loop ─────────────────────────────────────────────────────────
    let mut last = Instant::now();
    while vis.is_open() && !app.should_quit() {
        // 1. Window input
        for event in vis.poll_input() {
            app.handle_event(event, &vis);
        }

        // 2. Gesture snapshot + per-frame logic
        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f32();
        last = now;
        app.update(&shared.snapshot(), dt, &vis);
        shared.set_mode(app.mode());

        // 3. Render
        app.render(&mut vis);
    }

    let frames = recognizer.shutdown();
    info!(frames, "recognizer stopped");
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::Picture;
    use crate::surface::recording::RecordingSurface;
    use nalgebra::Vector3;

    const W: u32 = 1000;
    const H: u32 = 600;
    const DT: f32 = 1.0 / 60.0;

    fn library() -> ImageLibrary {
        ImageLibrary::from_pictures(
            (0..7).map(|i| Picture::solid(format!("img{i}.png"), 100 + 50 * i, 300, 0xFF000000 | i)).collect(),
        )
    }

    fn make_app() -> (AppState, RecordingSurface) {
        let cfg = AppConfig { sensor_cursor: false, ..AppConfig::default() };
        (AppState::new(&cfg, library(), (W, H)), RecordingSurface::new(W, H))
    }

    fn snap(gesture: Gesture) -> GestureSnapshot {
        GestureSnapshot { gesture, tracked: true, ..GestureSnapshot::default() }
    }

    fn lost(gesture: Gesture) -> GestureSnapshot {
        GestureSnapshot { gesture, tracked: false, ..GestureSnapshot::default() }
    }

    fn idle(app: &mut AppState, s: &RecordingSurface) { app.update(&snap(Gesture::NoGesture), DT, s); }

    fn click(app: &mut AppState, s: &RecordingSurface, x: i32) {
        app.handle_event(InputEvent::MouseButtonUp { button: MouseButton::Left, x, y: 200 }, s);
    }

    /// Open slot 0 with the number key and run the transition to completion.
    fn open_first(app: &mut AppState, s: &RecordingSurface) {
        app.handle_event(InputEvent::KeyDown(Key::Digit(1)), s);
        for _ in 0..10_000 {
            if app.mode() == DisplayMode::Image { return; }
            idle(app, s);
        }
        panic!("transition never finished");
    }

    #[test]
    fn hover_change_between_ticks_resets_selection() {
        let (mut app, s) = make_app();
        click(&mut app, &s, 250); // slot 1
        assert_eq!(app.selection().click_count(), 1);
        assert!(app.selection().is_selected());

        app.handle_event(InputEvent::MouseMove { x: 650, y: 200 }, &s); // slot 3
        idle(&mut app, &s);
        assert_eq!(app.selection().hover(), Some(3));
        assert_eq!(app.selection().click_count(), 0);
        assert!(!app.selection().is_selected());
        assert_eq!(app.mode(), DisplayMode::Gallery);
    }

    #[test]
    fn second_click_opens_and_lands_on_fit_scale() {
        let (mut app, s) = make_app();
        app.handle_event(InputEvent::MouseMove { x: 450, y: 200 }, &s);
        idle(&mut app, &s);
        click(&mut app, &s, 450);
        assert_eq!(app.mode(), DisplayMode::Gallery);
        click(&mut app, &s, 450);
        assert_eq!(app.mode(), DisplayMode::FromGalleryToImage);
        assert_eq!(app.selection().click_count(), 0);
        assert_eq!(app.active().unwrap().scale(), 0.0);

        let mut last = 0.0;
        while app.mode() == DisplayMode::FromGalleryToImage {
            idle(&mut app, &s);
            let scale = app.active().unwrap().scale();
            assert!(scale >= last);
            last = scale;
        }
        assert_eq!(app.mode(), DisplayMode::Image);
        let active = app.active().unwrap();
        assert_eq!(active.index, 2);
        let expected = s.maximize_to_window(app.library.get(2).unwrap());
        assert_eq!(active.scale(), expected);
        assert_eq!(active.base_scale(), expected);
    }

    #[test]
    fn dwell_select_twice_opens_hovered_image() {
        let (mut app, s) = make_app();
        app.handle_event(InputEvent::MouseMove { x: 850, y: 200 }, &s); // slot 4
        for g in [Gesture::Panning { dx: 0.0, dy: 0.0 }, Gesture::SelectionProgress { progress: 0.5 }] {
            app.update(&snap(g), DT, &s);
        }
        // A latched Select seen on several ticks is one click.
        for _ in 0..5 {
            app.update(&snap(Gesture::Select), DT, &s);
        }
        assert_eq!(app.selection().click_count(), 1);
        assert_eq!(app.cursor_mode(), CursorMode::Selected);

        idle(&mut app, &s);
        app.update(&snap(Gesture::Select), DT, &s);
        assert_eq!(app.mode(), DisplayMode::FromGalleryToImage);
        assert_eq!(app.active().unwrap().index, 4);
    }

    #[test]
    fn zoom_out_below_fifth_returns_to_gallery_once() {
        let (mut app, s) = make_app();
        open_first(&mut app, &s);

        let mut transitions = 0;
        let mut prev = app.mode();
        for _ in 0..50 {
            app.update(&snap(Gesture::ZoomOut { delta: -0.2 }), 0.1, &s);
            if prev == DisplayMode::Image && app.mode() == DisplayMode::Gallery {
                transitions += 1;
            }
            prev = app.mode();
        }
        assert_eq!(transitions, 1);
        assert!(app.active().is_none());
        assert!(!app.should_quit());
    }

    #[test]
    fn key_zoom_steps_return_to_gallery_once() {
        let (mut app, s) = make_app();
        open_first(&mut app, &s);

        let mut transitions = 0;
        for _ in 0..30 {
            let before = app.mode();
            app.handle_event(InputEvent::KeyDown(Key::ZoomOut), &s);
            if before == DisplayMode::Image && app.mode() == DisplayMode::Gallery {
                transitions += 1;
                assert!(app.active().is_none());
            }
        }
        assert_eq!(transitions, 1);
        assert_eq!(app.mode(), DisplayMode::Gallery);
    }

    #[test]
    fn held_zoom_out_in_gallery_quits_at_threshold() {
        let (mut app, s) = make_app();
        let out = snap(Gesture::ZoomOut { delta: -0.3 });
        for _ in 0..89 {
            app.update(&out, DT, &s);
        }
        assert!(!app.should_quit());
        assert!(matches!(app.cursor_mode(), CursorMode::Exit { .. }));
        app.update(&out, DT, &s);
        assert!(app.should_quit());
    }

    #[test]
    fn interrupted_zoom_out_resets_quit_counter() {
        let (mut app, s) = make_app();
        let out = snap(Gesture::ZoomOut { delta: -0.3 });
        for _ in 0..60 {
            app.update(&out, DT, &s);
        }
        idle(&mut app, &s);
        assert_eq!(app.selection().willing_to_quit(), 0);
        for _ in 0..60 {
            app.update(&out, DT, &s);
        }
        assert!(!app.should_quit());
    }

    #[test]
    fn zoom_out_with_selection_does_not_quit() {
        let (mut app, s) = make_app();
        idle(&mut app, &s);
        click(&mut app, &s, 500);
        for _ in 0..200 {
            app.update(&snap(Gesture::ZoomOut { delta: -0.3 }), DT, &s);
        }
        assert!(!app.should_quit());
        assert_eq!(app.selection().willing_to_quit(), 0);
    }

    #[test]
    fn zoom_out_that_closes_image_does_not_count_toward_quit() {
        let (mut app, s) = make_app();
        open_first(&mut app, &s);
        let out = snap(Gesture::ZoomOut { delta: -0.3 });
        for _ in 0..400 {
            app.update(&out, DT, &s);
        }
        assert_eq!(app.mode(), DisplayMode::Gallery);
        assert!(!app.should_quit());
        assert_eq!(app.selection().willing_to_quit(), 0);

        // Releasing and zooming out again is a fresh request to quit.
        idle(&mut app, &s);
        for _ in 0..90 {
            app.update(&out, DT, &s);
        }
        assert!(app.should_quit());
    }

    #[test]
    fn stale_gesture_is_ignored_while_body_is_lost() {
        let (mut app, s) = make_app();
        for _ in 0..200 {
            app.update(&lost(Gesture::ZoomOut { delta: -0.3 }), DT, &s);
        }
        assert!(!app.should_quit());
        assert_eq!(app.selection().willing_to_quit(), 0);

        open_first(&mut app, &s);
        let scale = app.active().unwrap().scale();
        for _ in 0..60 {
            app.update(&lost(Gesture::ZoomIn { delta: 0.3 }), DT, &s);
        }
        assert_eq!(app.active().unwrap().scale(), scale);
    }

    #[test]
    fn lost_body_does_not_repeat_a_select() {
        let (mut app, s) = make_app();
        idle(&mut app, &s);
        app.update(&snap(Gesture::Select), DT, &s);
        app.update(&lost(Gesture::Select), DT, &s);
        app.update(&snap(Gesture::Select), DT, &s);
        assert_eq!(app.selection().click_count(), 1);
        assert_eq!(app.mode(), DisplayMode::Gallery);
    }

    #[test]
    fn pan_past_a_slot_drops_the_pending_click() {
        let (mut app, s) = make_app();
        app.handle_event(InputEvent::MouseMove { x: 450, y: 200 }, &s); // slot 2
        idle(&mut app, &s);
        click(&mut app, &s, 450);
        assert_eq!(app.selection().click_count(), 1);

        // 0.05 m = 250 px, one slot and a quarter: slot 2 now shows image 3.
        app.update(&snap(Gesture::Panning { dx: 0.05, dy: 0.0 }), DT, &s);
        assert_eq!(app.gallery().image_at(2, 7), 3);
        assert_eq!(app.selection().click_count(), 0);

        click(&mut app, &s, 450);
        assert_eq!(app.mode(), DisplayMode::Gallery);
        assert_eq!(app.selection().click_count(), 1);
    }

    #[test]
    fn swap_candidates_shift_once_and_reset_selection() {
        let (mut app, s) = make_app();
        idle(&mut app, &s);
        click(&mut app, &s, 450);
        assert!(app.selection().is_selected());

        let swap = snap(Gesture::SwapCandidates { steps: -2 });
        app.update(&swap, DT, &s);
        app.update(&swap, DT, &s);
        assert_eq!(app.gallery().start(), 5);
        assert_eq!(app.selection().click_count(), 0);
        assert!(!app.selection().is_selected());

        idle(&mut app, &s);
        app.update(&snap(Gesture::SwapCandidates { steps: 3 }), DT, &s);
        assert_eq!(app.gallery().start(), 1);
    }

    #[test]
    fn zoom_between_selects_is_not_a_second_click() {
        let (mut app, s) = make_app();
        idle(&mut app, &s);
        app.update(&snap(Gesture::Select), DT, &s);
        app.update(&snap(Gesture::ZoomIn { delta: 0.2 }), DT, &s);
        app.update(&snap(Gesture::Select), DT, &s);
        assert_eq!(app.selection().click_count(), 1);
        assert_eq!(app.mode(), DisplayMode::Gallery);

        // A new grip span re-arms it.
        app.update(&snap(Gesture::Panning { dx: 0.0, dy: 0.0 }), DT, &s);
        app.update(&snap(Gesture::Select), DT, &s);
        assert_eq!(app.mode(), DisplayMode::FromGalleryToImage);
    }

    #[test]
    fn gallery_pan_is_incremental_per_span() {
        let (mut app, s) = make_app();
        // 0.02 m across a 0.2 m wide rectangle on a 1000 px window = 100 px.
        let pan = snap(Gesture::Panning { dx: 0.02, dy: 0.0 });
        app.update(&pan, DT, &s);
        app.update(&pan, DT, &s);
        assert_eq!(app.gallery().start(), 0);
        assert!((app.gallery().offset_px() - 100.0).abs() < 0.01);

        app.update(&snap(Gesture::Panning { dx: 0.05, dy: 0.0 }), DT, &s);
        assert_eq!(app.gallery().start(), 1);
        assert!((app.gallery().offset_px() - 50.0).abs() < 0.01);

        // A new span starts from its own anchor.
        idle(&mut app, &s);
        app.update(&snap(Gesture::Panning { dx: 0.01, dy: 0.0 }), DT, &s);
        assert!((app.gallery().offset_px() - 100.0).abs() < 0.01);
    }

    #[test]
    fn arrow_keys_wrap_the_gallery() {
        let (mut app, s) = make_app();
        app.handle_event(InputEvent::KeyDown(Key::Left), &s);
        assert_eq!(app.gallery().start(), 6);
        for _ in 0..8 {
            app.handle_event(InputEvent::KeyDown(Key::Right), &s);
        }
        assert_eq!(app.gallery().start(), 0);
    }

    #[test]
    fn escape_leaves_image_then_quits() {
        let (mut app, s) = make_app();
        open_first(&mut app, &s);
        app.handle_event(InputEvent::KeyDown(Key::Escape), &s);
        assert_eq!(app.mode(), DisplayMode::Gallery);
        assert!(!app.should_quit());
        app.handle_event(InputEvent::KeyDown(Key::Escape), &s);
        assert!(app.should_quit());
    }

    #[test]
    fn right_click_leaves_image() {
        let (mut app, s) = make_app();
        open_first(&mut app, &s);
        app.handle_event(InputEvent::MouseButtonUp { button: MouseButton::Right, x: 0, y: 0 }, &s);
        assert_eq!(app.mode(), DisplayMode::Gallery);
    }

    #[test]
    fn key_zoom_is_capped_at_max() {
        let (mut app, s) = make_app();
        open_first(&mut app, &s);
        let base = app.active().unwrap().base_scale();
        for _ in 0..200 {
            app.handle_event(InputEvent::KeyDown(Key::ZoomIn), &s);
        }
        assert!((app.active().unwrap().scale() - 8.0 * base).abs() < 1e-4);
    }

    #[test]
    fn image_pan_follows_hand_and_is_clamped() {
        let (mut app, s) = make_app();
        open_first(&mut app, &s); // 100×300 on 1000×600: base 2.0
        for _ in 0..3 {
            app.handle_event(InputEvent::KeyDown(Key::ZoomIn), &s);
        }
        // scale 2.6: 260×780, so x is centred and y may move ±90.
        app.update(&snap(Gesture::Panning { dx: 0.01, dy: -0.004 }), DT, &s);
        let pan = app.active().unwrap().pan();
        assert_eq!(pan.x, 0.0);
        assert!((pan.y - (-6.0)).abs() < 0.01);

        app.update(&snap(Gesture::Panning { dx: 0.01, dy: -0.1 }), DT, &s);
        assert!((app.active().unwrap().pan().y - (-90.0)).abs() < 0.01);
    }

    #[test]
    fn resize_reclamps_pan() {
        let (mut app, s) = make_app();
        open_first(&mut app, &s);
        app.handle_event(InputEvent::KeyDown(Key::ZoomIn), &s); // 2.2: 220×660
        app.handle_event(InputEvent::KeyDown(Key::Down), &s);
        assert!((app.active().unwrap().pan().y - 30.0).abs() < 0.01);
        app.handle_event(InputEvent::WindowResized { width: 1000, height: 640 }, &s);
        assert!((app.active().unwrap().pan().y - 10.0).abs() < 0.01);
    }

    #[test]
    fn hand_cursor_only_while_tracked_and_enabled() {
        let (mut app, s) = make_app();
        app.handle_event(InputEvent::MouseMove { x: 10, y: 20 }, &s);
        let tracked = GestureSnapshot {
            tracked: true,
            hand_offset: Vector3::new(0.25, 0.45, 0.0),
            ..GestureSnapshot::default()
        };
        app.update(&tracked, DT, &s);
        assert_eq!(app.cursor(), (10, 20));

        app.handle_event(InputEvent::KeyDown(Key::C), &s);
        assert!(app.sensor_cursor());
        app.update(&tracked, DT, &s);
        assert_eq!(app.cursor(), (500, 300));

        app.update(&lost(Gesture::NoGesture), DT, &s);
        assert_eq!(app.cursor(), (10, 20));
    }

    #[test]
    fn gallery_render_draws_slots_thumbs_and_cursor() {
        let (mut app, mut s) = make_app();
        idle(&mut app, &s);
        app.render(&mut s);
        // 5 slots + 7 thumbnails.
        assert_eq!(s.draws().len(), 12);
        assert_eq!(s.cursor(), Some((500, 300, CursorMode::Normal)));
        assert_eq!(s.calls.last(), Some(&crate::surface::recording::DrawCall::Present));
    }

    #[test]
    fn image_render_draws_one_cropped_picture() {
        let (mut app, mut s) = make_app();
        open_first(&mut app, &s);
        app.render(&mut s);
        let draws = s.draws();
        assert_eq!(draws.len(), 1);
        let (path, src, dest) = &draws[0];
        assert_eq!(path, &PathBuf::from("img0.png"));
        assert_eq!(*src, Rect::new(0, 0, 100, 300));
        assert_eq!(*dest, Rect::new(400, 0, 200, 600));
    }
}
