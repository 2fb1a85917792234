// Window + software drawing utilities.
// Visual effects provided here:
// 1) A window that shows the three label surfaces and their controls.
// 2) Flat rectangles and discs for slider tracks and thumbs.

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::error::Error;
use crate::raster::Surface;

/// Keys the app reacts to, decoupled from minifb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    NextSlider,
    PrevSlider,
    Increase,
    Decrease,
    Reset,
    Snapshot,
    ToggleFilter,
}

pub struct Drawer {
    window: Window, // the on-screen window you see
}

impl Drawer {
    /// Create a window of the given size.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize, fps: usize) -> Result<Self, Error> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(fps);
        Ok(Self { window })
    }

    /// Push an opaque frame to the screen.
    pub fn present(&mut self, frame: &Surface) -> Result<(), Error> {
        self.window
            .update_with_buffer(&frame.pixels, frame.width, frame.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Current mouse position in window pixel coordinates (clamped to the window).
    pub fn mouse_pos(&self) -> Option<(f32, f32)> {
        self.window
            .get_mouse_pos(MouseMode::Clamp)
            .map(|(x, y)| (x.max(0.0), y.max(0.0)))
    }

    pub fn left_mouse_down(&self) -> bool {
        self.window.get_mouse_down(MouseButton::Left)
    }

    /// Commands triggered since the last frame. Arrow keys repeat while held;
    /// Tab, R, S and F fire once per press.
    pub fn commands(&self) -> Vec<Command> {
        let shift =
            self.window.is_key_down(Key::LeftShift) || self.window.is_key_down(Key::RightShift);
        collect_commands(
            &self.window.get_keys_pressed(KeyRepeat::Yes),
            &self.window.get_keys_pressed(KeyRepeat::No),
            shift,
        )
    }
}

/// Keys that keep firing while held down.
fn key_repeats(key: Key) -> bool {
    matches!(key, Key::Up | Key::Down | Key::Left | Key::Right)
}

fn key_command(key: Key, shift: bool) -> Option<Command> {
    let cmd = match key {
        Key::Tab if shift => Command::PrevSlider,
        Key::Tab | Key::Down => Command::NextSlider,
        Key::Up => Command::PrevSlider,
        Key::Right => Command::Increase,
        Key::Left => Command::Decrease,
        Key::R => Command::Reset,
        Key::S => Command::Snapshot,
        Key::F => Command::ToggleFilter,
        _ => return None,
    };
    Some(cmd)
}

/// `repeating` holds presses including auto-repeat ticks, `once` only fresh
/// presses. Toggles are taken from `once` so holding them does nothing more.
fn collect_commands(repeating: &[Key], once: &[Key], shift: bool) -> Vec<Command> {
    let held = repeating.iter().filter(|k| key_repeats(**k));
    let fresh = once.iter().filter(|k| !key_repeats(**k));
    held.chain(fresh)
        .filter_map(|k| key_command(*k, shift))
        .collect()
}

/* ---------- Software drawing on an opaque frame ---------- */

/// Axis-aligned rectangle in window pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.w && py >= self.y && py < self.y + self.h
    }

    /// Expand by `d` on every side.
    pub fn inflate(&self, d: f32) -> Rect {
        Rect::new(self.x - d, self.y - d, self.w + 2.0 * d, self.h + 2.0 * d)
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.h / 2.0
    }
}

/// Solid rectangle (clipped to the frame).
pub fn fill_rect(fb: &mut Surface, r: Rect, color: u32) {
    let x0 = r.x.round() as i32;
    let y0 = r.y.round() as i32;
    let x1 = (r.x + r.w).round() as i32;
    let y1 = (r.y + r.h).round() as i32;
    for y in y0..y1 {
        for x in x0..x1 {
            fb.put(x, y, color);
        }
    }
}

/// 1-pixel outline just outside `r`.
/// Visual: a thin border frames each canvas.
pub fn stroke_rect(fb: &mut Surface, r: Rect, color: u32) {
    let x0 = r.x.round() as i32 - 1;
    let y0 = r.y.round() as i32 - 1;
    let x1 = (r.x + r.w).round() as i32;
    let y1 = (r.y + r.h).round() as i32;
    for x in x0..=x1 {
        fb.put(x, y0, color);
        fb.put(x, y1, color);
    }
    for y in y0..=y1 {
        fb.put(x0, y, color);
        fb.put(x1, y, color);
    }
}

/// Antialiased disc.
/// Visual: the round slider thumb.
pub fn fill_circle(fb: &mut Surface, cx: f32, cy: f32, radius: f32, color: u32) {
    let r = radius.ceil() as i32 + 1;
    let (icx, icy) = (cx.round() as i32, cy.round() as i32);
    for y in (icy - r)..=(icy + r) {
        for x in (icx - r)..=(icx + r) {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            // Coverage ramps over one pixel at the edge.
            let d = (dx * dx + dy * dy).sqrt();
            let cov = (radius + 0.5 - d).clamp(0.0, 1.0);
            fb.blend(x, y, color, (cov * 255.0).round() as u8);
        }
    }
}

/// Copy an opaque 0x00RRGGBB image into the frame at (x,y).
pub fn blit(fb: &mut Surface, x: i32, y: i32, width: usize, pixels: &[u32]) {
    for (i, px) in pixels.iter().enumerate() {
        let sx = x + (i % width) as i32;
        let sy = y + (i / width) as i32;
        fb.put(sx, sy, px | 0xFF00_0000);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::alpha;

    #[test]
    fn held_toggles_fire_once() {
        // F and S held across a repeat tick: both lists carry them, but only
        // the fresh press counts.
        let cmds = collect_commands(&[Key::F, Key::S, Key::R], &[Key::F], false);
        assert_eq!(cmds, vec![Command::ToggleFilter]);

        // A repeat tick with no fresh press yields nothing for toggles.
        assert!(collect_commands(&[Key::F, Key::Tab], &[], false).is_empty());
    }

    #[test]
    fn held_arrows_keep_stepping() {
        let cmds = collect_commands(&[Key::Right, Key::Down], &[], false);
        assert_eq!(cmds, vec![Command::Increase, Command::NextSlider]);

        // The first press appears in both lists but is counted once.
        let cmds = collect_commands(&[Key::Left], &[Key::Left], false);
        assert_eq!(cmds, vec![Command::Decrease]);
    }

    #[test]
    fn shift_tab_goes_back() {
        assert_eq!(collect_commands(&[], &[Key::Tab], true), vec![Command::PrevSlider]);
        assert_eq!(collect_commands(&[], &[Key::Tab], false), vec![Command::NextSlider]);
        assert_eq!(key_command(Key::Q, false), None);
    }

    #[test]
    fn rect_contains_is_half_open() {
        let r = Rect::new(10.0, 10.0, 5.0, 5.0);
        assert!(r.contains(10.0, 14.9));
        assert!(!r.contains(15.0, 12.0));
        assert!(r.inflate(1.0).contains(15.5, 9.0));
    }

    #[test]
    fn fill_and_stroke_stay_in_bounds() {
        let mut fb = Surface::new(10, 10);
        fill_rect(&mut fb, Rect::new(-5.0, -5.0, 30.0, 30.0), 0xFF11_2233);
        assert!(fb.pixels.iter().all(|p| *p == 0xFF11_2233));

        let mut fb = Surface::new(10, 10);
        stroke_rect(&mut fb, Rect::new(2.0, 2.0, 4.0, 4.0), 0xFFFF_FFFF);
        assert_eq!(fb.get(1, 1), 0xFFFF_FFFF);
        assert_eq!(fb.get(6, 6), 0xFFFF_FFFF);
        assert_eq!(fb.get(3, 3), 0);
    }

    #[test]
    fn circle_is_solid_inside_soft_outside() {
        let mut fb = Surface::new(21, 21);
        fill_circle(&mut fb, 10.5, 10.5, 6.0, 0xFF00_0000);
        assert_eq!(alpha(fb.get(10, 10)), 255);
        assert_eq!(alpha(fb.get(0, 0)), 0);
    }

    #[test]
    fn blit_places_pixels_opaque() {
        let mut fb = Surface::new(4, 4);
        blit(&mut fb, 1, 2, 2, &[0x0000_00FF, 0x0000_FF00]);
        assert_eq!(fb.get(1, 2), 0xFF00_00FF);
        assert_eq!(fb.get(2, 2), 0xFF00_FF00);
        assert_eq!(fb.get(0, 0), 0);
    }
}
