//! Application shell: window, frame loop and selection controls.

use dabble_core::color::ColorChoice;
use dabble_core::controller::{PaintController, Palette, ToolKind};
use dabble_core::input::PointerTracker;
use dabble_raster::PixelSurface;
use kurbo::Point;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use peniko::Color;

use crate::error::AppError;

/// Canvas width in pixels.
pub const WIDTH: usize = 800;

/// Canvas height in pixels.
pub const HEIGHT: usize = 600;

/// Tool menu: digit keys to tool codes (0 selects no tool).
const TOOL_KEYS: [(Key, u8); 6] = [
    (Key::Key1, 1),
    (Key::Key2, 2),
    (Key::Key3, 3),
    (Key::Key4, 4),
    (Key::Key5, 5),
    (Key::Key0, 0),
];

/// Color menu: X random, R red, G green, B blue, P purple.
const COLOR_KEYS: [(Key, u8); 5] = [
    (Key::X, 0),
    (Key::R, 1),
    (Key::G, 2),
    (Key::B, 3),
    (Key::P, 4),
];

/// The running application: window, canvas, controller and controls.
pub struct App {
    window: Window,
    surface: PixelSurface,
    controller: PaintController,
    tracker: PointerTracker,
    palette: Palette,
    display: Vec<u32>,
}

impl App {
    /// Open the window and prepare a white-filled canvas.
    pub fn new() -> Result<Self, AppError> {
        // Random color and the square tool are selected on startup.
        let palette = Palette::new(0, 1);
        let mut window = Window::new(
            &title_for(&palette),
            WIDTH,
            HEIGHT,
            WindowOptions::default(),
        )?;
        window.set_target_fps(60);

        let mut surface = PixelSurface::new(WIDTH as u32, HEIGHT as u32);
        surface.fill(white());

        Ok(Self {
            window,
            surface,
            controller: PaintController::new(),
            tracker: PointerTracker::new(),
            palette,
            display: Vec::with_capacity(WIDTH * HEIGHT),
        })
    }

    /// Create the app and drive it until the window closes.
    pub fn run() -> Result<(), AppError> {
        let mut app = App::new()?;
        app.main_loop()
    }

    fn main_loop(&mut self) -> Result<(), AppError> {
        while self.window.is_open() && !self.window.is_key_down(Key::Escape) {
            self.handle_keys();
            self.handle_pointer();
            self.present()?;
        }
        Ok(())
    }

    /// Selection controls and the clear button.
    fn handle_keys(&mut self) {
        let mut changed = false;
        for (key, code) in TOOL_KEYS {
            if self.window.is_key_pressed(key, KeyRepeat::No) {
                self.palette.set_tool_code(code);
                changed = true;
            }
        }
        for (key, code) in COLOR_KEYS {
            if self.window.is_key_pressed(key, KeyRepeat::No) {
                self.palette.set_color_code(code);
                changed = true;
            }
        }
        if self.window.is_key_pressed(Key::C, KeyRepeat::No) {
            self.clear_canvas();
        }
        if changed {
            self.window.set_title(&title_for(&self.palette));
        }
    }

    /// Refill the whole canvas opaque white.
    fn clear_canvas(&mut self) {
        log::debug!("canvas cleared");
        self.surface.fill(white());
    }

    /// Sample the mouse and feed the resulting events to the controller.
    fn handle_pointer(&mut self) {
        let Some((mx, my)) = self.window.get_mouse_pos(MouseMode::Clamp) else {
            return;
        };
        let position = Point::new(f64::from(mx), f64::from(my));
        let left = self.window.get_mouse_down(MouseButton::Left);
        let right = self.window.get_mouse_down(MouseButton::Right);
        for event in self.tracker.sample(position, left, right) {
            self.controller
                .handle_event(&event, &self.palette, &mut self.surface);
        }
    }

    fn present(&mut self) -> Result<(), AppError> {
        self.surface.present_into(&mut self.display, white());
        self.window
            .update_with_buffer(&self.display, WIDTH, HEIGHT)?;
        Ok(())
    }
}

/// Page background behind the canvas; shows through erased pixels.
fn white() -> Color {
    Color::from_rgba8(255, 255, 255, 255)
}

/// Window title reflecting the current selection.
fn title_for(palette: &Palette) -> String {
    let tool = match ToolKind::from_code(palette.tool_code()) {
        Some(ToolKind::Square) => "square",
        Some(ToolKind::Heart) => "heart",
        Some(ToolKind::Curve) => "curve",
        Some(ToolKind::Circle) => "circle",
        Some(ToolKind::Erase) => "erase",
        None => "no tool",
    };
    let color = match ColorChoice::from_code(palette.color_code()) {
        ColorChoice::Random => "random",
        ColorChoice::Red => "red",
        ColorChoice::Green => "green",
        ColorChoice::Blue => "blue",
        ColorChoice::Purple => "purple",
    };
    format!("dabble - {tool} / {color} (1-5/0 tools, X/R/G/B/P colors, C clears)")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_reflects_selection() {
        let title = title_for(&Palette::new(1, 2));
        assert!(title.contains("heart"));
        assert!(title.contains("red"));
    }

    #[test]
    fn test_title_handles_no_tool() {
        let title = title_for(&Palette::new(0, 0));
        assert!(title.contains("no tool"));
        assert!(title.contains("random"));
    }
}
