//! Interaction controller: drag sessions and tool dispatch.

use crate::color::{ColorChoice, ColorRng};
use crate::input::{MouseButton, PointerEvent};
use crate::shapes;
use crate::surface::Surface;
use kurbo::{BezPath, Point};
use serde::{Deserialize, Serialize};

/// Side length of the square and erase stamps.
const STAMP_SIZE: f64 = 40.0;

/// Radius of the circle stamp.
const CIRCLE_RADIUS: f64 = 20.0;

/// Minimum Manhattan distance between move events before the square tool
/// stamps again. Throttles stamp density during fast drags.
const SQUARE_GATE: i32 = 3;

/// Shape-stamping behavior selected in the tool menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolKind {
    /// 40x40 square, filled then outlined, distance gated.
    Square,
    /// Heart glyph, filled and stroked, every move.
    Heart,
    /// Freehand: one stroked segment per move.
    Curve,
    /// Filled circle of radius 20, every move.
    Circle,
    /// Clears a 40x40 region, every move.
    Erase,
}

impl ToolKind {
    /// Map a menu value to a tool. Codes outside 1-5 select no tool.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(ToolKind::Square),
            2 => Some(ToolKind::Heart),
            3 => Some(ToolKind::Curve),
            4 => Some(ToolKind::Circle),
            5 => Some(ToolKind::Erase),
            _ => None,
        }
    }
}

/// Numeric current-value read of the externally-owned selection controls.
///
/// Color codes 0-4 and tool codes 1-5 (anything else meaning no tool) are a
/// fixed contract; the controller snapshots both at the start of a drag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    color_code: u8,
    tool_code: u8,
}

impl Palette {
    /// Palette with the given control values.
    pub fn new(color_code: u8, tool_code: u8) -> Self {
        Self {
            color_code,
            tool_code,
        }
    }

    /// Current value of the color control.
    pub fn color_code(&self) -> u8 {
        self.color_code
    }

    /// Current value of the tool control.
    pub fn tool_code(&self) -> u8 {
        self.tool_code
    }

    pub fn set_color_code(&mut self, code: u8) {
        self.color_code = code;
    }

    pub fn set_tool_code(&mut self, code: u8) {
        self.tool_code = code;
    }
}

/// One press-to-release drag. At most one exists at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    /// Surface-local position where the drag started.
    pub start: (i32, i32),
    /// Position of the previous move event (initially the start).
    pub prev: (i32, i32),
    /// Color selection captured at press time, fixed for the drag.
    pub color: ColorChoice,
    /// Tool selection captured at press time, fixed for the drag.
    pub tool: Option<ToolKind>,
}

/// Translates pointer events into drawing operations against a surface.
///
/// State machine over one [`DragSession`]: Idle -> Dragging -> Idle. The
/// primary button starts a drag when idle; each move stamps with the
/// captured tool; any release ends the drag. Moves and releases while idle
/// are ignored, as is a second press mid-drag.
#[derive(Debug, Clone)]
pub struct PaintController {
    drag: Option<DragSession>,
    /// On-screen origin of the surface, subtracted from client coordinates.
    origin: Point,
    rng: ColorRng,
}

impl PaintController {
    /// Controller for a surface whose top-left coincides with the client
    /// origin.
    pub fn new() -> Self {
        Self::with_origin(Point::ZERO)
    }

    /// Controller for a surface whose top-left sits at `origin` in client
    /// coordinates.
    pub fn with_origin(origin: Point) -> Self {
        Self {
            drag: None,
            origin,
            rng: ColorRng::from_entropy(),
        }
    }

    /// Replace the color generator (reproducible colors for tests).
    pub fn with_rng(mut self, rng: ColorRng) -> Self {
        self.rng = rng;
        self
    }

    /// Update the surface origin after the window moves.
    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    /// The active drag, if any.
    pub fn session(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Feed one pointer event, drawing onto `surface` as the captured tool
    /// dictates.
    pub fn handle_event<S: Surface + ?Sized>(
        &mut self,
        event: &PointerEvent,
        palette: &Palette,
        surface: &mut S,
    ) {
        match *event {
            PointerEvent::Down { position, button } => {
                self.pointer_down(position, button, palette);
            }
            PointerEvent::Move { position } => self.pointer_move(position, surface),
            PointerEvent::Up { .. } => self.pointer_up(),
        }
    }

    /// Client position translated to surface-local coordinates, rounded to
    /// the nearest integer pixel.
    fn to_surface(&self, position: Point) -> (i32, i32) {
        (
            (position.x - self.origin.x).round() as i32,
            (position.y - self.origin.y).round() as i32,
        )
    }

    fn pointer_down(&mut self, position: Point, button: MouseButton, palette: &Palette) {
        if self.drag.is_some() {
            // A drag is in progress; don't start another.
            return;
        }
        if button != MouseButton::Left {
            return;
        }
        let pos = self.to_surface(position);
        let session = DragSession {
            start: pos,
            prev: pos,
            color: ColorChoice::from_code(palette.color_code()),
            tool: ToolKind::from_code(palette.tool_code()),
        };
        log::debug!(
            "drag started at {:?} with {:?} / {:?}",
            pos,
            session.tool,
            session.color
        );
        self.drag = Some(session);
    }

    fn pointer_move<S: Surface + ?Sized>(&mut self, position: Point, surface: &mut S) {
        let (x, y) = self.to_surface(position);
        let Some(drag) = self.drag.as_mut() else {
            return;
        };

        surface.set_fill_color(drag.color.resolve(&mut self.rng));
        let (fx, fy) = (f64::from(x), f64::from(y));
        match drag.tool {
            Some(ToolKind::Square) => {
                let (px, py) = drag.prev;
                if (x - px).abs() + (y - py).abs() >= SQUARE_GATE {
                    let half = STAMP_SIZE / 2.0;
                    surface.fill_rect(fx - half, fy - half, STAMP_SIZE, STAMP_SIZE);
                    surface.stroke_rect(fx - half, fy - half, STAMP_SIZE, STAMP_SIZE);
                }
            }
            Some(ToolKind::Heart) => {
                let path = heart_path(Point::new(fx, fy));
                surface.fill_path(&path);
                surface.stroke_path(&path);
            }
            Some(ToolKind::Curve) => {
                let (px, py) = drag.prev;
                shapes::stroke_line(
                    surface,
                    Point::new(f64::from(px), f64::from(py)),
                    Point::new(fx, fy),
                );
            }
            Some(ToolKind::Circle) => {
                shapes::fill_circle(surface, Point::new(fx, fy), CIRCLE_RADIUS);
            }
            Some(ToolKind::Erase) => {
                let half = STAMP_SIZE / 2.0;
                surface.clear_rect(fx - half, fy - half, STAMP_SIZE, STAMP_SIZE);
            }
            None => {}
        }
        // The gate measures from the last move event, not the last stamp.
        drag.prev = (x, y);
    }

    fn pointer_up(&mut self) {
        if let Some(drag) = self.drag.take() {
            log::debug!("drag ended at {:?}", drag.prev);
        }
    }
}

impl Default for PaintController {
    fn default() -> Self {
        Self::new()
    }
}

/// Heart glyph centered on the dimple: two mirrored cubics down to the tip
/// and back.
fn heart_path(center: Point) -> BezPath {
    let Point { x, y } = center;
    let mut path = BezPath::new();
    path.move_to(center);
    path.curve_to(
        Point::new(x - 20.0, y - 20.0),
        Point::new(x - 40.0, y + 20.0),
        Point::new(x, y + 40.0),
    );
    path.curve_to(
        Point::new(x + 40.0, y + 20.0),
        Point::new(x + 20.0, y - 20.0),
        center,
    );
    path
}
