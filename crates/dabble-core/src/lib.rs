//! Dabble Core Library
//!
//! Platform-agnostic model of the paint program: the drawing-surface
//! abstraction with its shape operations, the pointer-event model, and the
//! interaction controller that turns drags into stamps.

pub mod color;
pub mod controller;
pub mod input;
pub mod shapes;
pub mod surface;

pub use color::{ColorChoice, ColorRng};
pub use controller::{DragSession, PaintController, Palette, ToolKind};
pub use input::{MouseButton, PointerEvent, PointerTracker};
pub use surface::Surface;
