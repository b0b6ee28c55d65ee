//! Drawing surface abstraction.

use kurbo::BezPath;
use peniko::Color;

/// Primitive drawing capabilities the paint tools run against.
///
/// Modeled on an immediate-mode 2D context: the surface carries a current
/// fill style and stroke style, and every operation consumes a whole path.
/// No path state is retained between calls. Strokes are one pixel wide.
///
/// Implementations can rasterize to a pixel buffer, record calls for
/// inspection, or forward to another backend.
pub trait Surface {
    /// Surface width in pixels.
    fn width(&self) -> u32;

    /// Surface height in pixels.
    fn height(&self) -> u32;

    /// Set the current fill style.
    fn set_fill_color(&mut self, color: Color);

    /// Set the current stroke style.
    fn set_stroke_color(&mut self, color: Color);

    /// Fill an axis-aligned rectangle with the fill style.
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64);

    /// Outline an axis-aligned rectangle with the stroke style.
    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64);

    /// Reset a rectangle to fully transparent pixels.
    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64);

    /// Fill a path with the fill style. Open subpaths are closed.
    fn fill_path(&mut self, path: &BezPath);

    /// Stroke a path with the stroke style.
    fn stroke_path(&mut self, path: &BezPath);

    /// Read back the `[r, g, b, a]` components of the pixel at integer
    /// coordinates, each 0-255.
    ///
    /// Backends without read-back keep the default body: the capability is
    /// simply absent and every read answers `None`.
    fn read_rgba(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        let _ = (x, y);
        None
    }
}
