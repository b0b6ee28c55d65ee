//! Software raster implementation of the drawing surface.

use dabble_core::surface::Surface;
use kurbo::{flatten, BezPath, PathEl, Point};
use peniko::Color;

/// Flattening tolerance for path rasterization.
const FLATTEN_TOLERANCE: f64 = 0.1;

/// A CPU pixel buffer implementing [`Surface`].
///
/// Pixels are packed 0xAARRGGBB, row-major. Drawing overwrites the pixels
/// it touches (straight overdraw); clearing writes fully transparent
/// pixels. Paths are filled with the nonzero winding rule, sampled at
/// pixel centers, and stroked one pixel wide.
#[derive(Debug, Clone)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
    fill_color: u32,
    stroke_color: u32,
}

/// Pack a color into 0xAARRGGBB.
fn pack(color: Color) -> u32 {
    let c = color.to_rgba8();
    (u32::from(c.a) << 24) | (u32::from(c.r) << 16) | (u32::from(c.g) << 8) | u32::from(c.b)
}

/// Source-over of one packed pixel onto an opaque background pixel.
fn over(src: u32, bg: u32) -> u32 {
    let a = src >> 24;
    match a {
        255 => src,
        0 => bg,
        _ => {
            let blend = |s: u32, d: u32| (s * a + d * (255 - a) + 127) / 255;
            let r = blend((src >> 16) & 0xFF, (bg >> 16) & 0xFF);
            let g = blend((src >> 8) & 0xFF, (bg >> 8) & 0xFF);
            let b = blend(src & 0xFF, bg & 0xFF);
            0xFF00_0000 | (r << 16) | (g << 8) | b
        }
    }
}

/// Line segments of a flattened path, with open subpaths closed so the
/// result is always a set of closed polygon edges.
fn collect_edges(path: &BezPath) -> Vec<(Point, Point)> {
    let mut edges = Vec::new();
    let mut start = Point::ZERO;
    let mut current = Point::ZERO;
    let mut open = false;
    flatten(path, FLATTEN_TOLERANCE, |el| match el {
        PathEl::MoveTo(p) => {
            if open && current != start {
                edges.push((current, start));
            }
            start = p;
            current = p;
            open = true;
        }
        PathEl::LineTo(p) => {
            edges.push((current, p));
            current = p;
        }
        PathEl::ClosePath => {
            if current != start {
                edges.push((current, start));
            }
            current = start;
        }
        // Curves are gone after flattening.
        _ => {}
    });
    if open && current != start {
        edges.push((current, start));
    }
    edges
}

impl PixelSurface {
    /// Fully transparent surface with black fill and stroke styles.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
            fill_color: 0xFF00_0000,
            stroke_color: 0xFF00_0000,
        }
    }

    /// Flood the whole buffer with one color.
    pub fn fill(&mut self, color: Color) {
        let packed = pack(color);
        self.pixels.fill(packed);
    }

    /// Raw packed pixels, row-major.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Composite the buffer over an opaque background into `out`.
    ///
    /// `out` is cleared and refilled, one opaque pixel per surface pixel,
    /// so erased regions show the page color behind the canvas.
    pub fn present_into(&self, out: &mut Vec<u32>, background: Color) {
        let bg = pack(background);
        out.clear();
        out.extend(self.pixels.iter().map(|&px| over(px, bg)));
    }

    fn put_pixel(&mut self, x: i32, y: i32, packed: u32) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.width || y >= self.height {
            return;
        }
        self.pixels[(y * self.width + x) as usize] = packed;
    }

    /// One-pixel Bresenham segment between rounded endpoints.
    fn draw_segment(&mut self, p0: Point, p1: Point, packed: u32) {
        let (mut x0, mut y0) = (p0.x.round() as i32, p0.y.round() as i32);
        let (x1, y1) = (p1.x.round() as i32, p1.y.round() as i32);
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.put_pixel(x0, y0, packed);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Rect clamped to the surface as half-open pixel bounds.
    fn clamp_rect(&self, x: f64, y: f64, w: f64, h: f64) -> Option<(u32, u32, u32, u32)> {
        if w <= 0.0 || h <= 0.0 {
            return None;
        }
        let x0 = (x.round() as i64).clamp(0, i64::from(self.width)) as u32;
        let y0 = (y.round() as i64).clamp(0, i64::from(self.height)) as u32;
        let x1 = ((x + w).round() as i64).clamp(0, i64::from(self.width)) as u32;
        let y1 = ((y + h).round() as i64).clamp(0, i64::from(self.height)) as u32;
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0, y0, x1, y1))
    }

    fn write_rect(&mut self, x: f64, y: f64, w: f64, h: f64, packed: u32) {
        let Some((x0, y0, x1, y1)) = self.clamp_rect(x, y, w, h) else {
            return;
        };
        for row in y0..y1 {
            let from = (row * self.width + x0) as usize;
            let to = (row * self.width + x1) as usize;
            self.pixels[from..to].fill(packed);
        }
    }

    /// Fill one row where pixel centers fall inside `[xa, xb)`.
    fn fill_row_span(&mut self, y: u32, xa: f64, xb: f64, packed: u32) {
        let x0 = (xa - 0.5).ceil().max(0.0) as u32;
        let x1 = (xb - 0.5).ceil().clamp(0.0, f64::from(self.width)) as u32;
        if x0 >= x1 {
            return;
        }
        let from = (y * self.width + x0) as usize;
        let to = (y * self.width + x1) as usize;
        self.pixels[from..to].fill(packed);
    }

    /// Scanline fill with the nonzero winding rule.
    fn raster_fill(&mut self, path: &BezPath, packed: u32) {
        let edges = collect_edges(path);
        if edges.is_empty() {
            return;
        }
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for &(a, b) in &edges {
            min_y = min_y.min(a.y).min(b.y);
            max_y = max_y.max(a.y).max(b.y);
        }
        let y0 = min_y.floor().max(0.0) as u32;
        let y1 = max_y.ceil().clamp(0.0, f64::from(self.height)) as u32;

        let mut hits: Vec<(f64, i32)> = Vec::new();
        for y in y0..y1 {
            let ys = f64::from(y) + 0.5;
            hits.clear();
            for &(a, b) in &edges {
                // Half-open in y so shared vertices count once; horizontal
                // edges never intersect a center line.
                let (winding, top, bottom) = if a.y <= b.y { (1, a, b) } else { (-1, b, a) };
                if top.y <= ys && ys < bottom.y {
                    let t = (ys - top.y) / (bottom.y - top.y);
                    hits.push((top.x + t * (bottom.x - top.x), winding));
                }
            }
            hits.sort_by(|p, q| p.0.total_cmp(&q.0));
            let mut winding = 0;
            let mut span_start = 0.0;
            for &(xhit, w) in &hits {
                let was = winding;
                winding += w;
                if was == 0 && winding != 0 {
                    span_start = xhit;
                } else if was != 0 && winding == 0 {
                    self.fill_row_span(y, span_start, xhit, packed);
                }
            }
        }
    }

    fn raster_stroke(&mut self, path: &BezPath, packed: u32) {
        let mut start = Point::ZERO;
        let mut current = Point::ZERO;
        flatten(path, FLATTEN_TOLERANCE, |el| match el {
            PathEl::MoveTo(p) => {
                start = p;
                current = p;
            }
            PathEl::LineTo(p) => {
                self.draw_segment(current, p, packed);
                current = p;
            }
            PathEl::ClosePath => {
                self.draw_segment(current, start, packed);
                current = start;
            }
            _ => {}
        });
    }
}

impl Surface for PixelSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_fill_color(&mut self, color: Color) {
        self.fill_color = pack(color);
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.stroke_color = pack(color);
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let packed = self.fill_color;
        self.write_rect(x, y, w, h, packed);
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let packed = self.stroke_color;
        let corners = [
            Point::new(x, y),
            Point::new(x + w, y),
            Point::new(x + w, y + h),
            Point::new(x, y + h),
        ];
        for i in 0..4 {
            self.draw_segment(corners[i], corners[(i + 1) % 4], packed);
        }
    }

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.write_rect(x, y, w, h, 0);
    }

    fn fill_path(&mut self, path: &BezPath) {
        let packed = self.fill_color;
        self.raster_fill(path, packed);
    }

    fn stroke_path(&mut self, path: &BezPath) {
        let packed = self.stroke_color;
        self.raster_stroke(path, packed);
    }

    fn read_rgba(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.width || y >= self.height {
            return None;
        }
        let px = self.pixels[(y * self.width + x) as usize];
        Some([
            (px >> 16) as u8,
            (px >> 8) as u8,
            px as u8,
            (px >> 24) as u8,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dabble_core::shapes;

    fn red() -> Color {
        Color::from_rgba8(255, 0, 0, 255)
    }

    fn white() -> Color {
        Color::from_rgba8(255, 255, 255, 255)
    }

    #[test]
    fn test_new_surface_is_transparent() {
        let surface = PixelSurface::new(4, 4);
        assert_eq!(surface.read_rgba(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(surface.read_rgba(3, 3), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_fill_floods_every_pixel() {
        let mut surface = PixelSurface::new(4, 4);
        surface.fill(white());
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(surface.read_rgba(x, y), Some([255, 255, 255, 255]));
            }
        }
    }

    #[test]
    fn test_read_out_of_bounds_is_none() {
        let surface = PixelSurface::new(4, 4);
        assert_eq!(surface.read_rgba(-1, 0), None);
        assert_eq!(surface.read_rgba(0, -1), None);
        assert_eq!(surface.read_rgba(4, 0), None);
        assert_eq!(surface.read_rgba(0, 4), None);
    }

    #[test]
    fn test_fill_rect_stays_inside_its_bounds() {
        let mut surface = PixelSurface::new(10, 10);
        surface.set_fill_color(red());
        surface.fill_rect(2.0, 2.0, 3.0, 3.0);
        assert_eq!(surface.read_rgba(2, 2), Some([255, 0, 0, 255]));
        assert_eq!(surface.read_rgba(4, 4), Some([255, 0, 0, 255]));
        assert_eq!(surface.read_rgba(1, 1), Some([0, 0, 0, 0]));
        assert_eq!(surface.read_rgba(5, 5), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_fill_rect_clamps_to_the_surface() {
        let mut surface = PixelSurface::new(10, 10);
        surface.set_fill_color(red());
        surface.fill_rect(-20.0, -20.0, 25.0, 25.0);
        assert_eq!(surface.read_rgba(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(surface.read_rgba(4, 4), Some([255, 0, 0, 255]));
        assert_eq!(surface.read_rgba(5, 5), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_clear_rect_writes_transparent_pixels() {
        let mut surface = PixelSurface::new(10, 10);
        surface.fill(white());
        surface.clear_rect(3.0, 3.0, 2.0, 2.0);
        assert_eq!(surface.read_rgba(3, 3), Some([0, 0, 0, 0]));
        assert_eq!(surface.read_rgba(4, 4), Some([0, 0, 0, 0]));
        assert_eq!(surface.read_rgba(2, 2), Some([255, 255, 255, 255]));
        assert_eq!(surface.read_rgba(5, 5), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_stroke_rect_outlines_without_filling() {
        let mut surface = PixelSurface::new(10, 10);
        surface.set_stroke_color(red());
        surface.stroke_rect(2.0, 2.0, 5.0, 5.0);
        assert_eq!(surface.read_rgba(2, 2), Some([255, 0, 0, 255]));
        assert_eq!(surface.read_rgba(7, 7), Some([255, 0, 0, 255]));
        assert_eq!(surface.read_rgba(4, 2), Some([255, 0, 0, 255]));
        assert_eq!(surface.read_rgba(4, 4), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_stroke_line_touches_both_endpoints() {
        let mut surface = PixelSurface::new(10, 10);
        surface.set_stroke_color(red());
        shapes::stroke_line(&mut surface, Point::new(0.0, 0.0), Point::new(5.0, 3.0));
        assert_eq!(surface.read_rgba(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(surface.read_rgba(5, 3), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_square_path_fill_is_half_open() {
        let mut surface = PixelSurface::new(12, 12);
        surface.set_fill_color(red());
        let mut path = BezPath::new();
        path.move_to(Point::new(2.0, 2.0));
        path.line_to(Point::new(8.0, 2.0));
        path.line_to(Point::new(8.0, 8.0));
        path.line_to(Point::new(2.0, 8.0));
        path.close_path();
        surface.fill_path(&path);

        assert_eq!(surface.read_rgba(2, 2), Some([255, 0, 0, 255]));
        assert_eq!(surface.read_rgba(7, 7), Some([255, 0, 0, 255]));
        assert_eq!(surface.read_rgba(8, 8), Some([0, 0, 0, 0]));
        assert_eq!(surface.read_rgba(1, 3), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_triangle_fill_respects_winding() {
        let mut surface = PixelSurface::new(12, 12);
        surface.set_fill_color(red());
        let triangle = [
            Point::new(1.0, 1.0),
            Point::new(9.0, 1.0),
            Point::new(5.0, 9.0),
        ];
        shapes::fill_poly(&mut surface, &triangle);
        assert_eq!(surface.read_rgba(5, 4), Some([255, 0, 0, 255]));
        assert_eq!(surface.read_rgba(1, 8), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_circle_fill_covers_center_not_corner() {
        let mut surface = PixelSurface::new(24, 24);
        surface.set_fill_color(red());
        shapes::fill_circle(&mut surface, Point::new(10.0, 10.0), 5.0);
        assert_eq!(surface.read_rgba(10, 10), Some([255, 0, 0, 255]));
        assert_eq!(surface.read_rgba(14, 10), Some([255, 0, 0, 255]));
        assert_eq!(surface.read_rgba(14, 14), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_zero_radius_circle_fills_nothing() {
        let mut surface = PixelSurface::new(8, 8);
        surface.set_fill_color(red());
        shapes::fill_circle(&mut surface, Point::new(4.0, 4.0), 0.0);
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(surface.read_rgba(x, y), Some([0, 0, 0, 0]));
            }
        }
    }

    #[test]
    fn test_zero_radius_circle_stroke_degenerates_to_a_point() {
        let mut surface = PixelSurface::new(8, 8);
        surface.set_stroke_color(red());
        shapes::stroke_circle(&mut surface, Point::new(4.0, 4.0), 0.0);
        // At most the center pixel; everything else stays untouched.
        assert_eq!(surface.read_rgba(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(surface.read_rgba(6, 4), Some([0, 0, 0, 0]));
        assert_eq!(surface.read_rgba(4, 6), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_open_subpaths_are_closed_for_filling() {
        let mut surface = PixelSurface::new(80, 80);
        surface.set_fill_color(red());
        // Heart glyph built from two cubics with no explicit close.
        let mut path = BezPath::new();
        path.move_to(Point::new(50.0, 30.0));
        path.curve_to(
            Point::new(30.0, 10.0),
            Point::new(10.0, 50.0),
            Point::new(50.0, 70.0),
        );
        path.curve_to(
            Point::new(90.0, 50.0),
            Point::new(70.0, 10.0),
            Point::new(50.0, 30.0),
        );
        surface.fill_path(&path);

        assert_eq!(surface.read_rgba(50, 35), Some([255, 0, 0, 255]));
        assert_eq!(surface.read_rgba(35, 25), Some([255, 0, 0, 255]));
        assert_eq!(surface.read_rgba(50, 25), Some([0, 0, 0, 0]));
        assert_eq!(surface.read_rgba(10, 30), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_present_composites_over_background() {
        let mut surface = PixelSurface::new(2, 1);
        surface.set_fill_color(red());
        surface.fill_rect(0.0, 0.0, 1.0, 1.0);

        let mut out = Vec::new();
        surface.present_into(&mut out, white());
        assert_eq!(out, vec![0xFFFF_0000, 0xFFFF_FFFF]);
    }

    #[test]
    fn test_erase_then_present_shows_background() {
        let mut surface = PixelSurface::new(3, 1);
        surface.fill(red());
        surface.clear_rect(1.0, 0.0, 1.0, 1.0);

        let mut out = Vec::new();
        surface.present_into(&mut out, white());
        assert_eq!(out, vec![0xFFFF_0000, 0xFFFF_FFFF, 0xFFFF_0000]);
    }
}
