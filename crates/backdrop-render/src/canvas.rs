//! RGBA software canvas

use backdrop_core::{BackdropError, Color, Result, Vec2};
use backdrop_particles::DrawSurface;
use image::{Rgba, RgbaImage};
use std::any::Any;
use std::path::Path;

/// Raster drawing surface backed by an `image::RgbaImage` (straight alpha)
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width.max(1), height.max(1)),
        }
    }

    /// `SurfaceFactory`-compatible constructor
    pub fn boxed(width: u32, height: u32) -> Box<dyn DrawSurface> {
        Box::new(Self::new(width, height))
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x < self.image.width() && y < self.image.height() {
            Some(self.image.get_pixel(x, y).0)
        } else {
            None
        }
    }

    /// Number of pixels with any coverage
    pub fn painted_pixels(&self) -> usize {
        self.image.pixels().filter(|p| p.0[3] > 0).count()
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.image
            .save(path)
            .map_err(|e| BackdropError::RenderError(format!("Failed to save PNG: {}", e)))?;
        tracing::debug!(path = %path.display(), "saved canvas");
        Ok(())
    }

    /// Blend `color` at `coverage` into one pixel; out-of-range coordinates are skipped
    fn blend(&mut self, x: i64, y: i64, color: Color, coverage: f32) {
        if x < 0 || y < 0 || x >= self.image.width() as i64 || y >= self.image.height() as i64 {
            return;
        }
        let alpha = (color.a * coverage).clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let pixel = self.image.get_pixel_mut(x as u32, y as u32);
        *pixel = source_over(*pixel, color, alpha);
    }

    /// Pixel range covering `[min, max]` clipped to the image
    fn span(&self, min: f32, max: f32, limit: u32) -> std::ops::Range<i64> {
        let lo = min.floor().max(0.0) as i64;
        let hi = (max.ceil() as i64).min(limit as i64);
        lo..hi.max(lo)
    }
}

/// Straight-alpha source-over composite of `color` at `alpha` onto `dst`
pub(crate) fn source_over(dst: Rgba<u8>, color: Color, alpha: f32) -> Rgba<u8> {
    let [dr, dg, db, da] = dst.0.map(|c| c as f32 / 255.0);
    let out_a = alpha + da * (1.0 - alpha);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let mix = |s: f32, d: f32| (s * alpha + d * da * (1.0 - alpha)) / out_a;
    Rgba(Color::new(mix(color.r, dr), mix(color.g, dg), mix(color.b, db), out_a).to_rgba8())
}

/// Distance from `p` to the segment `a`–`b`
fn segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.x * ab.x + ab.y * ab.y;
    if len_sq <= f32::EPSILON {
        return p.distance(&a);
    }
    let ap = p - a;
    let t = ((ap.x * ab.x + ap.y * ab.y) / len_sq).clamp(0.0, 1.0);
    p.distance(&(a + ab * t))
}

impl DrawSurface for Canvas {
    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.image = RgbaImage::new(width.max(1), height.max(1));
    }

    fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        if !(radius > 0.0) || !center.is_finite() {
            return;
        }
        let (w, h) = self.image.dimensions();
        let xs = self.span(center.x - radius - 1.0, center.x + radius + 1.0, w);
        let ys = self.span(center.y - radius - 1.0, center.y + radius + 1.0, h);
        for y in ys {
            for x in xs.clone() {
                let pixel_center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let coverage = (radius + 0.5 - pixel_center.distance(&center)).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(x, y, color, coverage);
                }
            }
        }
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        if !(width > 0.0) || !from.is_finite() || !to.is_finite() {
            return;
        }
        let half = width * 0.5;
        let (w, h) = self.image.dimensions();
        let xs = self.span(from.x.min(to.x) - half - 1.0, from.x.max(to.x) + half + 1.0, w);
        let ys = self.span(from.y.min(to.y) - half - 1.0, from.y.max(to.y) + half + 1.0, h);
        for y in ys {
            for x in xs.clone() {
                let pixel_center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let d = segment_distance(pixel_center, from, to);
                // sub-pixel widths scale coverage down
                let coverage = (half + 0.5 - d).clamp(0.0, 1.0).min(width.max(0.25));
                if coverage > 0.0 {
                    self.blend(x, y, color, coverage);
                }
            }
        }
    }

    fn stroke_polygon(&mut self, points: &[Vec2], width: f32, color: Color) {
        if points.len() < 2 {
            return;
        }
        for (i, &from) in points.iter().enumerate() {
            let to = points[(i + 1) % points.len()];
            self.stroke_line(from, to, width, color);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Downcast a surface to a `Canvas`, if that is what backs it
pub fn as_canvas(surface: &dyn DrawSurface) -> Option<&Canvas> {
    surface.as_any().downcast_ref::<Canvas>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use backdrop_particles::RecordingSurface;

    #[test]
    fn new_canvas_is_transparent() {
        let canvas = Canvas::new(8, 4);
        assert_eq!(canvas.size(), (8, 4));
        assert_eq!(canvas.painted_pixels(), 0);
        assert_eq!(canvas.pixel(8, 0), None);
    }

    #[test]
    fn circle_fills_center_and_not_corners() {
        let mut canvas = Canvas::new(20, 20);
        canvas.fill_circle(Vec2::new(10.0, 10.0), 4.0, Color::WHITE);
        assert_eq!(canvas.pixel(10, 10), Some([255, 255, 255, 255]));
        assert_eq!(canvas.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(canvas.pixel(19, 19), Some([0, 0, 0, 0]));
    }

    #[test]
    fn translucent_fill_blends_source_over() {
        let mut canvas = Canvas::new(10, 10);
        let red = Color::new(1.0, 0.0, 0.0, 0.5);
        canvas.fill_circle(Vec2::new(5.0, 5.0), 3.0, red);
        let once = canvas.pixel(5, 5).unwrap();
        assert_eq!(once[0], 255);
        assert!((once[3] as i32 - 128).abs() <= 1);

        canvas.fill_circle(Vec2::new(5.0, 5.0), 3.0, red);
        let twice = canvas.pixel(5, 5).unwrap();
        assert!((twice[3] as i32 - 191).abs() <= 1);
    }

    #[test]
    fn line_covers_its_path() {
        let mut canvas = Canvas::new(20, 10);
        canvas.stroke_line(Vec2::new(2.0, 5.0), Vec2::new(18.0, 5.0), 2.0, Color::WHITE);
        for x in 3..17 {
            assert!(canvas.pixel(x, 4).unwrap()[3] > 0, "gap at x={x}");
        }
        assert_eq!(canvas.pixel(10, 0).unwrap()[3], 0);
    }

    #[test]
    fn polygon_is_closed() {
        let mut canvas = Canvas::new(20, 20);
        let square = [
            Vec2::new(4.0, 4.0),
            Vec2::new(16.0, 4.0),
            Vec2::new(16.0, 16.0),
            Vec2::new(4.0, 16.0),
        ];
        canvas.stroke_polygon(&square, 1.0, Color::WHITE);
        // closing edge from (4,16) back to (4,4)
        assert!(canvas.pixel(3, 10).unwrap()[3] > 0 || canvas.pixel(4, 10).unwrap()[3] > 0);
        // interior untouched
        assert_eq!(canvas.pixel(10, 10).unwrap()[3], 0);
    }

    #[test]
    fn clear_and_resize_discard_contents() {
        let mut canvas = Canvas::new(10, 10);
        canvas.fill_circle(Vec2::new(5.0, 5.0), 3.0, Color::WHITE);
        canvas.clear();
        assert_eq!(canvas.painted_pixels(), 0);

        canvas.fill_circle(Vec2::new(5.0, 5.0), 3.0, Color::WHITE);
        canvas.resize(30, 12);
        assert_eq!(canvas.size(), (30, 12));
        assert_eq!(canvas.painted_pixels(), 0);
    }

    #[test]
    fn degenerate_draws_are_ignored() {
        let mut canvas = Canvas::new(10, 10);
        canvas.fill_circle(Vec2::new(5.0, 5.0), 0.0, Color::WHITE);
        canvas.fill_circle(Vec2::new(f32::NAN, 5.0), 2.0, Color::WHITE);
        canvas.stroke_line(Vec2::ZERO, Vec2::new(9.0, 9.0), 0.0, Color::WHITE);
        canvas.fill_circle(Vec2::new(-50.0, -50.0), 3.0, Color::WHITE);
        assert_eq!(canvas.painted_pixels(), 0);
    }

    #[test]
    fn downcast_only_matches_canvas() {
        let canvas = Canvas::boxed(4, 4);
        assert!(as_canvas(canvas.as_ref()).is_some());
        let recording = RecordingSurface::boxed(4, 4);
        assert!(as_canvas(recording.as_ref()).is_none());
    }
}
