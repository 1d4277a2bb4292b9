//! Page compositing: every overlay onto one page-sized image

use crate::canvas::{source_over, Canvas};
use backdrop_core::{BackdropError, Color, Result, Vec2};
use image::{Rgba, RgbaImage};
use std::path::Path;

/// One overlay canvas placed at its container's page origin
#[derive(Debug, Clone, Copy)]
pub struct PageLayer<'a> {
    pub origin: Vec2,
    pub canvas: &'a Canvas,
}

/// Draw `layers` in order over a solid `background`, clipped to the page
pub fn composite_page(width: u32, height: u32, background: Color, layers: &[PageLayer<'_>]) -> RgbaImage {
    let mut page = RgbaImage::from_pixel(width.max(1), height.max(1), Rgba(background.to_rgba8()));
    tracing::trace!(width, height, layers = layers.len(), "compositing page");

    for layer in layers {
        let ox = layer.origin.x.round() as i64;
        let oy = layer.origin.y.round() as i64;
        for (x, y, src) in layer.canvas.image().enumerate_pixels() {
            let alpha = src.0[3];
            if alpha == 0 {
                continue;
            }
            let px = ox + x as i64;
            let py = oy + y as i64;
            if px < 0 || py < 0 || px >= page.width() as i64 || py >= page.height() as i64 {
                continue;
            }
            let [r, g, b, a] = src.0.map(|c| c as f32 / 255.0);
            let dst = page.get_pixel_mut(px as u32, py as u32);
            *dst = source_over(*dst, Color::new(r, g, b, 1.0), a);
        }
    }

    page
}

pub fn save_image(image: &RgbaImage, path: &Path) -> Result<()> {
    image
        .save(path)
        .map_err(|e| BackdropError::RenderError(format!("Failed to save PNG: {}", e)))?;
    tracing::debug!(path = %path.display(), width = image.width(), height = image.height(), "saved page image");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use backdrop_particles::DrawSurface;

    #[test]
    fn empty_page_is_background() {
        let page = composite_page(4, 3, Color::BLACK, &[]);
        assert_eq!(page.dimensions(), (4, 3));
        assert!(page.pixels().all(|p| p.0 == [0, 0, 0, 255]));
    }

    #[test]
    fn layers_land_at_their_origin() {
        let mut top = Canvas::new(10, 10);
        top.fill_circle(Vec2::new(5.0, 5.0), 2.0, Color::WHITE);
        let mut bottom = Canvas::new(10, 10);
        bottom.fill_circle(Vec2::new(5.0, 5.0), 2.0, Color::new(1.0, 0.0, 0.0, 1.0));

        let layers = [
            PageLayer {
                origin: Vec2::ZERO,
                canvas: &top,
            },
            PageLayer {
                origin: Vec2::new(0.0, 10.0),
                canvas: &bottom,
            },
        ];
        let page = composite_page(10, 20, Color::BLACK, &layers);
        assert_eq!(page.get_pixel(5, 5).0, [255, 255, 255, 255]);
        assert_eq!(page.get_pixel(5, 15).0, [255, 0, 0, 255]);
        assert_eq!(page.get_pixel(0, 10).0, [0, 0, 0, 255]);
    }

    #[test]
    fn translucent_overlay_tints_background() {
        let mut canvas = Canvas::new(4, 4);
        canvas.fill_circle(Vec2::new(2.0, 2.0), 4.0, Color::new(1.0, 1.0, 1.0, 0.5));
        let page = composite_page(
            4,
            4,
            Color::BLACK,
            &[PageLayer {
                origin: Vec2::ZERO,
                canvas: &canvas,
            }],
        );
        let px = page.get_pixel(2, 2).0;
        assert_eq!(px[3], 255);
        assert!((px[0] as i32 - 128).abs() <= 1);
    }

    #[test]
    fn offscreen_layers_are_clipped() {
        let mut canvas = Canvas::new(4, 4);
        canvas.fill_circle(Vec2::new(2.0, 2.0), 3.0, Color::WHITE);
        let page = composite_page(
            4,
            4,
            Color::BLACK,
            &[PageLayer {
                origin: Vec2::new(-100.0, 50.0),
                canvas: &canvas,
            }],
        );
        assert!(page.pixels().all(|p| p.0 == [0, 0, 0, 255]));
    }
}
