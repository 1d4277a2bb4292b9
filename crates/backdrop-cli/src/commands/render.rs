//! Headless page-to-PNG render command

use super::drive;
use anyhow::{Context, Result};
use backdrop_core::Color;
use backdrop_page::{load_page, Page};
use backdrop_render::{as_canvas, composite_page, save_image, Canvas, PageLayer};
use std::fs;
use std::path::Path;

pub struct RenderArgs {
    pub page: String,
    pub frames: u32,
    pub fps: f64,
    pub seed: u32,
    pub output: String,
    pub background: u32,
}

pub fn run(args: RenderArgs) -> Result<()> {
    let document = load_page(&args.page, Canvas::boxed).context("Failed to load page")?;
    let mut page = Page::start(document, args.seed).context("Failed to start page")?;
    println!("Loaded page: {}", page.document().name);
    println!("Instances: {}", page.registry().len());

    drive(&mut page, args.frames, args.fps);

    let out_dir = Path::new(&args.output);
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", args.output))?;

    let mut layers = Vec::new();
    for (key, node_index, instance) in page.registry().iter() {
        let Some(canvas) = instance.surface().and_then(as_canvas) else {
            continue;
        };
        let Some(node) = page.document().node(node_index) else {
            continue;
        };

        let path = out_dir.join(format!("{}.png", key));
        canvas
            .save_png(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("  {} ({}) -> {}", key, node.id, path.display());

        layers.push(PageLayer {
            origin: node.origin,
            canvas,
        });
    }

    let width = page.document().viewport().width.max(1.0).round() as u32;
    let height = page.document().page_height().max(1.0).round() as u32;
    let image = composite_page(width, height, Color::from_hex(args.background), &layers);
    let page_path = out_dir.join("page.png");
    save_image(&image, &page_path)
        .with_context(|| format!("Failed to write {}", page_path.display()))?;

    println!("Rendered {} frame(s) to {}", args.frames, page_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
[page]
name = "render-test"

[viewport]
width = 800
height = 200

[device]
memory_gb = 8

[[container]]
id = "hero"
hero = true

[[container]]
id = "grid"
particles = "geometric"
height = 120
"#;

    #[test]
    fn writes_overlay_and_page_images() {
        let dir = tempfile::tempdir().unwrap();
        let page_path = dir.path().join("page.toml");
        fs::write(&page_path, PAGE).unwrap();
        let out = dir.path().join("out");

        run(RenderArgs {
            page: page_path.to_string_lossy().into_owned(),
            frames: 3,
            fps: 60.0,
            seed: 5,
            output: out.to_string_lossy().into_owned(),
            background: 0x000000,
        })
        .unwrap();

        assert!(out.join("hero-0.png").exists());
        assert!(out.join("section-0.png").exists());
        let composite = image::open(out.join("page.png")).unwrap();
        assert_eq!(composite.width(), 800);
        assert_eq!(composite.height(), 320);
    }
}
