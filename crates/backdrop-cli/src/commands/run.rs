//! Headless simulation command

use super::drive;
use anyhow::{Context, Result};
use backdrop_page::{load_page, Page};
use backdrop_particles::RecordingSurface;
use backdrop_runtime::PageEvent;

pub struct RunArgs {
    pub page: String,
    pub frames: u32,
    pub fps: f64,
    pub seed: u32,
    pub pointer: Option<[f32; 2]>,
    pub format: String,
}

pub fn run(args: RunArgs) -> Result<()> {
    let document =
        load_page(&args.page, RecordingSurface::boxed).context("Failed to load page")?;
    let mut page = Page::start(document, args.seed).context("Failed to start page")?;

    if let Some([x, y]) = args.pointer {
        page.push_event(PageEvent::PointerMoved { x, y });
    }

    let mitigation = drive(&mut page, args.frames, args.fps);
    let stats = page.stats();

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Page: {}", stats.name);
    println!("Performance: {}", stats.performance);
    if let Some(fps) = stats.fps {
        println!("Measured FPS: {:.1}", fps);
    }
    if let Some((frame, m)) = mitigation {
        println!(
            "Frame rate dropped to {:.1} at frame {}; particle counts scaled by {}",
            m.fps, frame, m.scale
        );
    }

    if stats.instances.is_empty() {
        println!("No particle instances running.");
        return Ok(());
    }

    println!(
        "\n{:<12} {:>9} {:>7} {:>7} {:>11} {:>12}",
        "instance", "particles", "width", "height", "frames", "connections"
    );
    for s in &stats.instances {
        println!(
            "{:<12} {:>9} {:>7.0} {:>7.0} {:>11} {:>12}",
            s.key, s.particles, s.width, s.height, s.frames, s.connections_last_frame
        );
    }
    println!("\nTotal particles: {}", stats.total_particles);

    Ok(())
}
