//! Page inspection command

use anyhow::{Context, Result};
use backdrop_page::{discover, load_page, PerformanceGovernor};
use backdrop_particles::{is_mobile_viewport, Container, RecordingSurface};

pub fn run(page: &str) -> Result<()> {
    let document = load_page(page, RecordingSurface::boxed).context("Failed to load page")?;
    let viewport = document.viewport();
    let governor = PerformanceGovernor::assess(&document.device_hints());

    println!("Page: {}", document.name);
    if let Some(desc) = &document.description {
        println!("  {}", desc);
    }
    println!("Viewport: {}x{}", viewport.width, viewport.height);
    println!("Performance: {}", governor.level().as_str());
    for reason in governor.reasons() {
        println!("  - {}", reason);
    }

    println!("\nContainers ({}):", document.nodes().len());
    for node in document.nodes() {
        let bounds = node.bounds();
        let marker = match (&node.particles, node.hero) {
            (_, true) => "hero".to_string(),
            (Some(tag), false) if tag.is_empty() => "particles".to_string(),
            (Some(tag), false) => format!("particles={}", tag),
            (None, false) => "-".to_string(),
        };
        println!(
            "  {:<16} {:>6.0}x{:<6.0} at y={:<6.0} {}",
            node.id, bounds.width, bounds.height, node.origin.y, marker
        );
    }

    let found = discover(&document);
    let mobile = is_mobile_viewport(viewport.width);
    println!("\nInstances ({}):", found.len());
    for d in &found {
        let Some(node) = document.node(d.node) else {
            continue;
        };
        let mut config = d.preset.config(mobile);
        config.apply_toml(&node.config);
        println!(
            "  {:<12} {:<16} preset={:<10} particles={}{}",
            d.key.to_string(),
            node.id,
            d.preset.name(),
            config.particle_count,
            if config.uses_shapes() { " (shapes)" } else { "" }
        );
    }
    if !governor.is_high_performance() && !found.is_empty() {
        println!("\nParticles stay off on this device.");
    }

    Ok(())
}
