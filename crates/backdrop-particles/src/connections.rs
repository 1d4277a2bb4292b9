//! Proximity links between particles
//!
//! Every unordered pair is tested each frame, so cost grows with the square of
//! the particle count. Counts are capped at `MAX_PARTICLES` and presets stay in
//! the tens, which keeps this well inside a frame budget.

use crate::config::ParticleConfig;
use crate::particle::Particle;
use crate::surface::DrawSurface;

/// Relative link opacity for two particles `distance` apart.
///
/// 1 at zero distance, falling linearly to 0 at `threshold`; None beyond the
/// threshold or when links are disabled (`threshold <= 0`).
pub fn link_strength(distance: f32, threshold: f32) -> Option<f32> {
    if threshold <= 0.0 || !distance.is_finite() || distance > threshold {
        return None;
    }
    Some((threshold - distance) / threshold)
}

/// Draw a line between every pair closer than the connection distance.
/// Returns the number of lines actually drawn.
pub fn draw_connections(
    particles: &[Particle],
    surface: &mut dyn DrawSurface,
    config: &ParticleConfig,
) -> usize {
    if config.connection_distance <= 0.0 {
        return 0;
    }

    let base_alpha = config.connection_color.a;
    let mut drawn = 0;
    for (i, a) in particles.iter().enumerate() {
        for b in &particles[i + 1..] {
            let distance = a.position.distance(&b.position);
            let Some(strength) = link_strength(distance, config.connection_distance) else {
                continue;
            };
            let alpha = strength * base_alpha;
            if alpha <= 0.0 {
                continue;
            }
            surface.stroke_line(
                a.position,
                b.position,
                config.connection_width,
                config.connection_color.with_alpha(alpha),
            );
            drawn += 1;
        }
    }
    drawn
}
