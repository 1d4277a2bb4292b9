//! Particle entity: floating motion, wrap, pointer repulsion, and painting

use crate::config::ParticleConfig;
use crate::rand::ParticleRng;
use crate::surface::DrawSurface;
use backdrop_core::{Bounds, Vec2};
use backdrop_runtime::PointerState;
use serde::Serialize;
use std::f32::consts::{FRAC_PI_2, TAU};

/// Velocity multiplier applied every update
pub const FRICTION: f32 = 0.99;
/// Gain of the spring pulling velocity back toward the anchor
pub const RESTORE_GAIN: f32 = 0.001;
/// Impulse scale of pointer repulsion at zero distance
pub const REPULSION_STRENGTH: f32 = 0.5;
/// Vertical amplitude of the decorative float
pub const FLOAT_AMPLITUDE: f32 = 0.5;
/// Glow disc radius multiplier
pub const GLOW_SCALE: f32 = 2.0;
/// Glow disc opacity multiplier
pub const GLOW_OPACITY: f32 = 0.1;

/// What a particle looks like. Everything except `Circle` is an outlined, rotating polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleKind {
    Circle,
    Triangle,
    Square,
    Hexagon,
}

impl ParticleKind {
    pub fn name(&self) -> &'static str {
        match self {
            ParticleKind::Circle => "circle",
            ParticleKind::Triangle => "triangle",
            ParticleKind::Square => "square",
            ParticleKind::Hexagon => "hexagon",
        }
    }

    /// Parse a shape-palette entry. Circles are not part of the shape palette.
    pub fn parse_shape(name: &str) -> Option<Self> {
        match name {
            "triangle" => Some(ParticleKind::Triangle),
            "square" => Some(ParticleKind::Square),
            "hexagon" => Some(ParticleKind::Hexagon),
            _ => None,
        }
    }

    /// Polygon side count, or None for circles
    pub fn sides(&self) -> Option<usize> {
        match self {
            ParticleKind::Circle => None,
            ParticleKind::Triangle => Some(3),
            ParticleKind::Square => Some(4),
            ParticleKind::Hexagon => Some(6),
        }
    }
}

/// One simulated particle
#[derive(Clone, Debug)]
pub struct Particle {
    pub kind: ParticleKind,
    pub position: Vec2,
    /// Spawn point the restoring force pulls toward
    pub anchor: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    pub opacity: f32,
    pub phase: f32,
    pub amplitude: f32,
    /// Phase advance per update, in radians
    pub frequency: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
}

impl Particle {
    /// Spawn at a uniformly random position inside `bounds` with randomized motion and looks
    pub fn spawn(
        rng: &mut ParticleRng,
        bounds: Bounds,
        config: &ParticleConfig,
        kind: ParticleKind,
    ) -> Self {
        let position = Vec2::new(
            rng.range(0.0, bounds.width.max(0.0)),
            rng.range(0.0, bounds.height.max(0.0)),
        );
        let velocity = Vec2::new(
            rng.range(-0.5, 0.5) * config.speed,
            rng.range(-0.5, 0.5) * config.speed,
        );
        let (rotation, rotation_speed) = if kind.sides().is_some() {
            (rng.range(0.0, TAU), rng.range(-1.0, 1.0) * config.rotation_speed)
        } else {
            (0.0, 0.0)
        };

        Self {
            kind,
            position,
            anchor: position,
            velocity,
            radius: rng.range(0.5, 1.5) * config.particle_size,
            opacity: rng.range(0.3, 1.0) * config.particle_color.a,
            phase: rng.range(0.0, TAU),
            amplitude: FLOAT_AMPLITUDE,
            frequency: rng.range(0.01, 0.03),
            rotation,
            rotation_speed,
        }
    }

    /// Advance one frame
    pub fn update(&mut self, bounds: Bounds, pointer: &PointerState, config: &ParticleConfig) {
        self.position += self.velocity;

        self.phase += self.frequency;
        self.position.y += self.phase.sin() * self.amplitude;

        self.wrap(bounds);

        if config.mouse_interaction && config.mouse_radius > 0.0 && pointer.is_active() {
            let offset = self.position - pointer.position;
            let distance = offset.length();
            if distance < config.mouse_radius {
                let force = (config.mouse_radius - distance) / config.mouse_radius;
                let angle = offset.y.atan2(offset.x);
                self.velocity += Vec2::from_angle(angle) * (force * REPULSION_STRENGTH);
            }
        }

        self.velocity = self.velocity * FRICTION;
        self.velocity = self.velocity - (self.position - self.anchor) * RESTORE_GAIN;

        if self.kind.sides().is_some() {
            self.rotation = (self.rotation + self.rotation_speed) % TAU;
        }
    }

    /// Toroidal wrap: leaving one edge re-enters at the opposite edge
    fn wrap(&mut self, bounds: Bounds) {
        if self.position.x < 0.0 {
            self.position.x = bounds.width;
        } else if self.position.x > bounds.width {
            self.position.x = 0.0;
        }
        if self.position.y < 0.0 {
            self.position.y = bounds.height;
        } else if self.position.y > bounds.height {
            self.position.y = 0.0;
        }
    }

    /// Paint this particle. Circles get a faint glow under a solid core;
    /// shapes are stroked outlines.
    pub fn draw(&self, surface: &mut dyn DrawSurface, config: &ParticleConfig) {
        let color = config.particle_color.with_alpha(self.opacity);
        if self.kind.sides().is_some() {
            surface.stroke_polygon(&self.polygon_points(), config.stroke_width, color);
        } else {
            surface.fill_circle(
                self.position,
                self.radius * GLOW_SCALE,
                config.particle_color.with_alpha(self.opacity * GLOW_OPACITY),
            );
            surface.fill_circle(self.position, self.radius, color);
        }
    }

    /// Vertices of the particle's polygon; empty for circles
    pub fn polygon_points(&self) -> Vec<Vec2> {
        let Some(sides) = self.kind.sides() else {
            return Vec::new();
        };
        (0..sides)
            .map(|i| {
                let angle = self.rotation + i as f32 * TAU / sides as f32 - FRAC_PI_2;
                self.position + Vec2::from_angle(angle) * self.radius
            })
            .collect()
    }
}

/// Build a fresh particle set of exactly `count` particles inside `bounds`.
/// Kinds are drawn uniformly from the shape palette, or are circles if it is empty.
pub fn build_particles(
    count: usize,
    bounds: Bounds,
    config: &ParticleConfig,
    rng: &mut ParticleRng,
) -> Vec<Particle> {
    (0..count)
        .map(|_| {
            let kind = rng.pick(&config.shapes).unwrap_or(ParticleKind::Circle);
            Particle::spawn(rng, bounds, config, kind)
        })
        .collect()
}
