//! One particle background bound to one container

use crate::config::ParticleConfig;
use crate::connections::draw_connections;
use crate::container::Container;
use crate::particle::{build_particles, Particle};
use crate::rand::ParticleRng;
use crate::surface::{DrawSurface, OverlayLayer};
use backdrop_core::{Bounds, InstanceKey, Result, Vec2};
use backdrop_runtime::{FrameHandle, FrameScheduler, PointerState};
use serde::Serialize;

/// Surface area at which responsive scaling keeps the full base count (1920×1080)
pub const REFERENCE_AREA: f32 = 1920.0 * 1080.0;

/// Particle count for `bounds` when scaling with area: `floor(base × min(1, area / REFERENCE_AREA))`
pub fn responsive_count(base: usize, bounds: Bounds) -> usize {
    let ratio = (bounds.area() / REFERENCE_AREA).clamp(0.0, 1.0);
    if !ratio.is_finite() {
        return 0;
    }
    (base as f32 * ratio).floor() as usize
}

/// Snapshot of one instance for reporting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstanceStats {
    pub key: String,
    pub particles: usize,
    pub base_count: usize,
    pub width: f32,
    pub height: f32,
    pub frames: u64,
    pub connections_last_frame: usize,
    pub animating: bool,
    pub destroyed: bool,
}

/// A running particle background: surface, particles, pointer, and its frame request
pub struct SimulationInstance {
    key: InstanceKey,
    config: ParticleConfig,
    /// Count that responsive scaling starts from; lowered only by the governor
    base_count: usize,
    bounds: Bounds,
    particles: Vec<Particle>,
    pointer: PointerState,
    /// None once destroyed
    surface: Option<Box<dyn DrawSurface>>,
    /// Present iff a frame request is outstanding
    frame: Option<FrameHandle>,
    rng: ParticleRng,
    frames_rendered: u64,
    last_connections: usize,
}

impl SimulationInstance {
    /// Attach an overlay to `container`, spawn the particle set, and start the frame loop
    pub fn create(
        key: InstanceKey,
        container: &mut dyn Container,
        config: ParticleConfig,
        seed: u32,
        scheduler: &mut FrameScheduler<InstanceKey>,
    ) -> Result<Self> {
        container.establish_positioning();
        let bounds = container.bounds();

        let mut surface = container.attach_overlay(OverlayLayer::particle_overlay())?;
        let (width, height) = bounds.pixel_size();
        if surface.size() != (width, height) {
            surface.resize(width, height);
        }

        let mut rng = ParticleRng::new(seed);
        let base_count = config.particle_count;
        let particles = build_particles(base_count, bounds, &config, &mut rng);

        tracing::debug!(
            %key,
            particles = particles.len(),
            width = bounds.width,
            height = bounds.height,
            shapes = config.uses_shapes(),
            "created particle instance"
        );

        let mut instance = Self {
            key,
            config,
            base_count,
            bounds,
            particles,
            pointer: PointerState::inactive(),
            surface: Some(surface),
            frame: None,
            rng,
            frames_rendered: 0,
            last_connections: 0,
        };
        instance.resume(scheduler);
        Ok(instance)
    }

    /// Re-measure the container, resize the surface, and rebuild the particle set.
    /// No-op after destroy.
    pub fn resize(&mut self, container: &dyn Container) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };

        self.bounds = container.bounds();
        let (width, height) = self.bounds.pixel_size();
        surface.resize(width, height);

        let count = if self.config.responsive {
            responsive_count(self.base_count, self.bounds)
        } else {
            self.particles.len()
        };
        self.rebuild(count);

        tracing::debug!(
            key = %self.key,
            particles = count,
            width = self.bounds.width,
            height = self.bounds.height,
            "resized particle instance"
        );
    }

    /// Cancel the outstanding frame request, if any
    pub fn pause(&mut self, scheduler: &mut FrameScheduler<InstanceKey>) {
        if let Some(handle) = self.frame.take() {
            scheduler.cancel_frame(handle);
        }
    }

    /// Request the next frame unless one is already outstanding. No-op after destroy.
    pub fn resume(&mut self, scheduler: &mut FrameScheduler<InstanceKey>) {
        if self.is_destroyed() || self.frame.is_some() {
            return;
        }
        self.frame = Some(scheduler.request_frame(self.key));
    }

    /// Stop animating and remove the overlay from the container. Idempotent.
    pub fn destroy(
        &mut self,
        container: &mut dyn Container,
        scheduler: &mut FrameScheduler<InstanceKey>,
    ) {
        if self.is_destroyed() {
            return;
        }
        self.pause(scheduler);
        container.detach_overlay();
        self.surface = None;
        self.particles.clear();
        tracing::debug!(key = %self.key, "destroyed particle instance");
    }

    /// Deliver a frame callback. Stale handles (cancelled or superseded) are ignored.
    /// Returns true if a frame was rendered.
    pub fn run_frame(
        &mut self,
        handle: FrameHandle,
        scheduler: &mut FrameScheduler<InstanceKey>,
    ) -> bool {
        if self.frame != Some(handle) {
            return false;
        }
        self.frame = None;

        if !self.render_frame() {
            return false;
        }
        self.frame = Some(scheduler.request_frame(self.key));
        true
    }

    /// Clear, update and draw each particle, then draw links against this frame's positions
    fn render_frame(&mut self) -> bool {
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        let surface: &mut dyn DrawSurface = &mut **surface;

        surface.clear();
        for particle in &mut self.particles {
            particle.update(self.bounds, &self.pointer, &self.config);
            particle.draw(surface, &self.config);
        }
        self.last_connections = draw_connections(&self.particles, surface, &self.config);
        self.frames_rendered += 1;
        true
    }

    /// Shrink the particle count by `factor` and rebuild. The base count shrinks too,
    /// so later resizes keep the reduction.
    pub fn scale_particle_count(&mut self, factor: f32) {
        if self.is_destroyed() {
            return;
        }
        let factor = factor.clamp(0.0, 1.0);
        self.base_count = (self.base_count as f32 * factor).floor() as usize;
        let count = (self.particles.len() as f32 * factor).floor() as usize;
        self.rebuild(count);
    }

    fn rebuild(&mut self, count: usize) {
        self.particles = build_particles(count, self.bounds, &self.config, &mut self.rng);
    }

    /// Pointer moved within the container (container coordinates)
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.pointer.process_move(x, y);
    }

    pub fn pointer_left(&mut self) {
        self.pointer.process_leave();
    }

    /// Route a page-level pointer position given the container's page origin
    pub fn route_pointer(&mut self, page: Vec2, origin: Vec2) {
        self.pointer.route_page_position(page, origin, self.bounds);
    }

    pub fn key(&self) -> InstanceKey {
        self.key
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn base_count(&self) -> usize {
        self.base_count
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn frame_handle(&self) -> Option<FrameHandle> {
        self.frame
    }

    pub fn is_animating(&self) -> bool {
        self.frame.is_some()
    }

    pub fn is_destroyed(&self) -> bool {
        self.surface.is_none()
    }

    pub fn surface(&self) -> Option<&dyn DrawSurface> {
        self.surface.as_deref()
    }

    pub fn stats(&self) -> InstanceStats {
        InstanceStats {
            key: self.key.to_string(),
            particles: self.particles.len(),
            base_count: self.base_count,
            width: self.bounds.width,
            height: self.bounds.height,
            frames: self.frames_rendered,
            connections_last_frame: self.last_connections,
            animating: self.is_animating(),
            destroyed: self.is_destroyed(),
        }
    }
}
