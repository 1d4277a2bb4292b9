//! Backdrop Particles - ambient particle backgrounds
//!
//! Provides the per-container simulation with:
//! - Drifting, floating particles that wrap at the edges and spring back to an anchor
//! - Pointer repulsion within a configurable radius
//! - Proximity links whose opacity fades with distance
//! - Optional outlined polygon shapes with slow rotation
//! - Named presets, TOML overrides, and area-responsive particle counts

pub mod config;
pub mod connections;
pub mod container;
pub mod particle;
pub mod rand;
pub mod simulation;
pub mod surface;

pub use config::{is_mobile_viewport, ParticleConfig, Preset, MAX_PARTICLES, MOBILE_BREAKPOINT};
pub use connections::{draw_connections, link_strength};
pub use container::Container;
pub use particle::{build_particles, Particle, ParticleKind};
pub use simulation::{responsive_count, InstanceStats, SimulationInstance, REFERENCE_AREA};
pub use surface::{DrawCommand, DrawSurface, OverlayLayer, RecordingSurface, SurfaceFactory};
