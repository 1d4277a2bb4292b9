//! Backdrop Core - Foundational types for the Backdrop particle engine
//!
//! This crate provides the core types that all other Backdrop crates depend on:
//! - `InstanceKey` - Synthetic keys for simulation instances (`hero-0`, `section-2`)
//! - `Vec2`, `Bounds` - 2D geometry in surface pixels
//! - `Color` - RGBA color with a separable alpha channel
//! - Error types and Result alias

mod error;
mod key;
mod types;

pub use error::{BackdropError, Result};
pub use key::{InstanceCategory, InstanceKey};
pub use types::{Bounds, Color, Vec2};
