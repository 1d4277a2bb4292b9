//! Backdrop Render - CPU rasterization of particle overlays
//!
//! `Canvas` is the drawing surface used outside a browser: anti-aliased discs,
//! lines and polygon outlines blended source-over into an RGBA buffer.
//! `composite_page` stacks every overlay onto one page-sized image for export.

mod canvas;
mod composite;

pub use canvas::{as_canvas, Canvas};
pub use composite::{composite_page, save_image, PageLayer};
