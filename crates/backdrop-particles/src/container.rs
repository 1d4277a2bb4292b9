//! Host container seam

use crate::surface::{DrawSurface, OverlayLayer};
use backdrop_core::{Bounds, Result};

/// A page element that hosts one particle overlay
pub trait Container {
    /// Current content-box size
    fn bounds(&self) -> Bounds;

    /// Make the container a positioning reference for absolutely placed overlays.
    /// Implementations change layout only if the container is not already positioned.
    fn establish_positioning(&mut self);

    /// Insert an overlay layer and return the surface that backs it
    fn attach_overlay(&mut self, layer: OverlayLayer) -> Result<Box<dyn DrawSurface>>;

    /// Remove the overlay layer, if any
    fn detach_overlay(&mut self);
}
