//! Pointer state scoped to one container

use backdrop_core::{Bounds, Vec2};

/// Coordinate used for both axes while no pointer is over the container.
/// Far enough outside any realistic surface that no interaction radius reaches it.
pub const INACTIVE_POINTER: f32 = -10_000.0;

/// Last known pointer position relative to a container's top-left corner
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerState {
    pub position: Vec2,
}

impl Default for PointerState {
    fn default() -> Self {
        Self::inactive()
    }
}

impl PointerState {
    pub const fn inactive() -> Self {
        Self {
            position: Vec2::new(INACTIVE_POINTER, INACTIVE_POINTER),
        }
    }

    pub const fn at(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
        }
    }

    /// Process pointer movement in container coordinates
    pub fn process_move(&mut self, x: f32, y: f32) {
        self.position = Vec2::new(x, y);
    }

    /// Process the pointer leaving the container
    pub fn process_leave(&mut self) {
        *self = Self::inactive();
    }

    /// Is there an active pointer over the container?
    pub fn is_active(&self) -> bool {
        self.position.x != INACTIVE_POINTER || self.position.y != INACTIVE_POINTER
    }

    /// Route a page-level position: inside `bounds` at `origin` it becomes
    /// container-relative, anywhere else it counts as a leave.
    pub fn route_page_position(&mut self, page: Vec2, origin: Vec2, bounds: Bounds) {
        let local = page - origin;
        if bounds.contains(local) {
            self.process_move(local.x, local.y);
        } else {
            self.process_leave();
        }
    }
}
