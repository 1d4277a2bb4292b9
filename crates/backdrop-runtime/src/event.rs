//! Page-level events delivered to the particle runtime

/// Host signals consumed between frames
#[derive(Clone, Debug, PartialEq)]
pub enum PageEvent {
    /// Viewport changed size; every container is re-measured
    Resized { width: f32, height: f32 },
    /// Page became hidden or visible again
    VisibilityChanged { visible: bool },
    /// Pointer moved, in page coordinates
    PointerMoved { x: f32, y: f32 },
    /// Pointer left the page entirely
    PointerLeft,
    /// Page is being torn down
    Teardown,
}
