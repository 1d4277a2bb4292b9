//! Drawing surface seam and the container overlay it lives in

use backdrop_core::{Color, Vec2};
use std::any::Any;

/// A 2D immediate-mode drawing target, one per simulation instance
pub trait DrawSurface {
    /// Backing-store size in pixels
    fn size(&self) -> (u32, u32);

    /// Resize the backing store; contents are discarded
    fn resize(&mut self, width: u32, height: u32);

    /// Clear to fully transparent
    fn clear(&mut self);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color);

    /// Stroke a closed polygon outline through `points`
    fn stroke_polygon(&mut self, points: &[Vec2], width: f32, color: Color);

    /// Downcast hook for exporters that need the concrete surface
    fn as_any(&self) -> &dyn Any;
}

/// Builds a surface of the given pixel size when an overlay is attached
pub type SurfaceFactory = fn(u32, u32) -> Box<dyn DrawSurface>;

/// How an overlay sits inside its container
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayLayer {
    /// Absolutely positioned at inset 0 against the container
    pub fill_container: bool,
    /// Pointer events pass through to the container underneath
    pub intercepts_pointer: bool,
    /// Stacking order relative to sibling content (which sits at 0)
    pub z_index: i32,
}

impl OverlayLayer {
    /// The particle background overlay: full-size, pointer-transparent, above siblings
    pub const fn particle_overlay() -> Self {
        Self {
            fill_container: true,
            intercepts_pointer: false,
            z_index: 1,
        }
    }
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
    },
    Polygon {
        points: Vec<Vec2>,
        width: f32,
        color: Color,
    },
}

/// Surface that records commands since the last clear instead of rasterizing
#[derive(Debug, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
    clears: u64,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
            clears: 0,
        }
    }

    /// `SurfaceFactory`-compatible constructor
    pub fn boxed(width: u32, height: u32) -> Box<dyn DrawSurface> {
        Box::new(Self::new(width, height))
    }

    /// Commands issued since the most recent clear
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
    }

    pub fn polygons(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Polygon { .. }))
    }

    /// Total clears, i.e. frames started on this surface
    pub fn clear_count(&self) -> u64 {
        self.clears
    }
}

impl DrawSurface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.commands.clear();
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
        self.clears += 1;
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn stroke_polygon(&mut self, points: &[Vec2], width: f32, color: Color) {
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            width,
            color,
        });
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
