//! Page document: laid-out containers that host particle overlays

use crate::format::{ContainerDef, LengthValue, PageFile};
use crate::governor::{ConnectionClass, DeviceHints};
use backdrop_core::{BackdropError, Bounds, Result, Vec2};
use backdrop_particles::{Container, DrawSurface, OverlayLayer, SurfaceFactory};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// A resolved container dimension
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Pixels(f32),
    /// Percentage of the matching viewport dimension
    Percent(f32),
}

impl Length {
    pub fn parse(field: &str, value: &LengthValue) -> Result<Self> {
        let invalid = |v: String| BackdropError::InvalidLength {
            field: field.to_string(),
            value: v,
        };
        let length = match value {
            LengthValue::Pixels(px) => Length::Pixels(*px),
            LengthValue::Text(text) => {
                let t = text.trim();
                if let Some(pct) = t.strip_suffix('%') {
                    let n: f32 = pct.trim().parse().map_err(|_| invalid(text.clone()))?;
                    Length::Percent(n)
                } else {
                    let px = t.strip_suffix("px").unwrap_or(t);
                    let n: f32 = px.trim().parse().map_err(|_| invalid(text.clone()))?;
                    Length::Pixels(n)
                }
            }
        };
        match length {
            Length::Pixels(n) | Length::Percent(n) if n.is_finite() && n >= 0.0 => Ok(length),
            _ => Err(invalid(match value {
                LengthValue::Pixels(px) => px.to_string(),
                LengthValue::Text(text) => text.clone(),
            })),
        }
    }

    /// Pixels for this length against `reference` (the viewport dimension)
    pub fn resolve(&self, reference: f32) -> f32 {
        match self {
            Length::Pixels(px) => *px,
            Length::Percent(pct) => reference * pct / 100.0,
        }
    }
}

/// CSS positioning scheme of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Positioning {
    Static,
    Relative,
    Absolute,
    Fixed,
    Sticky,
}

impl Positioning {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "static" => Some(Positioning::Static),
            "relative" => Some(Positioning::Relative),
            "absolute" => Some(Positioning::Absolute),
            "fixed" => Some(Positioning::Fixed),
            "sticky" => Some(Positioning::Sticky),
            _ => None,
        }
    }

    /// Can absolutely placed children anchor to this container?
    pub fn is_positioned(&self) -> bool {
        *self != Positioning::Static
    }
}

/// One container on the page
#[derive(Debug, Clone)]
pub struct ContainerNode {
    pub id: String,
    pub hero: bool,
    /// Particle tag as written, if any
    pub particles: Option<String>,
    pub width: Length,
    pub height: Length,
    pub position: Positioning,
    /// Per-container overrides for the selected preset
    pub config: toml::value::Table,
    /// Top-left corner in page coordinates
    pub origin: Vec2,
    bounds: Bounds,
    overlay: Option<OverlayLayer>,
    layout_writes: u32,
    factory: SurfaceFactory,
}

impl ContainerNode {
    fn from_def(def: &ContainerDef, factory: SurfaceFactory) -> Result<Self> {
        let position = match def.position.as_deref() {
            None => Positioning::Static,
            Some(p) => Positioning::parse(p).ok_or_else(|| {
                BackdropError::ValidationError(format!(
                    "container '{}': unknown position '{}'",
                    def.id, p
                ))
            })?,
        };

        Ok(Self {
            id: def.id.clone(),
            hero: def.hero,
            particles: def.particles.clone(),
            width: Length::parse(&format!("{}.width", def.id), &def.width)?,
            height: Length::parse(&format!("{}.height", def.id), &def.height)?,
            position,
            config: def.config.clone(),
            origin: Vec2::ZERO,
            bounds: Bounds::default(),
            overlay: None,
            layout_writes: 0,
            factory,
        })
    }

    /// Overlay currently attached, if any
    pub fn overlay(&self) -> Option<&OverlayLayer> {
        self.overlay.as_ref()
    }

    /// Number of times the particle runtime changed this container's layout
    pub fn layout_writes(&self) -> u32 {
        self.layout_writes
    }
}

impl Container for ContainerNode {
    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn establish_positioning(&mut self) {
        if self.position.is_positioned() {
            return;
        }
        self.position = Positioning::Relative;
        self.layout_writes += 1;
        tracing::debug!(container = %self.id, "set position: relative");
    }

    fn attach_overlay(&mut self, layer: OverlayLayer) -> Result<Box<dyn DrawSurface>> {
        if self.overlay.is_some() {
            return Err(BackdropError::SurfaceError(format!(
                "container '{}' already has an overlay",
                self.id
            )));
        }
        let (width, height) = self.bounds.pixel_size();
        self.overlay = Some(layer);
        Ok((self.factory)(width, height))
    }

    fn detach_overlay(&mut self) {
        self.overlay = None;
    }
}

/// A loaded page: viewport, device hints, and containers stacked top to bottom
#[derive(Debug, Clone)]
pub struct PageDocument {
    pub name: String,
    pub description: Option<String>,
    viewport: Bounds,
    has_canvas: bool,
    memory_gb: Option<f32>,
    connection: ConnectionClass,
    nodes: Vec<ContainerNode>,
}

impl PageDocument {
    /// Validate a parsed page file and lay it out. `factory` backs every overlay surface.
    pub fn from_file(file: &PageFile, factory: SurfaceFactory) -> Result<Self> {
        let viewport = Bounds::new(file.viewport.width, file.viewport.height);
        if !(viewport.width.is_finite() && viewport.height.is_finite()) || viewport.is_empty() {
            return Err(BackdropError::ValidationError(format!(
                "viewport must be positive, got {}x{}",
                viewport.width, viewport.height
            )));
        }

        let mut seen = HashSet::new();
        let mut nodes = Vec::with_capacity(file.containers.len());
        for def in &file.containers {
            if def.id.trim().is_empty() {
                return Err(BackdropError::ValidationError(
                    "container id must not be empty".to_string(),
                ));
            }
            if !seen.insert(def.id.as_str()) {
                return Err(BackdropError::DuplicateContainer(def.id.clone()));
            }
            nodes.push(ContainerNode::from_def(def, factory)?);
        }

        let mut document = Self {
            name: file.page.name.clone(),
            description: file.page.description.clone(),
            viewport,
            has_canvas: file.device.canvas,
            memory_gb: file.device.memory_gb,
            connection: file
                .device
                .connection
                .as_deref()
                .map(ConnectionClass::parse)
                .unwrap_or(ConnectionClass::Unknown),
            nodes,
        };
        document.layout();
        Ok(document)
    }

    /// Stack containers vertically in document order against the current viewport
    fn layout(&mut self) {
        let mut y = 0.0;
        for node in &mut self.nodes {
            let width = node.width.resolve(self.viewport.width).max(0.0);
            let height = node.height.resolve(self.viewport.height).max(0.0);
            node.origin = Vec2::new(0.0, y);
            node.bounds = Bounds::new(width, height);
            y += height;
        }
    }

    /// Change the viewport and re-measure every container
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Bounds::new(width.max(0.0), height.max(0.0));
        self.layout();
    }

    pub fn viewport(&self) -> Bounds {
        self.viewport
    }

    /// Total height of the stacked containers
    pub fn page_height(&self) -> f32 {
        self.nodes
            .last()
            .map(|n| n.origin.y + n.bounds.height)
            .unwrap_or(0.0)
    }

    pub fn device_hints(&self) -> DeviceHints {
        DeviceHints {
            has_canvas: self.has_canvas,
            viewport_width: self.viewport.width,
            memory_gb: self.memory_gb,
            connection: self.connection,
        }
    }

    pub fn nodes(&self) -> &[ContainerNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&ContainerNode> {
        self.nodes.get(index)
    }

    pub fn node_mut(&mut self, index: usize) -> Option<&mut ContainerNode> {
        self.nodes.get_mut(index)
    }

    /// Index of the container with `id`
    pub fn find(&self, id: &str) -> Result<usize> {
        self.nodes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| BackdropError::ContainerNotFound(id.to_string()))
    }
}

/// Load a page document from a TOML file
pub fn load_page<P: AsRef<Path>>(path: P, factory: SurfaceFactory) -> Result<PageDocument> {
    let content = fs::read_to_string(path)?;
    load_page_string(&content, factory)
}

/// Load a page document from a TOML string
pub fn load_page_string(content: &str, factory: SurfaceFactory) -> Result<PageDocument> {
    let file: PageFile = toml::from_str(content)?;
    PageDocument::from_file(&file, factory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use backdrop_particles::RecordingSurface;

    const PAGE: &str = r#"
[page]
name = "landing"

[viewport]
width = 1000
height = 800

[[container]]
id = "hero"
hero = true

[[container]]
id = "features"
particles = "geometric"
height = "50%"
width = "600px"
position = "absolute"

[[container]]
id = "footer"
height = 120
"#;

    fn load(content: &str) -> Result<PageDocument> {
        load_page_string(content, RecordingSurface::boxed)
    }

    #[test]
    fn containers_stack_vertically() {
        let doc = load(PAGE).unwrap();
        assert_eq!(doc.name, "landing");
        let nodes = doc.nodes();
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0].bounds(), Bounds::new(1000.0, 800.0));
        assert_eq!(nodes[0].origin, Vec2::ZERO);
        assert_eq!(nodes[1].bounds(), Bounds::new(600.0, 400.0));
        assert_eq!(nodes[1].origin, Vec2::new(0.0, 800.0));
        assert_eq!(nodes[2].origin, Vec2::new(0.0, 1200.0));
        assert!((doc.page_height() - 1320.0).abs() < 1e-3);
    }

    #[test]
    fn viewport_change_relayouts() {
        let mut doc = load(PAGE).unwrap();
        doc.set_viewport(500.0, 400.0);
        assert_eq!(doc.nodes()[0].bounds(), Bounds::new(500.0, 400.0));
        assert_eq!(doc.nodes()[1].bounds(), Bounds::new(600.0, 200.0));
        assert_eq!(doc.nodes()[2].origin, Vec2::new(0.0, 600.0));
        assert_eq!(doc.device_hints().viewport_width, 500.0);
    }

    #[test]
    fn lengths_parse() {
        let px = Length::parse("w", &LengthValue::Text(" 480px ".into())).unwrap();
        assert_eq!(px, Length::Pixels(480.0));
        assert_eq!(
            Length::parse("w", &LengthValue::Text("25%".into())).unwrap(),
            Length::Percent(25.0)
        );
        assert_eq!(Length::Percent(25.0).resolve(200.0), 50.0);
        assert!(Length::parse("w", &LengthValue::Text("wide".into())).is_err());
        assert!(Length::parse("w", &LengthValue::Pixels(-3.0)).is_err());
    }

    #[test]
    fn malformed_length_names_the_field() {
        let content = "[page]\nname = \"x\"\n[[container]]\nid = \"a\"\nheight = \"tall\"\n";
        match load(content) {
            Err(BackdropError::InvalidLength { field, value }) => {
                assert_eq!(field, "a.height");
                assert_eq!(value, "tall");
            }
            other => panic!("expected InvalidLength, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let content = "[page]\nname = \"x\"\n[[container]]\nid = \"a\"\n[[container]]\nid = \"a\"\n";
        assert!(matches!(
            load(content),
            Err(BackdropError::DuplicateContainer(id)) if id == "a"
        ));
    }

    #[test]
    fn bad_position_and_viewport_are_rejected() {
        let content = "[page]\nname = \"x\"\n[[container]]\nid = \"a\"\nposition = \"floaty\"\n";
        assert!(matches!(load(content), Err(BackdropError::ValidationError(_))));

        let content = "[page]\nname = \"x\"\n[viewport]\nwidth = 0\n";
        assert!(matches!(load(content), Err(BackdropError::ValidationError(_))));
    }

    #[test]
    fn positioning_is_established_once() {
        let mut doc = load(PAGE).unwrap();
        let hero = doc.node_mut(0).unwrap();
        hero.establish_positioning();
        hero.establish_positioning();
        assert_eq!(hero.position, Positioning::Relative);
        assert_eq!(hero.layout_writes(), 1);

        // already absolutely positioned, left alone
        let features = doc.node_mut(1).unwrap();
        features.establish_positioning();
        assert_eq!(features.position, Positioning::Absolute);
        assert_eq!(features.layout_writes(), 0);
    }

    #[test]
    fn overlay_attach_and_detach() {
        let mut doc = load(PAGE).unwrap();
        let node = doc.node_mut(2).unwrap();
        let surface = node.attach_overlay(OverlayLayer::particle_overlay()).unwrap();
        assert_eq!(surface.size(), (1000, 120));
        assert!(node.attach_overlay(OverlayLayer::particle_overlay()).is_err());
        node.detach_overlay();
        assert!(node.overlay().is_none());
        assert!(node.attach_overlay(OverlayLayer::particle_overlay()).is_ok());
    }

    #[test]
    fn find_by_id() {
        let doc = load(PAGE).unwrap();
        assert_eq!(doc.find("footer").unwrap(), 2);
        assert!(matches!(
            doc.find("nope"),
            Err(BackdropError::ContainerNotFound(_))
        ));
    }

    #[test]
    fn device_section_feeds_hints() {
        let content = "[page]\nname = \"x\"\n[device]\ncanvas = false\nmemory_gb = 2\nconnection = \"slow-2g\"\n";
        let hints = load(content).unwrap().device_hints();
        assert!(!hints.has_canvas);
        assert_eq!(hints.memory_gb, Some(2.0));
        assert_eq!(hints.connection, ConnectionClass::Slow2g);
    }
}
