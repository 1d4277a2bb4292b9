//! Page file format definitions

use serde::{Deserialize, Serialize};

/// Root structure of a page TOML file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageFile {
    pub page: PageMetadata,
    #[serde(default)]
    pub viewport: ViewportDef,
    #[serde(default)]
    pub device: DeviceDef,
    #[serde(default, rename = "container")]
    pub containers: Vec<ContainerDef>,
}

/// Page metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMetadata {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Initial viewport size in CSS pixels
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ViewportDef {
    #[serde(default = "default_viewport_width")]
    pub width: f32,
    #[serde(default = "default_viewport_height")]
    pub height: f32,
}

fn default_viewport_width() -> f32 {
    1920.0
}

fn default_viewport_height() -> f32 {
    1080.0
}

impl Default for ViewportDef {
    fn default() -> Self {
        Self {
            width: default_viewport_width(),
            height: default_viewport_height(),
        }
    }
}

/// Capabilities reported by the host device
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceDef {
    /// A 2D drawing context can be obtained
    #[serde(default = "default_true")]
    pub canvas: bool,
    /// Approximate device memory; unknown when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_gb: Option<f32>,
    /// Effective connection type ("slow-2g", "2g", "3g", "4g")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for DeviceDef {
    fn default() -> Self {
        Self {
            canvas: true,
            memory_gb: None,
            connection: None,
        }
    }
}

/// A length as written in the file: a bare number of pixels or a string like `"480px"` / `"100%"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LengthValue {
    Pixels(f32),
    Text(String),
}

impl Default for LengthValue {
    fn default() -> Self {
        LengthValue::Text("100%".to_string())
    }
}

/// Definition of a container element
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerDef {
    pub id: String,
    /// Hero marker
    #[serde(default, skip_serializing_if = "is_false")]
    pub hero: bool,
    /// Particle tag; the value selects a preset, an empty string means the default preset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub particles: Option<String>,
    #[serde(default)]
    pub width: LengthValue,
    #[serde(default)]
    pub height: LengthValue,
    /// CSS position of the container; absent means static
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    /// Overrides applied on top of the selected preset
    #[serde(default, skip_serializing_if = "toml::value::Table::is_empty")]
    pub config: toml::value::Table,
}

fn is_false(v: &bool) -> bool {
    !*v
}

impl ContainerDef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            hero: false,
            particles: None,
            width: LengthValue::default(),
            height: LengthValue::default(),
            position: None,
            config: toml::value::Table::new(),
        }
    }

    pub fn hero(mut self) -> Self {
        self.hero = true;
        self
    }

    pub fn with_particles(mut self, tag: impl Into<String>) -> Self {
        self.particles = Some(tag.into());
        self
    }

    pub fn with_height(mut self, height: LengthValue) -> Self {
        self.height = height;
        self
    }

    pub fn with_config(mut self, key: impl Into<String>, value: toml::Value) -> Self {
        self.config.insert(key.into(), value);
        self
    }
}

impl PageFile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            page: PageMetadata {
                name: name.into(),
                description: None,
            },
            viewport: ViewportDef::default(),
            device: DeviceDef::default(),
            containers: Vec::new(),
        }
    }

    /// A small landing page: hero banner, a few tagged sections, and an untagged footer
    pub fn sample(name: impl Into<String>) -> Self {
        let mut file = Self::new(name);
        file.page.description = Some("Landing page with particle backgrounds".to_string());
        file.containers = vec![
            ContainerDef::new("hero").hero().with_height(LengthValue::Text("100%".into())),
            ContainerDef::new("features")
                .with_particles("geometric")
                .with_height(LengthValue::Pixels(600.0)),
            ContainerDef::new("testimonials")
                .with_particles("subtle")
                .with_height(LengthValue::Pixels(480.0)),
            ContainerDef::new("contact")
                .with_particles("floating")
                .with_height(LengthValue::Pixels(520.0))
                .with_config("particle_count", toml::Value::Integer(30)),
            ContainerDef::new("footer").with_height(LengthValue::Pixels(200.0)),
        ];
        file
    }

    pub fn to_toml_string(&self) -> backdrop_core::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
