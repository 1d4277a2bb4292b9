//! Particle configuration (presets plus TOML overrides)

use crate::particle::ParticleKind;
use backdrop_core::Color;
use serde::{Serialize, Serializer};

/// Upper bound on particles per instance; connection rendering is O(n²)
pub const MAX_PARTICLES: usize = 1000;

/// Viewport width below which discovery halves base particle counts
pub const MOBILE_BREAKPOINT: f32 = 768.0;

/// Configuration for one simulation instance. Immutable once the instance is created.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticleConfig {
    /// Target particle count before responsive or governor scaling
    pub particle_count: usize,
    /// Base particle radius in pixels
    pub particle_size: f32,
    /// Base speed; spawn velocities fall within ±speed/2 per axis
    pub speed: f32,
    /// Maximum distance at which two particles are linked. Zero disables links.
    pub connection_distance: f32,
    #[serde(serialize_with = "color_array")]
    pub particle_color: Color,
    #[serde(serialize_with = "color_array")]
    pub connection_color: Color,
    pub connection_width: f32,
    pub mouse_interaction: bool,
    /// Repulsion radius around the pointer. Zero disables repulsion.
    pub mouse_radius: f32,
    /// Scale particle count with surface area on resize
    pub responsive: bool,
    /// Shape palette; empty means plain glowing discs
    pub shapes: Vec<ParticleKind>,
    /// Maximum per-frame rotation in radians for shape particles
    pub rotation_speed: f32,
    /// Outline width for shape particles
    pub stroke_width: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Preset::Default.config(false)
    }
}

impl ParticleConfig {
    /// True if particles are drawn as outlined polygons rather than discs
    pub fn uses_shapes(&self) -> bool {
        !self.shapes.is_empty()
    }

    /// Parse a ParticleConfig from a TOML table, starting from the default preset
    pub fn from_toml(table: &toml::value::Table) -> Self {
        let mut config = Self::default();
        config.apply_toml(table);
        config
    }

    /// Override fields present in `table`; absent or mistyped keys keep their value
    pub fn apply_toml(&mut self, table: &toml::value::Table) {
        if let Some(v) = table.get("particle_count") {
            let n = v.as_integer().unwrap_or(self.particle_count as i64);
            self.particle_count = n.clamp(0, MAX_PARTICLES as i64) as usize;
        }
        if let Some(v) = table.get("particle_size") {
            self.particle_size = toml_f32(v, self.particle_size).max(0.0);
        }
        if let Some(v) = table.get("speed") {
            self.speed = toml_f32(v, self.speed).max(0.0);
        }
        if let Some(v) = table.get("connection_distance") {
            self.connection_distance = toml_f32(v, self.connection_distance).max(0.0);
        }
        if let Some(v) = table.get("particle_color") {
            self.particle_color = toml_color(v, self.particle_color);
        }
        if let Some(v) = table.get("connection_color") {
            self.connection_color = toml_color(v, self.connection_color);
        }
        if let Some(v) = table.get("connection_width") {
            self.connection_width = toml_f32(v, self.connection_width).max(0.0);
        }
        if let Some(v) = table.get("mouse_interaction") {
            self.mouse_interaction = v.as_bool().unwrap_or(self.mouse_interaction);
        }
        if let Some(v) = table.get("mouse_radius") {
            self.mouse_radius = toml_f32(v, self.mouse_radius).max(0.0);
        }
        if let Some(v) = table.get("responsive") {
            self.responsive = v.as_bool().unwrap_or(self.responsive);
        }
        if let Some(v) = table.get("shapes") {
            if let Some(arr) = v.as_array() {
                self.shapes = arr
                    .iter()
                    .filter_map(|s| s.as_str())
                    .filter_map(ParticleKind::parse_shape)
                    .collect();
            }
        }
        if let Some(v) = table.get("rotation_speed") {
            self.rotation_speed = toml_f32(v, self.rotation_speed);
        }
        if let Some(v) = table.get("stroke_width") {
            self.stroke_width = toml_f32(v, self.stroke_width).max(0.0);
        }
    }
}

/// Named configurations selected at discovery time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    /// Full-bleed hero banners: dense, bright, interactive
    Hero,
    Subtle,
    /// Rotating outlined polygons
    Geometric,
    /// Slow drifting bubbles without links
    Floating,
    Default,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::Hero,
        Preset::Subtle,
        Preset::Geometric,
        Preset::Floating,
        Preset::Default,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Hero => "hero",
            Preset::Subtle => "subtle",
            Preset::Geometric => "geometric",
            Preset::Floating => "floating",
            Preset::Default => "default",
        }
    }

    /// Parse any preset name, including `hero`
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Parse a container style marker. Hero is a container category, not a style,
    /// so it is rejected here; an empty marker means `default`.
    pub fn from_style_marker(marker: &str) -> Option<Self> {
        match marker.trim() {
            "" => Some(Preset::Default),
            "hero" => None,
            other => Self::parse(other),
        }
    }

    /// Build this preset's configuration; `mobile` halves the base count
    pub fn config(&self, mobile: bool) -> ParticleConfig {
        let (desktop_count, mobile_count) = self.base_counts();
        let particle_count = if mobile { mobile_count } else { desktop_count };

        match self {
            Preset::Hero => ParticleConfig {
                particle_count,
                particle_size: 2.5,
                speed: 0.6,
                connection_distance: 150.0,
                particle_color: Color::new(1.0, 1.0, 1.0, 0.8),
                connection_color: Color::new(1.0, 1.0, 1.0, 0.3),
                connection_width: 1.0,
                mouse_interaction: true,
                mouse_radius: 150.0,
                responsive: true,
                shapes: Vec::new(),
                rotation_speed: 0.0,
                stroke_width: 1.0,
            },
            Preset::Subtle => ParticleConfig {
                particle_count,
                particle_size: 1.5,
                speed: 0.3,
                connection_distance: 100.0,
                particle_color: Color::from_hex(0x64748B).with_alpha(0.5),
                connection_color: Color::from_hex(0x64748B).with_alpha(0.15),
                connection_width: 0.5,
                mouse_interaction: false,
                mouse_radius: 100.0,
                responsive: true,
                shapes: Vec::new(),
                rotation_speed: 0.0,
                stroke_width: 1.0,
            },
            Preset::Geometric => ParticleConfig {
                particle_count,
                particle_size: 10.0,
                speed: 0.4,
                connection_distance: 120.0,
                particle_color: Color::from_hex(0x6366F1).with_alpha(0.6),
                connection_color: Color::from_hex(0x6366F1).with_alpha(0.2),
                connection_width: 1.0,
                mouse_interaction: true,
                mouse_radius: 120.0,
                responsive: true,
                shapes: vec![
                    ParticleKind::Triangle,
                    ParticleKind::Square,
                    ParticleKind::Hexagon,
                ],
                rotation_speed: 0.02,
                stroke_width: 1.5,
            },
            Preset::Floating => ParticleConfig {
                particle_count,
                particle_size: 3.0,
                speed: 0.25,
                connection_distance: 0.0,
                particle_color: Color::from_hex(0x38BDF8).with_alpha(0.6),
                connection_color: Color::from_hex(0x38BDF8).with_alpha(0.0),
                connection_width: 1.0,
                mouse_interaction: true,
                mouse_radius: 120.0,
                responsive: true,
                shapes: Vec::new(),
                rotation_speed: 0.0,
                stroke_width: 1.0,
            },
            Preset::Default => ParticleConfig {
                particle_count,
                particle_size: 2.0,
                speed: 0.4,
                connection_distance: 120.0,
                particle_color: Color::from_hex(0x3B82F6).with_alpha(0.6),
                connection_color: Color::from_hex(0x3B82F6).with_alpha(0.2),
                connection_width: 1.0,
                mouse_interaction: true,
                mouse_radius: 120.0,
                responsive: true,
                shapes: Vec::new(),
                rotation_speed: 0.0,
                stroke_width: 1.0,
            },
        }
    }

    /// (desktop, mobile) base particle counts
    fn base_counts(&self) -> (usize, usize) {
        match self {
            Preset::Hero => (80, 40),
            Preset::Subtle => (30, 15),
            Preset::Geometric => (24, 12),
            Preset::Floating => (40, 20),
            Preset::Default => (50, 25),
        }
    }
}

/// Whether discovery should use mobile base counts for this viewport width
pub fn is_mobile_viewport(viewport_width: f32) -> bool {
    viewport_width < MOBILE_BREAKPOINT
}

fn color_array<S: Serializer>(color: &Color, serializer: S) -> Result<S::Ok, S::Error> {
    color.to_array().serialize(serializer)
}

// ── TOML helpers (handle integer/float coercion) ──

/// TOML number as f32; `inf`, `nan` and out-of-range values keep `default`
fn toml_f32(v: &toml::Value, default: f32) -> f32 {
    v.as_float()
        .map(|f| f as f32)
        .or_else(|| v.as_integer().map(|i| i as f32))
        .filter(|f| f.is_finite())
        .unwrap_or(default)
}

fn toml_color(v: &toml::Value, default: Color) -> Color {
    if let Some(arr) = v.as_array() {
        if arr.len() >= 4 {
            return Color::new(
                toml_f32(&arr[0], default.r),
                toml_f32(&arr[1], default.g),
                toml_f32(&arr[2], default.b),
                toml_f32(&arr[3], default.a),
            );
        }
        if arr.len() == 3 {
            return Color::new(
                toml_f32(&arr[0], default.r),
                toml_f32(&arr[1], default.g),
                toml_f32(&arr[2], default.b),
                default.a,
            );
        }
    }
    default
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let config = ParticleConfig::default();
        assert!(config.particle_count > 0);
        assert!(config.connection_distance > 0.0);
        assert!(!config.uses_shapes());
    }

    #[test]
    fn mobile_presets_halve_counts() {
        for preset in Preset::ALL {
            let desktop = preset.config(false).particle_count;
            let mobile = preset.config(true).particle_count;
            assert_eq!(mobile, desktop / 2, "{}", preset.name());
        }
    }

    #[test]
    fn only_geometric_uses_shapes() {
        for preset in Preset::ALL {
            assert_eq!(
                preset.config(false).uses_shapes(),
                preset == Preset::Geometric
            );
        }
    }

    #[test]
    fn style_markers() {
        assert_eq!(Preset::from_style_marker("subtle"), Some(Preset::Subtle));
        assert_eq!(Preset::from_style_marker(" geometric "), Some(Preset::Geometric));
        assert_eq!(Preset::from_style_marker(""), Some(Preset::Default));
        assert_eq!(Preset::from_style_marker("hero"), None);
        assert_eq!(Preset::from_style_marker("sparkly"), None);
        assert_eq!(Preset::parse("hero"), Some(Preset::Hero));
    }

    #[test]
    fn parse_from_toml() {
        let toml_str = r#"
particle_count = 12
connection_distance = 90
particle_color = [1.0, 0.5, 0.0, 0.9]
mouse_interaction = false
shapes = ["square", "circle", "star", "hexagon"]
"#;
        let table: toml::value::Table = toml::from_str(toml_str).unwrap();
        let config = ParticleConfig::from_toml(&table);
        assert_eq!(config.particle_count, 12);
        assert!((config.connection_distance - 90.0).abs() < 0.01);
        assert!((config.particle_color.g - 0.5).abs() < 0.01);
        assert!((config.particle_color.a - 0.9).abs() < 0.01);
        assert!(!config.mouse_interaction);
        assert_eq!(
            config.shapes,
            vec![ParticleKind::Square, ParticleKind::Hexagon]
        );
    }

    #[test]
    fn toml_counts_are_clamped() {
        let table: toml::value::Table = toml::from_str("particle_count = -5").unwrap();
        assert_eq!(ParticleConfig::from_toml(&table).particle_count, 0);

        let table: toml::value::Table = toml::from_str("particle_count = 50000").unwrap();
        assert_eq!(ParticleConfig::from_toml(&table).particle_count, MAX_PARTICLES);
    }

    #[test]
    fn non_finite_toml_numbers_are_ignored() {
        let toml_str = r#"
mouse_radius = inf
rotation_speed = nan
connection_distance = -inf
speed = 1e300
particle_color = [1.0, nan, 0.0, inf]
"#;
        let table: toml::value::Table = toml::from_str(toml_str).unwrap();
        let config = ParticleConfig::from_toml(&table);
        let defaults = ParticleConfig::default();
        assert_eq!(config.mouse_radius, defaults.mouse_radius);
        assert_eq!(config.rotation_speed, defaults.rotation_speed);
        assert_eq!(config.connection_distance, defaults.connection_distance);
        assert_eq!(config.speed, defaults.speed);
        assert_eq!(config.particle_color.g, defaults.particle_color.g);
        assert_eq!(config.particle_color.a, defaults.particle_color.a);
        assert_eq!(config.particle_color.r, 1.0);
    }

    #[test]
    fn apply_toml_keeps_preset_fields() {
        let mut config = Preset::Geometric.config(false);
        let table: toml::value::Table = toml::from_str("speed = 1").unwrap();
        config.apply_toml(&table);
        assert!((config.speed - 1.0).abs() < 1e-6);
        assert!(config.uses_shapes());
        assert_eq!(config.particle_count, 24);
    }

    #[test]
    fn serializes_colors_as_arrays() {
        let text = toml::to_string(&Preset::Hero.config(false)).unwrap();
        let table: toml::value::Table = toml::from_str(&text).unwrap();
        let reparsed = ParticleConfig::from_toml(&table);
        assert_eq!(reparsed.particle_count, 80);
        assert!((reparsed.particle_color.a - 0.8).abs() < 1e-6);
        assert!(table["particle_color"].as_array().is_some());
    }

    #[test]
    fn mobile_breakpoint() {
        assert!(is_mobile_viewport(767.0));
        assert!(!is_mobile_viewport(768.0));
    }
}
