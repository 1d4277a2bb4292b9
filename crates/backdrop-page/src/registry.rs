//! Instance registry: discovery and page-wide lifecycle fan-out

use crate::document::PageDocument;
use backdrop_core::{BackdropError, InstanceKey, Result, Vec2};
use backdrop_particles::rand::derive_seed;
use backdrop_particles::{is_mobile_viewport, InstanceStats, Preset, SimulationInstance};
use backdrop_runtime::{FrameHandle, FrameScheduler};
use std::collections::BTreeMap;

/// A container selected for particles at discovery
#[derive(Debug, Clone, PartialEq)]
pub struct Discovery {
    pub key: InstanceKey,
    /// Index into the document's containers
    pub node: usize,
    pub preset: Preset,
}

/// Find particle containers in document order. Hero containers get the hero preset;
/// tagged containers get their tag's preset, falling back to `default` for unknown tags.
/// Indices count per category, from 0.
pub fn discover(document: &PageDocument) -> Vec<Discovery> {
    let mut heroes = 0;
    let mut sections = 0;
    let mut found = Vec::new();

    for (node, container) in document.nodes().iter().enumerate() {
        if container.hero {
            found.push(Discovery {
                key: InstanceKey::hero(heroes),
                node,
                preset: Preset::Hero,
            });
            heroes += 1;
        } else if let Some(tag) = &container.particles {
            let preset = Preset::from_style_marker(tag).unwrap_or_else(|| {
                tracing::warn!(container = %container.id, tag = %tag, "unknown particle style, using default");
                Preset::Default
            });
            found.push(Discovery {
                key: InstanceKey::section(sections),
                node,
                preset,
            });
            sections += 1;
        }
    }
    found
}

struct Entry {
    node: usize,
    instance: SimulationInstance,
}

/// All particle instances on a page, keyed `hero-N` / `section-N`.
/// Filled by `initialize_all`, emptied only by `destroy_all`.
#[derive(Default)]
pub struct InstanceRegistry {
    entries: BTreeMap<InstanceKey, Entry>,
}

impl InstanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discover containers and start one instance per match. Returns the instance count.
    pub fn initialize_all(
        &mut self,
        document: &mut PageDocument,
        scheduler: &mut FrameScheduler<InstanceKey>,
        seed: u32,
    ) -> Result<usize> {
        if !self.entries.is_empty() {
            tracing::warn!(instances = self.entries.len(), "registry already initialized");
            return Ok(self.entries.len());
        }

        let mobile = is_mobile_viewport(document.viewport().width);
        for (stream, found) in discover(document).into_iter().enumerate() {
            let node = document.node_mut(found.node).ok_or_else(|| {
                BackdropError::ContainerNotFound(format!("container #{}", found.node))
            })?;

            let mut config = found.preset.config(mobile);
            config.apply_toml(&node.config);

            let instance = SimulationInstance::create(
                found.key,
                node,
                config,
                derive_seed(seed, stream as u32),
                scheduler,
            )?;
            self.entries.insert(
                found.key,
                Entry {
                    node: found.node,
                    instance,
                },
            );
        }

        tracing::info!(instances = self.entries.len(), mobile, "initialized particle instances");
        Ok(self.entries.len())
    }

    pub fn pause_all(&mut self, scheduler: &mut FrameScheduler<InstanceKey>) {
        for entry in self.entries.values_mut() {
            entry.instance.pause(scheduler);
        }
    }

    pub fn resume_all(&mut self, scheduler: &mut FrameScheduler<InstanceKey>) {
        for entry in self.entries.values_mut() {
            entry.instance.resume(scheduler);
        }
    }

    /// Destroy every instance and empty the registry
    pub fn destroy_all(
        &mut self,
        document: &mut PageDocument,
        scheduler: &mut FrameScheduler<InstanceKey>,
    ) {
        for (key, mut entry) in std::mem::take(&mut self.entries) {
            match document.node_mut(entry.node) {
                Some(node) => entry.instance.destroy(node, scheduler),
                None => {
                    tracing::warn!(%key, "container missing at teardown");
                    entry.instance.pause(scheduler);
                }
            }
        }
        tracing::info!("destroyed all particle instances");
    }

    /// Re-measure every instance against its (already re-laid-out) container
    pub fn resize_all(&mut self, document: &PageDocument) {
        for entry in self.entries.values_mut() {
            if let Some(node) = document.node(entry.node) {
                entry.instance.resize(node);
            }
        }
    }

    /// Governor mitigation: shrink every instance's particle count
    pub fn scale_all(&mut self, factor: f32) {
        for entry in self.entries.values_mut() {
            entry.instance.scale_particle_count(factor);
        }
    }

    /// Route a page-coordinate pointer position to every instance; containers it is
    /// not over see a leave
    pub fn dispatch_pointer(&mut self, document: &PageDocument, x: f32, y: f32) {
        let page = Vec2::new(x, y);
        for entry in self.entries.values_mut() {
            if let Some(node) = document.node(entry.node) {
                entry.instance.route_pointer(page, node.origin);
            }
        }
    }

    pub fn pointer_left_page(&mut self) {
        for entry in self.entries.values_mut() {
            entry.instance.pointer_left();
        }
    }

    /// Deliver a due frame to the instance it was requested for
    pub fn run_frame(
        &mut self,
        handle: FrameHandle,
        key: InstanceKey,
        scheduler: &mut FrameScheduler<InstanceKey>,
    ) -> bool {
        match self.entries.get_mut(&key) {
            Some(entry) => entry.instance.run_frame(handle, scheduler),
            None => false,
        }
    }

    pub fn get(&self, key: &InstanceKey) -> Option<&SimulationInstance> {
        self.entries.get(key).map(|e| &e.instance)
    }

    /// Instances in key order with the index of their container
    pub fn iter(&self) -> impl Iterator<Item = (InstanceKey, usize, &SimulationInstance)> {
        self.entries
            .iter()
            .map(|(key, entry)| (*key, entry.node, &entry.instance))
    }

    pub fn keys(&self) -> Vec<InstanceKey> {
        self.entries.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_particles(&self) -> usize {
        self.entries.values().map(|e| e.instance.particle_count()).sum()
    }

    pub fn stats(&self) -> Vec<InstanceStats> {
        self.entries.values().map(|e| e.instance.stats()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::load_page_string;
    use backdrop_particles::{Container, RecordingSurface};

    const PAGE: &str = r#"
[page]
name = "registry"

[viewport]
width = 1920
height = 1080

[[container]]
id = "top"
hero = true

[[container]]
id = "shapes"
particles = "geometric"
height = 600

[[container]]
id = "plain"
height = 300

[[container]]
id = "mystery"
particles = "sparkly"
height = 400

[[container]]
id = "quiet"
particles = ""
height = 400

[container.config]
particle_count = 7
"#;

    fn setup() -> (PageDocument, FrameScheduler<InstanceKey>, InstanceRegistry) {
        let mut doc = load_page_string(PAGE, RecordingSurface::boxed).unwrap();
        let mut scheduler = FrameScheduler::new();
        let mut registry = InstanceRegistry::new();
        registry.initialize_all(&mut doc, &mut scheduler, 42).unwrap();
        (doc, scheduler, registry)
    }

    #[test]
    fn discovery_assigns_keys_and_presets() {
        let doc = load_page_string(PAGE, RecordingSurface::boxed).unwrap();
        let found = discover(&doc);
        let summary: Vec<_> = found
            .iter()
            .map(|d| (d.key.to_string(), d.node, d.preset))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("hero-0".to_string(), 0, Preset::Hero),
                ("section-0".to_string(), 1, Preset::Geometric),
                ("section-1".to_string(), 3, Preset::Default),
                ("section-2".to_string(), 4, Preset::Default),
            ]
        );
    }

    #[test]
    fn initialize_creates_one_instance_per_marker() {
        let (doc, scheduler, registry) = setup();
        assert_eq!(registry.len(), 4);
        assert_eq!(scheduler.pending_count(), 4);

        let hero = registry.get(&InstanceKey::hero(0)).unwrap();
        assert_eq!(hero.particle_count(), 80);
        assert!(!hero.config().uses_shapes());

        let shapes = registry.get(&InstanceKey::section(0)).unwrap();
        assert!(shapes.config().uses_shapes());

        let quiet = registry.get(&InstanceKey::section(2)).unwrap();
        assert_eq!(quiet.particle_count(), 7);

        // untagged container untouched
        assert!(doc.nodes()[2].overlay().is_none());
        assert_eq!(doc.nodes()[2].layout_writes(), 0);
    }

    #[test]
    fn narrow_viewport_uses_mobile_counts() {
        let narrow = PAGE.replace("width = 1920", "width = 600");
        let mut doc = load_page_string(&narrow, RecordingSurface::boxed).unwrap();
        let mut scheduler = FrameScheduler::new();
        let mut registry = InstanceRegistry::new();
        registry.initialize_all(&mut doc, &mut scheduler, 42).unwrap();

        let hero = registry.get(&InstanceKey::hero(0)).unwrap();
        assert_eq!(hero.config().particle_count, 40);
        assert_eq!(hero.particle_count(), 40);
        let shapes = registry.get(&InstanceKey::section(0)).unwrap();
        assert_eq!(shapes.config().particle_count, 12);
        // explicit overrides win over the mobile table
        let quiet = registry.get(&InstanceKey::section(2)).unwrap();
        assert_eq!(quiet.particle_count(), 7);
    }

    #[test]
    fn initialize_twice_is_a_no_op() {
        let (mut doc, mut scheduler, mut registry) = setup();
        assert_eq!(registry.initialize_all(&mut doc, &mut scheduler, 1).unwrap(), 4);
        assert_eq!(scheduler.pending_count(), 4);
    }

    #[test]
    fn pause_and_resume_fan_out() {
        let (_doc, mut scheduler, mut registry) = setup();
        registry.pause_all(&mut scheduler);
        registry.pause_all(&mut scheduler);
        assert!(scheduler.is_idle());

        registry.resume_all(&mut scheduler);
        registry.resume_all(&mut scheduler);
        assert_eq!(scheduler.pending_count(), 4);
        for key in registry.keys() {
            assert_eq!(scheduler.pending_for(&key), 1);
        }
    }

    #[test]
    fn run_frame_reaches_the_right_instance() {
        let (_doc, mut scheduler, mut registry) = setup();
        for (handle, key) in scheduler.take_due() {
            assert!(registry.run_frame(handle, key, &mut scheduler));
        }
        assert!(registry.stats().iter().all(|s| s.frames == 1));
        assert_eq!(scheduler.pending_count(), 4);
    }

    #[test]
    fn destroy_all_empties_and_detaches() {
        let (mut doc, mut scheduler, mut registry) = setup();
        registry.destroy_all(&mut doc, &mut scheduler);
        assert!(registry.is_empty());
        assert!(scheduler.is_idle());
        assert!(doc.nodes().iter().all(|n| n.overlay().is_none()));

        // resume after destroy has nothing to resume
        registry.resume_all(&mut scheduler);
        assert!(scheduler.is_idle());
    }

    #[test]
    fn resize_follows_relayout() {
        let (mut doc, _scheduler, mut registry) = setup();
        doc.set_viewport(960.0, 540.0);
        registry.resize_all(&doc);
        let hero = registry.get(&InstanceKey::hero(0)).unwrap();
        assert_eq!(hero.bounds(), doc.nodes()[0].bounds());
        assert_eq!(hero.particle_count(), 20);
    }

    #[test]
    fn governor_scaling_floors_counts() {
        let (_doc, _scheduler, mut registry) = setup();
        let before: Vec<usize> = registry.iter().map(|(_, _, i)| i.particle_count()).collect();
        registry.scale_all(0.6);
        let after: Vec<usize> = registry.iter().map(|(_, _, i)| i.particle_count()).collect();
        for (b, a) in before.iter().zip(&after) {
            assert_eq!(*a, (*b as f32 * 0.6).floor() as usize);
        }
    }

    #[test]
    fn pointer_is_routed_by_page_position() {
        let (doc, _scheduler, mut registry) = setup();
        // inside "shapes", which starts at y = 1080
        registry.dispatch_pointer(&doc, 100.0, 1100.0);
        let shapes = registry.get(&InstanceKey::section(0)).unwrap();
        assert_eq!(shapes.pointer().position, Vec2::new(100.0, 20.0));
        assert!(!registry.get(&InstanceKey::hero(0)).unwrap().pointer().is_active());

        registry.pointer_left_page();
        assert!(registry.iter().all(|(_, _, i)| !i.pointer().is_active()));
    }
}
