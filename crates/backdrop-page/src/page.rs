//! Page context: owns the document, scheduler, registry and governor, and drives ticks

use crate::document::PageDocument;
use crate::governor::{Mitigation, PerformanceGovernor};
use crate::registry::InstanceRegistry;
use backdrop_core::{InstanceKey, Result};
use backdrop_particles::InstanceStats;
use backdrop_runtime::{EventBus, FrameClock, FrameScheduler, PageEvent};
use serde::Serialize;

/// What one tick did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Events applied before frames ran
    pub events: usize,
    /// Instance frames rendered
    pub frames: usize,
    /// Set on the tick that triggered the governor's downgrade
    pub mitigation: Option<Mitigation>,
}

/// Page-wide snapshot for reports
#[derive(Debug, Clone, Serialize)]
pub struct PageStats {
    pub name: String,
    pub performance: &'static str,
    pub fps: Option<f64>,
    pub visible: bool,
    pub pending_frames: usize,
    pub total_particles: usize,
    pub instances: Vec<InstanceStats>,
}

/// One page's particle runtime. Everything page-wide hangs off this object;
/// there is no global registry.
pub struct Page {
    document: PageDocument,
    scheduler: FrameScheduler<InstanceKey>,
    registry: InstanceRegistry,
    governor: PerformanceGovernor,
    clock: FrameClock,
    events: EventBus,
    visible: bool,
}

impl Page {
    /// Assess the device and, only at high performance, start every discovered instance
    pub fn start(mut document: PageDocument, seed: u32) -> Result<Self> {
        let governor = PerformanceGovernor::assess(&document.device_hints());
        let mut scheduler = FrameScheduler::new();
        let mut registry = InstanceRegistry::new();

        if governor.is_high_performance() {
            registry.initialize_all(&mut document, &mut scheduler, seed)?;
        } else {
            tracing::info!(page = %document.name, "low performance device, particles disabled");
        }

        Ok(Self {
            document,
            scheduler,
            registry,
            governor,
            clock: FrameClock::new(),
            events: EventBus::new(),
            visible: true,
        })
    }

    /// Queue a host event; it is applied at the start of the next tick
    pub fn push_event(&mut self, event: PageEvent) {
        self.events.push(event);
    }

    /// One host frame: apply queued events, deliver due frames, then let the governor sample
    pub fn tick(&mut self, now_ms: f64) -> TickReport {
        self.clock.tick(now_ms);

        let mut report = TickReport::default();
        for event in self.events.drain() {
            self.apply(event);
            report.events += 1;
        }

        for (handle, key) in self.scheduler.take_due() {
            if self.registry.run_frame(handle, key, &mut self.scheduler) {
                report.frames += 1;
            }
        }

        // sampled on page-clock time: one host stall is clamped, not measured as a slow window
        if report.frames > 0 {
            if let Some(mitigation) = self.governor.sample(self.clock.total_ms) {
                self.registry.scale_all(mitigation.scale);
                report.mitigation = Some(mitigation);
            }
        }
        report
    }

    fn apply(&mut self, event: PageEvent) {
        tracing::trace!(?event, "page event");
        match event {
            PageEvent::Resized { width, height } => {
                self.document.set_viewport(width, height);
                self.registry.resize_all(&self.document);
            }
            PageEvent::VisibilityChanged { visible: false } => self.pause_all(),
            PageEvent::VisibilityChanged { visible: true } => self.resume_all(),
            PageEvent::PointerMoved { x, y } => {
                self.registry.dispatch_pointer(&self.document, x, y);
            }
            PageEvent::PointerLeft => self.registry.pointer_left_page(),
            PageEvent::Teardown => self.destroy_all(),
        }
    }

    pub fn pause_all(&mut self) {
        self.visible = false;
        self.registry.pause_all(&mut self.scheduler);
    }

    pub fn resume_all(&mut self) {
        self.visible = true;
        // the paused gap is not a slow frame
        self.governor.restart_window();
        self.registry.resume_all(&mut self.scheduler);
    }

    pub fn destroy_all(&mut self) {
        self.registry.destroy_all(&mut self.document, &mut self.scheduler);
    }

    pub fn document(&self) -> &PageDocument {
        &self.document
    }

    pub fn registry(&self) -> &InstanceRegistry {
        &self.registry
    }

    pub fn governor(&self) -> &PerformanceGovernor {
        &self.governor
    }

    pub fn scheduler(&self) -> &FrameScheduler<InstanceKey> {
        &self.scheduler
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn stats(&self) -> PageStats {
        PageStats {
            name: self.document.name.clone(),
            performance: self.governor.level().as_str(),
            fps: self.governor.last_fps(),
            visible: self.visible,
            pending_frames: self.scheduler.pending_count(),
            total_particles: self.registry.total_particles(),
            instances: self.registry.stats(),
        }
    }
}
