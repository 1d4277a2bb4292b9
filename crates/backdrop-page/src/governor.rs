//! Performance governor: static device assessment plus a frame-rate watchdog

use backdrop_particles::MOBILE_BREAKPOINT;
use backdrop_runtime::FpsCounter;
use std::fmt;

/// Frame rate below which a running page degrades
pub const FPS_FLOOR: f64 = 30.0;
/// Length of one frame-rate sampling window
pub const SAMPLE_WINDOW_MS: f64 = 1000.0;
/// Particle-count multiplier applied once when the frame rate drops
pub const MITIGATION_FACTOR: f32 = 0.6;
/// Device memory below which the page starts in low-performance mode
pub const LOW_MEMORY_GB: f32 = 4.0;

/// Effective connection type reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionClass {
    Slow2g,
    TwoG,
    ThreeG,
    FourG,
    Unknown,
}

impl ConnectionClass {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "slow-2g" => ConnectionClass::Slow2g,
            "2g" => ConnectionClass::TwoG,
            "3g" => ConnectionClass::ThreeG,
            "4g" => ConnectionClass::FourG,
            _ => ConnectionClass::Unknown,
        }
    }
}

/// Device capabilities known at startup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceHints {
    pub has_canvas: bool,
    pub viewport_width: f32,
    /// None when the host does not report memory
    pub memory_gb: Option<f32>,
    pub connection: ConnectionClass,
}

impl Default for DeviceHints {
    fn default() -> Self {
        Self {
            has_canvas: true,
            viewport_width: 1920.0,
            memory_gb: None,
            connection: ConnectionClass::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerformanceLevel {
    High,
    Low,
}

impl PerformanceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PerformanceLevel::High => "high",
            PerformanceLevel::Low => "low",
        }
    }
}

/// Why the governor is in low-performance mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Downgrade {
    NoCanvas,
    SmallViewport(f32),
    LowMemory(f32),
    SlowConnection,
    LowFrameRate(f64),
}

impl fmt::Display for Downgrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Downgrade::NoCanvas => write!(f, "no 2D drawing context"),
            Downgrade::SmallViewport(w) => {
                write!(f, "viewport {w}px is below {MOBILE_BREAKPOINT}px")
            }
            Downgrade::LowMemory(gb) => write!(f, "{gb} GB device memory is below {LOW_MEMORY_GB} GB"),
            Downgrade::SlowConnection => write!(f, "slow-2g connection"),
            Downgrade::LowFrameRate(fps) => write!(f, "{fps:.1} fps is below {FPS_FLOOR}"),
        }
    }
}

/// One-time mitigation requested when the frame rate drops
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mitigation {
    /// Multiplier for every instance's particle count
    pub scale: f32,
    /// The measured frame rate that triggered it
    pub fps: f64,
}

/// Decides whether particles run at all, and degrades them once if frames get slow.
/// Never upgrades back to high performance.
pub struct PerformanceGovernor {
    level: PerformanceLevel,
    reasons: Vec<Downgrade>,
    fps: FpsCounter,
}

impl PerformanceGovernor {
    /// Start at high performance and downgrade on any weak capability
    pub fn assess(hints: &DeviceHints) -> Self {
        let mut reasons = Vec::new();
        if !hints.has_canvas {
            reasons.push(Downgrade::NoCanvas);
        }
        if hints.viewport_width < MOBILE_BREAKPOINT {
            reasons.push(Downgrade::SmallViewport(hints.viewport_width));
        }
        if let Some(gb) = hints.memory_gb {
            if gb < LOW_MEMORY_GB {
                reasons.push(Downgrade::LowMemory(gb));
            }
        }
        if hints.connection == ConnectionClass::Slow2g {
            reasons.push(Downgrade::SlowConnection);
        }

        let level = if reasons.is_empty() {
            PerformanceLevel::High
        } else {
            PerformanceLevel::Low
        };
        tracing::info!(level = level.as_str(), downgrades = reasons.len(), "assessed device");

        Self {
            level,
            reasons,
            fps: FpsCounter::new(SAMPLE_WINDOW_MS),
        }
    }

    pub fn level(&self) -> PerformanceLevel {
        self.level
    }

    pub fn is_high_performance(&self) -> bool {
        self.level == PerformanceLevel::High
    }

    pub fn reasons(&self) -> &[Downgrade] {
        &self.reasons
    }

    pub fn last_fps(&self) -> Option<f64> {
        self.fps.last_fps()
    }

    /// Record one rendered frame at `now_ms`. Returns the mitigation exactly once,
    /// on the first closed window below the floor while still high-performance.
    pub fn sample(&mut self, now_ms: f64) -> Option<Mitigation> {
        let fps = self.fps.tick(now_ms)?;
        if fps >= FPS_FLOOR || !self.is_high_performance() {
            return None;
        }

        self.level = PerformanceLevel::Low;
        self.reasons.push(Downgrade::LowFrameRate(fps));
        tracing::info!(fps, scale = MITIGATION_FACTOR, "frame rate below floor, reducing particles");
        Some(Mitigation {
            scale: MITIGATION_FACTOR,
            fps,
        })
    }

    /// Forget the open sampling window (the loop was paused, so the gap is not a slow frame)
    pub fn restart_window(&mut self) {
        self.fps.reset();
    }
}
