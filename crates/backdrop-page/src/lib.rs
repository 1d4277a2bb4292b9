//! Backdrop Page - everything above a single particle instance
//!
//! - `PageDocument`: containers loaded from a TOML page file, laid out against a viewport
//! - `InstanceRegistry`: discovery and fan-out of lifecycle operations to every instance
//! - `PerformanceGovernor`: one-way downgrade from device hints and measured frame rate
//! - `Page`: the context object that owns all of the above and drives ticks

mod document;
mod format;
mod governor;
mod page;
mod registry;

pub use document::{load_page, load_page_string, ContainerNode, Length, PageDocument, Positioning};
pub use format::{ContainerDef, DeviceDef, LengthValue, PageFile, PageMetadata, ViewportDef};
pub use governor::{
    ConnectionClass, DeviceHints, Downgrade, Mitigation, PerformanceGovernor, PerformanceLevel,
    FPS_FLOOR, LOW_MEMORY_GB, MITIGATION_FACTOR, SAMPLE_WINDOW_MS,
};
pub use page::{Page, PageStats, TickReport};
pub use registry::{discover, Discovery, InstanceRegistry};
