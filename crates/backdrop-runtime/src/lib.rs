//! Backdrop Runtime - Frame loop infrastructure
//!
//! Provides the cooperative frame-loop building blocks:
//! - `FrameClock` — host timestamps to per-frame delta and frame count
//! - `FpsCounter` — frames-per-window sampling for performance decisions
//! - `FrameScheduler` — the host's "next frame" primitive with cancellable handles
//! - `PointerState` — container-relative pointer with an inactive sentinel
//! - `PageEvent` / `EventBus` — lifecycle and pointer events queued between frames

mod clock;
mod event;
mod event_bus;
mod input;
mod scheduler;

pub use clock::{FpsCounter, FrameClock};
pub use event::PageEvent;
pub use event_bus::EventBus;
pub use input::PointerState;
pub use scheduler::{FrameHandle, FrameScheduler};
