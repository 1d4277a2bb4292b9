//! CLI command implementations

pub mod init;
pub mod inspect;
pub mod preset;
pub mod render;
pub mod run;

use backdrop_page::{Mitigation, Page};

/// Drive `page` for `frames` host frames at a synthetic `fps`.
/// Returns the frame index and details of a governor mitigation, if one happened.
pub(crate) fn drive(page: &mut Page, frames: u32, fps: f64) -> Option<(u32, Mitigation)> {
    let step = 1000.0 / fps.max(1.0);
    let mut mitigation = None;
    for frame in 0..frames {
        let report = page.tick(frame as f64 * step);
        if let Some(m) = report.mitigation {
            mitigation = Some((frame, m));
        }
    }
    mitigation
}
