//! Primary-monitor capture via `xcap`.

use super::{ScreenSource, Screenshot};
use crate::image::OwnedImage;
use crate::trace::trace_event;
use crate::util::{OnsightError, OnsightResult};
use xcap::Monitor;

/// Captures the primary monitor (or the first one if none is primary).
#[derive(Clone, Copy, Debug, Default)]
pub struct XcapScreen;

impl XcapScreen {
    /// Creates a capture source.
    pub fn new() -> Self {
        Self
    }

    fn primary_monitor() -> OnsightResult<Monitor> {
        let monitors = Monitor::all().map_err(capture_err)?;
        let mut fallback = None;
        for monitor in monitors {
            if monitor.is_primary().unwrap_or(false) {
                return Ok(monitor);
            }
            fallback.get_or_insert(monitor);
        }
        fallback.ok_or_else(|| OnsightError::Capture {
            reason: "no monitor found".to_string(),
        })
    }
}

impl ScreenSource for XcapScreen {
    fn capture(&self) -> OnsightResult<Screenshot> {
        let monitor = Self::primary_monitor()?;
        let origin_x = monitor.x().map_err(capture_err)?;
        let origin_y = monitor.y().map_err(capture_err)?;
        let scale = monitor.scale_factor().map_err(capture_err)?;
        let rgba = monitor.capture_image().map_err(capture_err)?;
        let width = rgba.width() as usize;
        let height = rgba.height() as usize;
        let image = OwnedImage::from_rgba(rgba.as_raw(), width, height)?;
        trace_event!(
            TRACE,
            "screen captured",
            width = width,
            height = height,
            scale = scale
        );
        Ok(Screenshot {
            image,
            origin_x,
            origin_y,
            scale,
        })
    }
}

fn capture_err(err: impl std::fmt::Display) -> OnsightError {
    OnsightError::Capture {
        reason: err.to_string(),
    }
}
