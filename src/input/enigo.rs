//! Real pointer input via `enigo`.
//!
//! macOS requires the Accessibility permission; Linux requires X11 or a
//! Wayland compositor with input emulation.

use super::{Point, Pointer};
use crate::trace::trace_event;
use crate::util::{OnsightError, OnsightResult};
use enigo::{Button, Coordinate, Direction, Enigo, Mouse, Settings};
use std::sync::Mutex;

/// Pointer backed by an `enigo` connection.
pub struct EnigoPointer {
    // Enigo is Send but not Sync.
    enigo: Mutex<Enigo>,
}

impl EnigoPointer {
    /// Opens an input connection with default settings.
    pub fn new() -> OnsightResult<Self> {
        let enigo = Enigo::new(&Settings::default()).map_err(input_err)?;
        Ok(Self {
            enigo: Mutex::new(enigo),
        })
    }
}

impl Pointer for EnigoPointer {
    fn click(&self, at: Point) -> OnsightResult<()> {
        trace_event!(DEBUG, "enigo click", x = at.x, y = at.y);
        let mut enigo = self.enigo.lock().map_err(|_| OnsightError::Input {
            reason: "input connection lock poisoned".to_string(),
        })?;
        enigo
            .move_mouse(at.x, at.y, Coordinate::Abs)
            .map_err(input_err)?;
        enigo.button(Button::Left, Direction::Click).map_err(input_err)?;
        Ok(())
    }
}

fn input_err(err: impl std::fmt::Display) -> OnsightError {
    OnsightError::Input {
        reason: err.to_string(),
    }
}
