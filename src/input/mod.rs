//! Pointer input.

use crate::trace::trace_event;
use crate::util::OnsightResult;

#[cfg(feature = "enigo")]
mod enigo;

#[cfg(feature = "enigo")]
pub use self::enigo::EnigoPointer;

/// Absolute desktop coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Point {
    /// Horizontal position in desktop pixels.
    pub x: i32,
    /// Vertical position in desktop pixels.
    pub y: i32,
}

/// Delivers pointer clicks to the desktop.
pub trait Pointer {
    /// Moves to `at` and clicks the primary button.
    fn click(&self, at: Point) -> OnsightResult<()>;
}

impl<P: Pointer + ?Sized> Pointer for &P {
    fn click(&self, at: Point) -> OnsightResult<()> {
        (**self).click(at)
    }
}

/// Logs clicks without performing them (dry runs).
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopPointer;

impl Pointer for NoopPointer {
    fn click(&self, at: Point) -> OnsightResult<()> {
        trace_event!(DEBUG, "noop click", x = at.x, y = at.y);
        Ok(())
    }
}
