//! The Matching Primitive: one attempt to find a template on screen.
//!
//! [`MatchPrimitive`] is the seam the locator is written against. It answers
//! "is this template visible at this similarity?" either once ([`probe`]) or
//! repeatedly up to a time limit ([`poll_wait`]). [`CorrelationPrimitive`] is
//! the bundled implementation; anything else (a remote device, a recorded
//! session, a test double) can stand in.
//!
//! [`probe`]: MatchPrimitive::probe
//! [`poll_wait`]: MatchPrimitive::poll_wait

use crate::input::Point;
use crate::template::Template;
use crate::util::OnsightResult;
use std::time::Duration;

mod correlation;

pub use correlation::{CorrelationPrimitive, PrimitiveConfig};

/// Screen rectangle in desktop pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Region {
    /// Returns the center point, where a click lands.
    pub fn center(&self) -> Point {
        Point {
            x: self.x + (self.width / 2) as i32,
            y: self.y + (self.height / 2) as i32,
        }
    }
}

/// A template occurrence reported by a primitive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    /// Where the template was found.
    pub region: Region,
    /// Confidence achieved at that location, in `[0, 1]` for real matches.
    pub score: f32,
}

/// Single-attempt and polling template search against the live screen.
///
/// Errors are treated by callers as "no match at this attempt".
pub trait MatchPrimitive {
    /// Searches the current screen once without waiting.
    fn probe(&self, template: &Template, similarity: f32) -> OnsightResult<Option<Hit>>;

    /// Searches repeatedly until a hit or until `max_wait` has elapsed.
    fn poll_wait(
        &self,
        template: &Template,
        similarity: f32,
        max_wait: Duration,
    ) -> OnsightResult<Option<Hit>>;
}

impl<P: MatchPrimitive + ?Sized> MatchPrimitive for &P {
    fn probe(&self, template: &Template, similarity: f32) -> OnsightResult<Option<Hit>> {
        (**self).probe(template, similarity)
    }

    fn poll_wait(
        &self,
        template: &Template,
        similarity: f32,
        max_wait: Duration,
    ) -> OnsightResult<Option<Hit>> {
        (**self).poll_wait(template, similarity, max_wait)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_center_rounds_down() {
        let region = Region {
            x: 10,
            y: 20,
            width: 5,
            height: 8,
        };
        assert_eq!(region.center(), Point { x: 12, y: 24 });
    }
}
