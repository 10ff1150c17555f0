//! Screen capture sources.

use crate::image::OwnedImage;
use crate::primitive::Region;
use crate::util::OnsightResult;

#[cfg(feature = "xcap")]
mod xcap;

#[cfg(feature = "xcap")]
pub use self::xcap::XcapScreen;

/// A grayscale capture plus its placement on the desktop.
///
/// Pixels are physical; desktop coordinates (where the pointer moves) are
/// logical. `scale` is the number of physical pixels per logical unit.
#[derive(Clone, Debug)]
pub struct Screenshot {
    /// Captured pixels.
    pub image: OwnedImage,
    /// Desktop X coordinate of pixel `(0, 0)`.
    pub origin_x: i32,
    /// Desktop Y coordinate of pixel `(0, 0)`.
    pub origin_y: i32,
    /// Display scale factor, 1.0 on unscaled displays.
    pub scale: f32,
}

impl Screenshot {
    /// Wraps an unscaled image captured at the desktop origin.
    pub fn at_origin(image: OwnedImage) -> Self {
        Self {
            image,
            origin_x: 0,
            origin_y: 0,
            scale: 1.0,
        }
    }

    /// Maps a pixel rectangle of the capture to desktop coordinates.
    pub fn desktop_region(&self, x: usize, y: usize, width: usize, height: usize) -> Region {
        // Unusable scale factors are treated as unscaled.
        let scale = if self.scale.is_finite() && self.scale > 0.0 {
            self.scale
        } else {
            1.0
        };
        let logical = |v: usize| (v as f32 / scale).round();
        Region {
            x: self.origin_x + logical(x) as i32,
            y: self.origin_y + logical(y) as i32,
            width: logical(width).max(1.0) as u32,
            height: logical(height).max(1.0) as u32,
        }
    }
}

/// Produces the current screen contents on demand.
pub trait ScreenSource {
    /// Captures the screen once.
    fn capture(&self) -> OnsightResult<Screenshot>;
}

/// A screen that never changes; used for offline searches and tests.
#[derive(Clone, Debug)]
pub struct StaticScreen {
    shot: Screenshot,
}

impl StaticScreen {
    /// Serves `image` as if captured unscaled at the desktop origin.
    pub fn new(image: OwnedImage) -> Self {
        Self {
            shot: Screenshot::at_origin(image),
        }
    }

    /// Places the image on the desktop at `(origin_x, origin_y)` with the
    /// given display scale factor.
    pub fn with_placement(mut self, origin_x: i32, origin_y: i32, scale: f32) -> Self {
        self.shot.origin_x = origin_x;
        self.shot.origin_y = origin_y;
        self.shot.scale = scale;
        self
    }
}

impl ScreenSource for StaticScreen {
    fn capture(&self) -> OnsightResult<Screenshot> {
        Ok(self.shot.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shot(scale: f32) -> Screenshot {
        let image = OwnedImage::new(vec![0; 16], 4, 4).unwrap();
        Screenshot {
            image,
            origin_x: -1920,
            origin_y: 40,
            scale,
        }
    }

    #[test]
    fn unscaled_pixels_are_offset_by_origin() {
        assert_eq!(
            shot(1.0).desktop_region(400, 200, 30, 12),
            Region {
                x: -1520,
                y: 240,
                width: 30,
                height: 12
            }
        );
    }

    #[test]
    fn scaled_pixels_map_to_logical_units() {
        assert_eq!(
            shot(2.0).desktop_region(400, 200, 30, 12),
            Region {
                x: -1720,
                y: 140,
                width: 15,
                height: 6
            }
        );
        assert_eq!(
            shot(1.5).desktop_region(300, 150, 1, 1),
            Region {
                x: -1720,
                y: 140,
                width: 1,
                height: 1
            }
        );
    }

    #[test]
    fn bad_scale_is_ignored() {
        assert_eq!(shot(0.0).desktop_region(5, 6, 7, 8), shot(1.0).desktop_region(5, 6, 7, 8));
        assert_eq!(
            shot(f32::NAN).desktop_region(5, 6, 7, 8),
            shot(1.0).desktop_region(5, 6, 7, 8)
        );
    }
}
