//! Grayscale image views and owned buffers.
//!
//! Screen captures and templates are both reduced to 8-bit grayscale,
//! contiguous row-major buffers before scoring. `ImageView` borrows one of
//! them row by row.

use crate::util::{OnsightError, OnsightResult};

#[cfg(feature = "image-io")]
pub mod io;

/// Borrowed row-major view of an [`OwnedImage`].
#[derive(Copy, Clone)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns row `y`, or `None` past the last row.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.width)?;
        let end = start.checked_add(self.width)?;
        self.data.get(start..end)
    }
}

/// Owned contiguous grayscale image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnedImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl OwnedImage {
    /// Wraps a contiguous row-major buffer.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> OnsightResult<Self> {
        let needed = pixel_count(width, height)?;
        if data.len() < needed {
            return Err(OnsightError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Converts packed RGBA bytes to grayscale using Rec. 601 luma weights.
    pub fn from_rgba(rgba: &[u8], width: usize, height: usize) -> OnsightResult<Self> {
        let needed = pixel_count(width, height)?
            .checked_mul(4)
            .ok_or(OnsightError::InvalidDimensions { width, height })?;
        if rgba.len() < needed {
            return Err(OnsightError::BufferTooSmall {
                needed,
                got: rgba.len(),
            });
        }
        let data = rgba[..needed]
            .chunks_exact(4)
            .map(|px| {
                let luma = 299 * px[0] as u32 + 587 * px[1] as u32 + 114 * px[2] as u32;
                ((luma + 500) / 1000) as u8
            })
            .collect();
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns a borrowed view of the pixels.
    pub fn view(&self) -> ImageView<'_, u8> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
        }
    }

    /// Returns the raw pixel buffer.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }
}

fn pixel_count(width: usize, height: usize) -> OnsightResult<usize> {
    if width == 0 || height == 0 {
        return Err(OnsightError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(OnsightError::InvalidDimensions { width, height })
}
