//! Correlation kernels scoring a template plan against a capture.
//!
//! Kernels return only the single best placement; a locator asks one
//! question per attempt ("is the template here at this confidence?").

use std::cmp::Ordering;

pub mod scalar;

#[cfg(feature = "rayon")]
pub mod rayon;

/// Best placement of a template inside an image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Peak {
    /// X coordinate (column) of the template's top-left corner.
    pub x: usize,
    /// Y coordinate (row) of the template's top-left corner.
    pub y: usize,
    /// ZNCC score in `[-1, 1]`.
    pub score: f32,
}

/// Scan configuration.
#[derive(Clone, Copy, Debug)]
pub struct ScanParams {
    /// Minimum variance of the image window; flatter windows are skipped.
    pub min_var_i: f32,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self { min_var_i: 1e-3 }
    }
}

/// Orders peaks so that the preferred one compares as `Less`: higher score
/// first, then top-most, then left-most.
pub(crate) fn peak_cmp_desc(a: &Peak, b: &Peak) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.y.cmp(&b.y))
        .then_with(|| a.x.cmp(&b.x))
}

/// Keeps the preferred of two optional peaks.
pub(crate) fn better(current: Option<Peak>, candidate: Peak) -> Option<Peak> {
    match current {
        Some(best) if peak_cmp_desc(&best, &candidate) != Ordering::Greater => Some(best),
        _ => Some(candidate),
    }
}
