//! Template plan precomputation for ZNCC scoring.

use crate::image::ImageView;
use crate::util::{OnsightError, OnsightResult};

/// Precomputed zero-mean buffer and energy of a grayscale template.
#[derive(Clone, Debug)]
pub struct TemplatePlan {
    width: usize,
    height: usize,
    zero_mean: Vec<f32>,
    var_t: f32,
}

impl TemplatePlan {
    /// Builds a plan from a template view.
    ///
    /// Fails with [`OnsightError::DegenerateTemplate`] for a flat template,
    /// since ZNCC is undefined when the template has no variance.
    pub fn from_view(tpl: ImageView<'_, u8>) -> OnsightResult<Self> {
        let width = tpl.width();
        let height = tpl.height();
        let count = width
            .checked_mul(height)
            .ok_or(OnsightError::InvalidDimensions { width, height })?;

        let mut sum = 0.0f64;
        for y in 0..height {
            let row = row_of(tpl, y)?;
            sum += row.iter().map(|&v| v as f64).sum::<f64>();
        }
        let mean = sum / count as f64;

        let mut zero_mean = Vec::with_capacity(count);
        let mut energy = 0.0f64;
        for y in 0..height {
            for &value in row_of(tpl, y)? {
                let centered = value as f64 - mean;
                energy += centered * centered;
                zero_mean.push(centered as f32);
            }
        }
        if energy <= 1e-8 {
            return Err(OnsightError::DegenerateTemplate {
                reason: "zero variance",
            });
        }

        Ok(Self {
            width,
            height,
            zero_mean,
            var_t: energy as f32,
        })
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Zero-mean template samples in row-major order.
    pub fn t_prime(&self) -> &[f32] {
        &self.zero_mean
    }

    /// Sum of squared zero-mean samples.
    pub fn var_t(&self) -> f32 {
        self.var_t
    }
}

fn row_of<'a>(tpl: ImageView<'a, u8>, y: usize) -> OnsightResult<&'a [u8]> {
    tpl.row(y).ok_or(OnsightError::BufferTooSmall {
        needed: (y + 1).saturating_mul(tpl.width()),
        got: 0,
    })
}
