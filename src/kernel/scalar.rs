//! Scalar reference kernel for unmasked ZNCC.

use crate::image::ImageView;
use crate::kernel::{better, Peak, ScanParams};
use crate::template::TemplatePlan;
use crate::util::{OnsightError, OnsightResult};

/// Checks that the template fits and returns the maximum placement `(x, y)`.
pub(crate) fn placement_bounds(
    image: ImageView<'_, u8>,
    tpl: &TemplatePlan,
) -> OnsightResult<(usize, usize)> {
    let img_width = image.width();
    let img_height = image.height();
    let tpl_width = tpl.width();
    let tpl_height = tpl.height();
    if img_width < tpl_width || img_height < tpl_height {
        return Err(OnsightError::TemplateLargerThanScreen {
            tpl_width,
            tpl_height,
            img_width,
            img_height,
        });
    }
    Ok((img_width - tpl_width, img_height - tpl_height))
}

/// Computes the ZNCC score with the template's top-left corner at `(x, y)`.
///
/// Returns `None` for out-of-range placements and for windows flatter than
/// `min_var_i`.
pub fn score_at(
    image: ImageView<'_, u8>,
    tpl: &TemplatePlan,
    x: usize,
    y: usize,
    min_var_i: f32,
) -> Option<f32> {
    let tpl_width = tpl.width();
    let tpl_height = tpl.height();
    let t_prime = tpl.t_prime();
    let n = (tpl_width * tpl_height) as f64;

    let mut dot = 0.0f64;
    let mut sum_i = 0.0f64;
    let mut sum_i2 = 0.0f64;
    for ty in 0..tpl_height {
        let img_row = image.row(y + ty)?;
        let window = img_row.get(x..x + tpl_width)?;
        let base = ty * tpl_width;
        for (tx, &pixel) in window.iter().enumerate() {
            let value = pixel as f64;
            dot += t_prime[base + tx] as f64 * value;
            sum_i += value;
            sum_i2 += value * value;
        }
    }

    let var_i = sum_i2 - (sum_i * sum_i) / n;
    if var_i <= min_var_i as f64 {
        return None;
    }
    let score = (dot / (tpl.var_t() as f64 * var_i).sqrt()) as f32;
    score.is_finite().then_some(score)
}

/// Scans every valid placement and returns the best-scoring one.
pub fn best_match(
    image: ImageView<'_, u8>,
    tpl: &TemplatePlan,
    params: ScanParams,
) -> OnsightResult<Option<Peak>> {
    let (max_x, max_y) = placement_bounds(image, tpl)?;
    let mut best = None;
    for y in 0..=max_y {
        for x in 0..=max_x {
            if let Some(score) = score_at(image, tpl, x, y, params.min_var_i) {
                best = better(best, Peak { x, y, score });
            }
        }
    }
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::OwnedImage;

    fn textured(width: usize, height: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push((((x * 13) ^ (y * 7) ^ (x * y)) & 0xFF) as u8);
            }
        }
        data
    }

    fn patch(src: &[u8], src_width: usize, x0: usize, y0: usize, w: usize, h: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(w * h);
        for y in 0..h {
            let start = (y0 + y) * src_width + x0;
            out.extend_from_slice(&src[start..start + w]);
        }
        out
    }

    #[test]
    fn best_match_finds_exact_patch() {
        let image = OwnedImage::new(textured(64, 48), 64, 48).unwrap();
        let tpl_data = patch(image.data(), 64, 21, 13, 12, 10);
        let tpl = OwnedImage::new(tpl_data, 12, 10).unwrap();
        let plan = TemplatePlan::from_view(tpl.view()).unwrap();

        let peak = best_match(image.view(), &plan, ScanParams::default())
            .unwrap()
            .unwrap();
        assert_eq!((peak.x, peak.y), (21, 13));
        assert!(peak.score > 0.999);
    }

    #[test]
    fn oversized_template_is_rejected() {
        let image = OwnedImage::new(textured(8, 8), 8, 8).unwrap();
        let tpl = OwnedImage::new(textured(10, 4), 10, 4).unwrap();
        let plan = TemplatePlan::from_view(tpl.view()).unwrap();
        let err = best_match(image.view(), &plan, ScanParams::default()).unwrap_err();
        assert_eq!(
            err,
            OnsightError::TemplateLargerThanScreen {
                tpl_width: 10,
                tpl_height: 4,
                img_width: 8,
                img_height: 8,
            }
        );
    }

    #[test]
    fn flat_windows_are_skipped() {
        let image = OwnedImage::new(vec![7u8; 16 * 16], 16, 16).unwrap();
        let tpl = OwnedImage::new(textured(4, 4), 4, 4).unwrap();
        let plan = TemplatePlan::from_view(tpl.view()).unwrap();
        let best = best_match(image.view(), &plan, ScanParams::default()).unwrap();
        assert!(best.is_none());
    }
}
