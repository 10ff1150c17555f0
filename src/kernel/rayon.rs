//! Rayon-parallel scan (feature-gated).
//!
//! Parallelizes placements over rows; each worker keeps its own best peak and
//! the per-row winners are reduced with the same ordering as the scalar scan,
//! so both produce identical results.

use crate::image::ImageView;
use crate::kernel::scalar::{placement_bounds, score_at};
use crate::kernel::{better, Peak, ScanParams};
use crate::template::TemplatePlan;
use crate::util::OnsightResult;
use rayon::prelude::*;

/// Row-parallel equivalent of [`scalar::best_match`](crate::kernel::scalar::best_match).
pub fn best_match_par(
    image: ImageView<'_, u8>,
    tpl: &TemplatePlan,
    params: ScanParams,
) -> OnsightResult<Option<Peak>> {
    let (max_x, max_y) = placement_bounds(image, tpl)?;
    let best = (0..=max_y)
        .into_par_iter()
        .filter_map(|y| {
            let mut row_best = None;
            for x in 0..=max_x {
                if let Some(score) = score_at(image, tpl, x, y, params.min_var_i) {
                    row_best = better(row_best, Peak { x, y, score });
                }
            }
            row_best
        })
        .reduce_with(|a, b| better(Some(a), b).unwrap_or(a));
    Ok(best)
}
