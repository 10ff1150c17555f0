//! Descending ladder of similarity thresholds.

use crate::trace::trace_event;
use crate::util::{OnsightError, OnsightResult};

/// Default level adopted when a rejected value is passed to
/// [`SimilarityLadder::set_default`].
pub const FALLBACK_SIMILARITY: f32 = 0.8;

/// Lower levels tried after the default, highest first.
pub const DEFAULT_FALLBACK_LEVELS: [f32; 4] = [0.7, 0.6, 0.5, 0.4];

/// Thresholds tried in strictly descending order: the configurable default
/// first, then every fallback level below it.
#[derive(Clone, Debug, PartialEq)]
pub struct SimilarityLadder {
    default: f32,
    fallbacks: Vec<f32>,
}

impl SimilarityLadder {
    /// Builds a ladder, rejecting any value outside `[0.0, 1.0]`.
    ///
    /// Fallback levels may be given in any order; duplicates collapse.
    pub fn new(default: f32, fallbacks: impl IntoIterator<Item = f32>) -> OnsightResult<Self> {
        check_range(default)?;
        let mut fallbacks = fallbacks
            .into_iter()
            .map(check_range)
            .collect::<OnsightResult<Vec<_>>>()?;
        fallbacks.sort_by(|a, b| b.total_cmp(a));
        fallbacks.dedup();
        Ok(Self { default, fallbacks })
    }

    /// Returns the default (highest-priority) level.
    pub fn default_level(&self) -> f32 {
        self.default
    }

    /// Replaces the default level.
    ///
    /// Out-of-range or NaN input is not an error: the default becomes
    /// [`FALLBACK_SIMILARITY`] instead. Returns the level now in effect.
    pub fn set_default(&mut self, value: f32) -> f32 {
        if check_range(value).is_ok() {
            self.default = value;
            trace_event!(INFO, "similarity threshold set", similarity = value);
        } else {
            trace_event!(
                WARN,
                "similarity out of range, using fallback",
                rejected = value,
                fallback = FALLBACK_SIMILARITY
            );
            self.default = FALLBACK_SIMILARITY;
        }
        self.default
    }

    /// Returns the levels to try, highest first.
    ///
    /// Fallback levels at or above the default are skipped so the sequence
    /// stays strictly descending whatever the default is set to.
    pub fn levels(&self) -> Vec<f32> {
        let default = self.default;
        std::iter::once(default)
            .chain(self.fallbacks.iter().copied().filter(|&l| l < default))
            .collect()
    }
}

impl Default for SimilarityLadder {
    fn default() -> Self {
        Self {
            default: FALLBACK_SIMILARITY,
            fallbacks: DEFAULT_FALLBACK_LEVELS.to_vec(),
        }
    }
}

fn check_range(value: f32) -> OnsightResult<f32> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(OnsightError::InvalidSimilarity { value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ladder_is_descending() {
        assert_eq!(
            SimilarityLadder::default().levels(),
            vec![0.8, 0.7, 0.6, 0.5, 0.4]
        );
    }

    #[test]
    fn new_sorts_and_dedups_fallbacks() {
        let ladder = SimilarityLadder::new(0.9, [0.5, 0.7, 0.5, 0.3]).unwrap();
        assert_eq!(ladder.levels(), vec![0.9, 0.7, 0.5, 0.3]);
    }

    #[test]
    fn new_rejects_out_of_range_levels() {
        assert_eq!(
            SimilarityLadder::new(0.8, [0.7, 1.2]).unwrap_err(),
            OnsightError::InvalidSimilarity { value: 1.2 }
        );
        assert!(SimilarityLadder::new(f32::NAN, []).is_err());
    }

    #[test]
    fn low_default_drops_higher_fallbacks() {
        let mut ladder = SimilarityLadder::default();
        assert_eq!(ladder.set_default(0.55), 0.55);
        assert_eq!(ladder.levels(), vec![0.55, 0.5, 0.4]);
    }

    #[test]
    fn set_default_degrades_to_fallback() {
        let mut ladder = SimilarityLadder::new(0.6, DEFAULT_FALLBACK_LEVELS).unwrap();
        assert_eq!(ladder.set_default(-0.1), FALLBACK_SIMILARITY);
        ladder.set_default(0.6);
        assert_eq!(ladder.set_default(1.5), FALLBACK_SIMILARITY);
        ladder.set_default(0.6);
        assert_eq!(ladder.set_default(f32::NAN), FALLBACK_SIMILARITY);
        assert_eq!(ladder.default_level(), FALLBACK_SIMILARITY);
    }

    #[test]
    fn bounds_are_accepted() {
        let mut ladder = SimilarityLadder::default();
        assert_eq!(ladder.set_default(0.0), 0.0);
        assert_eq!(ladder.levels(), vec![0.0]);
        assert_eq!(ladder.set_default(1.0), 1.0);
        assert_eq!(ladder.levels(), vec![1.0, 0.7, 0.6, 0.5, 0.4]);
    }
}
