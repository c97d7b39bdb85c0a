//! Local score generator used when the model can't be reached or understood.

use crate::models::{MoodCategory, MoodScoreMap};
use rand::Rng;
use std::ops::RangeInclusive;

/// Range of the raw per-category draw before normalisation.
pub const RAW_DRAWS: RangeInclusive<u32> = 10..=90;

/// Range of the score forced onto one category.
pub const DOMINANT_SCORES: RangeInclusive<u8> = 70..=95;

/// Plausible, varied scores with one clearly dominant mood.
///
/// Each category draws from [`RAW_DRAWS`] and is scaled to a floored
/// percentage of the sum of all draws. One category chosen uniformly is then
/// overwritten with a draw from [`DOMINANT_SCORES`]. The remaining entries
/// are not rescaled afterwards, so the total is not held to 100.
pub fn generate_fallback_scores<R: Rng + ?Sized>(rng: &mut R) -> MoodScoreMap {
    let draws = MoodCategory::ALL.map(|category| (category, rng.gen_range(RAW_DRAWS)));
    let total: u32 = draws.iter().map(|(_, raw)| raw).sum();

    let mut scores = MoodScoreMap::new();
    for (category, raw) in draws {
        // raw <= total, so the share is at most 100
        scores.set(category, (raw * 100 / total) as u8);
    }

    let dominant = MoodCategory::ALL[rng.gen_range(0..MoodCategory::ALL.len())];
    scores.set(dominant, rng.gen_range(DOMINANT_SCORES));

    scores
}
