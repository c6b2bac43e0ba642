use std::cmp::Ordering;

use crate::locator::locator_model::{Locator, Strategy};
use crate::locator::scoring::ScoringConfig;

/// Score every locator independently and sort by confidence descending.
///
/// The sort is stable, so the generator's emission order is the tie-break.
pub fn rank(locators: Vec<Locator>, config: &ScoringConfig) -> Vec<Locator> {
    let mut ranked: Vec<Locator> = locators
        .into_iter()
        .map(|mut locator| {
            locator.confidence = score(&locator, config);
            locator
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });
    ranked
}

/// Weighted sum of per-family base sub-scores with two multiplicative
/// value penalties (dynamic-looking value, over-long value).
fn score(locator: &Locator, config: &ScoringConfig) -> f32 {
    let mut sub = config.base(locator.strategy);

    if locator.strategy == Strategy::Css && is_bare_tag(&locator.value) {
        // Matches every element with that tag name on a real page
        sub.uniqueness = config.bare_tag_uniqueness;
        sub.stability = config.bare_tag_stability;
    }

    if config.is_dynamic(&locator.value) {
        sub.stability *= config.dynamic_stability_penalty;
    }

    if locator.value.len() > config.long_value_len {
        sub.readability *= config.long_value_readability_penalty;
        sub.stability *= config.long_value_stability_penalty;
    }

    let w = config.weights;
    (w.uniqueness * sub.uniqueness + w.stability * sub.stability + w.readability * sub.readability)
        .clamp(0.0, 1.0)
}

fn is_bare_tag(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric())
}
