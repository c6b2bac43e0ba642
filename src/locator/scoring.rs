use regex::Regex;

use crate::locator::locator_model::Strategy;

/// Per-strategy base sub-scores. Each is in [0,1] and expresses how the
/// strategy family behaves on a real page before value-level penalties.
#[derive(Debug, Clone, Copy)]
pub struct SubScores {
    pub uniqueness: f32,
    pub stability: f32,
    pub readability: f32,
}

/// Weights of the three sub-scores in the final confidence sum.
#[derive(Debug, Clone, Copy)]
pub struct Weights {
    pub uniqueness: f32,
    pub stability: f32,
    pub readability: f32,
}

/// All tunable scoring inputs in one place: sub-score weights, per-family
/// base scores, the dynamic-value pattern family, and the value-level
/// penalty factors. The generator and ranker take this by reference and
/// contain no scoring constants of their own.
#[derive(Debug)]
pub struct ScoringConfig {
    pub weights: Weights,
    /// Values matching any of these look framework-generated and will not
    /// survive markup churn (autogenerated ids, scoped-style hashes, long
    /// hex/decimal runs).
    pub dynamic_patterns: Vec<Regex>,
    /// Stability multiplier for any value the dynamic filter flags.
    pub dynamic_stability_penalty: f32,
    /// Values longer than this get the long-value penalties.
    pub long_value_len: usize,
    pub long_value_readability_penalty: f32,
    pub long_value_stability_penalty: f32,
    /// Overrides for a structural selector that is nothing but a tag name.
    pub bare_tag_uniqueness: f32,
    pub bare_tag_stability: f32,
    /// How many stable class names a composed selector may use.
    pub max_composed_classes: usize,
}

const DYNAMIC_PATTERNS: &[&str] = &[
    // Framework-autogenerated identifier prefixes
    r"^(?:ng|ember|react|vue|svelte|radix|headlessui)-",
    // Ember-style counter ids ("ember472")
    r"^ember\d+",
    // React useId tokens (":r1a:")
    r"^:r[0-9a-z]+:$",
    // Scoped-style / CSS-in-JS class prefixes
    r"^(?:css|jss|sc|styled)-",
    // Long hexadecimal runs (build hashes, uuids)
    r"[0-9a-f]{8,}",
    // Long decimal runs (timestamps, sequence ids)
    r"[0-9]{5,}",
];

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            weights: Weights {
                uniqueness: 0.40,
                stability: 0.35,
                readability: 0.25,
            },
            dynamic_patterns: DYNAMIC_PATTERNS
                .iter()
                .map(|p| Regex::new(p).expect("built-in dynamic pattern must compile"))
                .collect(),
            dynamic_stability_penalty: 0.3,
            long_value_len: 100,
            long_value_readability_penalty: 0.5,
            long_value_stability_penalty: 0.7,
            bare_tag_uniqueness: 0.15,
            bare_tag_stability: 0.20,
            max_composed_classes: 3,
        }
    }
}

impl ScoringConfig {
    /// Whether a value looks framework-generated.
    pub fn is_dynamic(&self, value: &str) -> bool {
        self.dynamic_patterns.iter().any(|p| p.is_match(value))
    }

    /// Base sub-scores for a strategy family.
    pub fn base(&self, strategy: Strategy) -> SubScores {
        match strategy {
            Strategy::Id => sub(0.95, 0.90, 0.95),
            Strategy::TestAttribute => sub(0.95, 0.95, 0.90),
            Strategy::Name => sub(0.85, 0.85, 0.90),
            Strategy::AriaLabel => sub(0.80, 0.85, 0.85),
            Strategy::Label => sub(0.75, 0.80, 0.90),
            Strategy::Role => sub(0.60, 0.75, 0.80),
            Strategy::Placeholder => sub(0.70, 0.75, 0.85),
            Strategy::ContentText => sub(0.70, 0.65, 0.95),
            Strategy::IndexedText => sub(0.75, 0.50, 0.70),
            Strategy::Css => sub(0.65, 0.55, 0.60),
            Strategy::CssPath => sub(0.70, 0.35, 0.40),
            Strategy::XPath => sub(0.80, 0.25, 0.30),
        }
    }
}

fn sub(uniqueness: f32, stability: f32, readability: f32) -> SubScores {
    SubScores {
        uniqueness,
        stability,
        readability,
    }
}
