//! Ratio allocator: splits a reaction count into positive / neutral / reduced.

use serde::{Deserialize, Serialize};

/// Split used whenever the supplied percentages don't add up to 100.
pub const DEFAULT_POLICY: RatioPolicy = RatioPolicy {
    positive: 50,
    neutral: 30,
    reduced: 20,
};

/// User-adjustable percentage policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatioPolicy {
    pub positive: u32,
    pub neutral: u32,
    pub reduced: u32,
}

impl Default for RatioPolicy {
    fn default() -> Self {
        DEFAULT_POLICY
    }
}

impl RatioPolicy {
    pub fn sum(&self) -> u32 {
        self.positive
            .saturating_add(self.neutral)
            .saturating_add(self.reduced)
    }

    /// True when the percentages add up to exactly 100.
    pub fn is_balanced(&self) -> bool {
        self.sum() == 100
    }

    /// Rejects any percentage above 100. Out-of-range values are reported,
    /// never clamped.
    pub fn check_bounds(&self) -> Result<(), String> {
        for (name, value) in [
            ("positive", self.positive),
            ("neutral", self.neutral),
            ("reduced", self.reduced),
        ] {
            if value > 100 {
                return Err(format!(
                    "{name} ratio must be between 0 and 100, got {value}"
                ));
            }
        }
        Ok(())
    }
}

/// Hard per-category counts. `positive + neutral + reduced` is the requested total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmotionDistribution {
    pub positive: u32,
    pub neutral: u32,
    pub reduced: u32,
}

impl EmotionDistribution {
    pub fn total(&self) -> u32 {
        self.positive + self.neutral + self.reduced
    }
}

/// Allocates `count` reactions across the three categories.
///
/// An unbalanced policy is ignored in favour of [`DEFAULT_POLICY`]. Positive
/// and neutral shares are rounded half-to-even; reduced takes whatever is
/// left, so it absorbs all rounding error. Neutral is capped at what positive
/// leaves over, which keeps the remainder non-negative (e.g. 3 at 50/50/0
/// yields 2/1/0).
///
/// Callers reject percentages outside [0, 100] (see [`RatioPolicy::check_bounds`])
/// before calling; the allocator uses the values as given.
pub fn allocate(count: u32, policy: RatioPolicy) -> EmotionDistribution {
    let effective = if policy.is_balanced() {
        policy
    } else {
        DEFAULT_POLICY
    };

    let positive = share(count, effective.positive);
    let neutral = share(count, effective.neutral).min(count - positive);

    EmotionDistribution {
        positive,
        neutral,
        reduced: count - positive - neutral,
    }
}

/// `round_half_even(count * percent / 100)` in exact integer arithmetic,
/// never more than `count`.
fn share(count: u32, percent: u32) -> u32 {
    let scaled = u64::from(count) * u64::from(percent);
    let (quotient, remainder) = (scaled / 100, scaled % 100);
    let rounded = if remainder > 50 || (remainder == 50 && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    };
    rounded.min(u64::from(count)) as u32
}
