//! Token cost derivation and the 5-decimal fixed-point cost value.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub const TOKENS_PER_MILLION: f64 = 1_000_000.0;

/// Fractional digits kept on a cost.
pub const COST_DECIMALS: usize = 5;

/// A monetary amount rounded to [`COST_DECIMALS`] places.
///
/// Rounding runs on the binary `f64`: the scaled value is rounded half away
/// from zero, so a decimal tie that `f64` stores just below the midpoint
/// rounds down (14 tokens at $2.50/M is `"0.00003"`, not `"0.00004"`). This
/// is the same result as JavaScript's `toFixed(5)`.
///
/// Displays and serializes as a fixed-point string, e.g. `"0.00064"`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct FixedCost(f64);

impl FixedCost {
    pub fn from_amount(amount: f64) -> Self {
        let scale = 10f64.powi(COST_DECIMALS as i32);
        Self((amount * scale).round() / scale)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for FixedCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.*}", COST_DECIMALS, self.0)
    }
}

impl Serialize for FixedCost {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FixedCost {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.trim()
            .parse::<f64>()
            .map(FixedCost::from_amount)
            .map_err(|e| de::Error::custom(format!("invalid cost '{}': {}", s, e)))
    }
}

/// `total_tokens / 1e6 * cost_per_million_tokens`, rounded to 5 decimals.
pub fn token_cost(total_tokens: u64, cost_per_million_tokens: f64) -> FixedCost {
    FixedCost::from_amount(total_tokens as f64 / TOKENS_PER_MILLION * cost_per_million_tokens)
}
