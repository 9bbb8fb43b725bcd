//! Ratio-to-weight lookup for Hough votes.

use crate::util::{FeatVoteError, FeatVoteResult};

/// Weight assigned to ratios in the half-open interval `[lo, hi)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoteRule {
    /// Inclusive lower bound of the ratio interval.
    pub lo: f64,
    /// Exclusive upper bound of the ratio interval.
    pub hi: f64,
    /// Vote weight for ratios inside the interval.
    pub weight: f64,
}

impl VoteRule {
    /// Creates a rule for `[lo, hi)`.
    pub const fn new(lo: f64, hi: f64, weight: f64) -> Self {
        Self { lo, hi, weight }
    }
}

const DEFAULT_RULES: [VoteRule; 5] = [
    VoteRule::new(0.2, 0.3, 0.05),
    VoteRule::new(0.3, 0.4, 0.25),
    VoteRule::new(0.4, 0.5, 0.29),
    VoteRule::new(0.5, 0.6, 0.18),
    VoteRule::new(0.6, 0.7, 0.09),
];

/// Ordered interval rules mapping a match ratio to a vote weight.
///
/// The first rule containing the ratio wins; ratios covered by no rule weigh
/// zero.
#[derive(Clone, Debug, PartialEq)]
pub struct VoteTable {
    rules: Vec<VoteRule>,
}

impl Default for VoteTable {
    fn default() -> Self {
        Self {
            rules: DEFAULT_RULES.to_vec(),
        }
    }
}

impl VoteTable {
    /// Builds a table from rules with `lo < hi` and finite non-negative weights.
    pub fn new(rules: Vec<VoteRule>) -> FeatVoteResult<Self> {
        for rule in &rules {
            if rule.lo.is_nan() || rule.hi.is_nan() || rule.lo >= rule.hi {
                return Err(FeatVoteError::InvalidInput {
                    reason: "vote rule interval must satisfy lo < hi",
                });
            }
            if !rule.weight.is_finite() || rule.weight < 0.0 {
                return Err(FeatVoteError::InvalidInput {
                    reason: "vote rule weight must be finite and non-negative",
                });
            }
        }
        Ok(Self { rules })
    }

    /// Rules in lookup order.
    pub fn rules(&self) -> &[VoteRule] {
        &self.rules
    }

    /// Returns the weight for `ratio`.
    pub fn weight(&self, ratio: f64) -> f64 {
        lookup(&self.rules, ratio)
    }
}

fn lookup(rules: &[VoteRule], ratio: f64) -> f64 {
    rules
        .iter()
        .find(|r| r.lo <= ratio && ratio < r.hi)
        .map_or(0.0, |r| r.weight)
}

/// Empirical likelihood that a match with the given ratio is correct, using
/// the default rule table.
pub fn correct_match_pdf(ratio: f64) -> f64 {
    lookup(&DEFAULT_RULES, ratio)
}
