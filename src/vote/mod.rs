//! Hough voting over quantized translations.
//!
//! Every match proposes the offset between its template point and its test
//! point. Offsets are snapped to a grid, weighted by how trustworthy the match
//! ratio is, and accumulated; the heaviest bin is the detected translation.

mod accumulator;
mod table;

pub use accumulator::{VoteAccumulator, VoteBin};
pub use table::{correct_match_pdf, VoteRule, VoteTable};

use crate::interest::InterestPoints;
use crate::matching::FeatureMatches;
use crate::trace::{trace_event, trace_span};
use crate::util::math::round_to_step;
use crate::util::{FeatVoteError, FeatVoteResult};

/// Configuration for [`hough_vote`].
#[derive(Clone, Debug)]
pub struct VoteConfig {
    /// Bin size in pixels for both translation components.
    pub quantization_step: i64,
    /// Ratio-to-weight rules.
    pub table: VoteTable,
    /// Drops votes whose quantized offset has a negative component.
    pub discard_negative_translations: bool,
}

impl Default for VoteConfig {
    fn default() -> Self {
        Self {
            quantization_step: 5,
            table: VoteTable::default(),
            discard_negative_translations: true,
        }
    }
}

/// Offset of the template inside the test image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Translation {
    /// Column offset.
    pub tx: i64,
    /// Row offset.
    pub ty: i64,
}

/// Winning translation together with the full accumulator.
#[derive(Clone, Debug)]
pub struct HoughVote {
    /// Offset of the heaviest bin.
    pub translation: Translation,
    /// Accumulated weight of the winning bin.
    pub weight: f64,
    /// Every bin that received a vote.
    pub accumulator: VoteAccumulator,
}

/// Votes for the translation mapping `points_a` onto `points_b`.
///
/// `matches` must be index-aligned with `points_a` and index into `points_b`.
/// Returns [`FeatVoteError::EmptyVoteSet`] when no match casts a vote.
pub fn hough_vote(
    points_a: &InterestPoints,
    points_b: &InterestPoints,
    matches: &FeatureMatches,
    cfg: &VoteConfig,
) -> FeatVoteResult<HoughVote> {
    let _span = trace_span!("hough_vote", matches = matches.len()).entered();
    if cfg.quantization_step <= 0 {
        return Err(FeatVoteError::InvalidInput {
            reason: "quantization_step must be positive",
        });
    }
    if matches.len() != points_a.len() {
        return Err(FeatVoteError::InvalidInput {
            reason: "matches must align with the first point set",
        });
    }

    let mut accumulator = VoteAccumulator::new();
    for (pa, (j, ratio)) in points_a.iter().zip(matches.iter()) {
        let pb = points_b.get(j).ok_or(FeatVoteError::IndexOutOfBounds {
            index: j,
            len: points_b.len(),
            context: "match",
        })?;
        let dx = round_to_step(pb.x as i64 - pa.x as i64, cfg.quantization_step);
        let dy = round_to_step(pb.y as i64 - pa.y as i64, cfg.quantization_step);
        let weight = cfg.table.weight(ratio);
        if weight == 0.0 {
            continue;
        }
        if cfg.discard_negative_translations && (dx < 0 || dy < 0) {
            continue;
        }
        accumulator.add(dy, dx, weight);
    }

    let winner = accumulator.winner().ok_or(FeatVoteError::EmptyVoteSet)?;
    trace_event!(
        "vote",
        bins = accumulator.len(),
        tx = winner.dx,
        ty = winner.dy,
        weight = winner.weight
    );
    Ok(HoughVote {
        translation: Translation {
            tx: winner.dx,
            ty: winner.dy,
        },
        weight: winner.weight,
        accumulator,
    })
}
