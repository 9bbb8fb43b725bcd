use std::collections::HashMap;

/// Accumulated weight of one quantized translation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoteBin {
    /// Row offset from template to test image.
    pub dy: i64,
    /// Column offset from template to test image.
    pub dx: i64,
    /// Sum of the vote weights that landed in this bin.
    pub weight: f64,
}

/// Translation bins in insertion order with a hash index on `(dy, dx)`.
#[derive(Clone, Debug, Default)]
pub struct VoteAccumulator {
    bins: Vec<VoteBin>,
    index: HashMap<(i64, i64), usize>,
}

impl VoteAccumulator {
    /// Creates an accumulator with no bins.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `weight` to the bin at `(dy, dx)`, creating it on first use.
    pub fn add(&mut self, dy: i64, dx: i64, weight: f64) {
        if let Some(&slot) = self.index.get(&(dy, dx)) {
            self.bins[slot].weight += weight;
            return;
        }
        self.index.insert((dy, dx), self.bins.len());
        self.bins.push(VoteBin { dy, dx, weight });
    }

    /// Weight of the bin at `(dy, dx)`, if any vote landed there.
    pub fn get(&self, dy: i64, dx: i64) -> Option<f64> {
        self.index
            .get(&(dy, dx))
            .map(|&slot| self.bins[slot].weight)
    }

    /// Bins in the order they were first voted for.
    pub fn bins(&self) -> &[VoteBin] {
        &self.bins
    }

    /// Number of distinct bins.
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// Returns true when no vote has been cast.
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Bin with the strictly highest weight; the earliest bin wins ties.
    pub fn winner(&self) -> Option<VoteBin> {
        let mut best: Option<VoteBin> = None;
        for bin in &self.bins {
            if best.is_none_or(|b| bin.weight > b.weight) {
                best = Some(*bin);
            }
        }
        best
    }
}
