use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::model::candidate::LabeledCandidate;
use crate::model::thresholds::ConfidenceTiers;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThresholdMode {
    Fixed(f64),
    /// Tier picked once from the top-scoring entry, then applied to the whole batch.
    Dynamic(ConfidenceTiers),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    pub candidates: Vec<LabeledCandidate>,
    /// `None` only when there was nothing to rank.
    pub threshold: Option<f64>,
}

struct HeapEntry {
    score: f64,
    order: usize,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    // Higher score first; equal scores pop in insertion order.
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.order.cmp(&self.order))
    }
}

pub fn rank_candidates(pairs: &[(String, f64)], max_count: usize, mode: ThresholdMode) -> Ranking {
    let mut heap: BinaryHeap<HeapEntry> = pairs
        .iter()
        .enumerate()
        .map(|(order, (_, score))| HeapEntry {
            score: *score,
            order,
        })
        .collect();

    let mut candidates = Vec::new();
    let mut threshold: Option<f64> = None;
    let mut popped = 0usize;

    while popped < max_count {
        let Some(entry) = heap.pop() else {
            break;
        };
        popped += 1;

        let active = *threshold.get_or_insert_with(|| match mode {
            ThresholdMode::Fixed(t) => t,
            ThresholdMode::Dynamic(tiers) => tiers.select(entry.score),
        });
        if entry.score > active {
            candidates.push(LabeledCandidate::new(
                pairs[entry.order].0.clone(),
                entry.score,
            ));
        }
    }

    let threshold = match (threshold, mode) {
        (None, ThresholdMode::Fixed(t)) => Some(t),
        (active, _) => active,
    };

    Ranking {
        candidates,
        threshold,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_rank.rs"]
mod tests;
