use crate::collab::PairwiseScorer;
use crate::error::Result;
use crate::model::profile::Profile;

/// Where `other` sits against `anchor`: column `j` of `other` (after an optional
/// reverse complement) lines up with anchor column `j + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub offset: isize,
    pub reverse: bool,
    pub score: f64,
}

/// Best ungapped overlap of summed column dot products.
#[derive(Debug, Clone, Copy)]
pub struct UngappedColumnScorer {
    pub both_strands: bool,
}

impl Default for UngappedColumnScorer {
    fn default() -> Self {
        Self { both_strands: true }
    }
}

impl UngappedColumnScorer {
    pub fn best_placement(&self, anchor: &Profile, other: &Profile) -> Placement {
        let forward = best_offset(anchor, other, false);
        if !self.both_strands {
            return forward;
        }
        let reverse = best_offset(anchor, &other.reverse_complement(), true);
        // forward wins ties
        if reverse.score > forward.score {
            reverse
        } else {
            forward
        }
    }
}

impl PairwiseScorer for UngappedColumnScorer {
    fn score(&self, a: &Profile, b: &Profile) -> Result<f64> {
        Ok(self.best_placement(a, b).score)
    }
}

fn best_offset(anchor: &Profile, other: &Profile, reverse: bool) -> Placement {
    let m = anchor.len() as isize;
    let n = other.len() as isize;
    let mut best = Placement {
        offset: 0,
        reverse,
        score: 0.0,
    };
    if m == 0 || n == 0 {
        return best;
    }
    let mut first = true;
    for offset in -(n - 1)..m {
        let score = overlap_score(anchor, other, offset);
        if first || score > best.score {
            best.offset = offset;
            best.score = score;
            first = false;
        }
    }
    best
}

pub fn overlap_score(anchor: &Profile, other: &Profile, offset: isize) -> f64 {
    let a = anchor.columns();
    let mut total = 0.0;
    for (j, col) in other.columns().iter().enumerate() {
        let i = j as isize + offset;
        if i < 0 || i >= a.len() as isize {
            continue;
        }
        total += a[i as usize].dot(col);
    }
    total
}

#[cfg(test)]
#[path = "../../tests/src_inline/collab/scorer.rs"]
mod tests;
