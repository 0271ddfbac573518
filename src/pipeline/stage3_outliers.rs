use crate::collab::PairwiseScorer;
use crate::error::{Result, TransferError};
use crate::model::profile::Profile;

/// Stand-in for a zero mean distance so identical profiles never trip the cutoff.
pub const MEAN_DIST_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    k: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    pub fn size(&self) -> usize {
        self.k
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.k + j]
    }

    fn set_pair(&mut self, i: usize, j: usize, v: f64) {
        self.values[i * self.k + j] = v;
        self.values[j * self.k + i] = v;
    }

    /// Mean over the strict upper triangle, `k*(k-1)/2` terms.
    pub fn mean_distance(&self) -> f64 {
        let mut sum = 0.0;
        let mut n = 0usize;
        for i in 0..self.k {
            for j in (i + 1)..self.k {
                sum += self.get(i, j);
                n += 1;
            }
        }
        if n == 0 { 0.0 } else { sum / n as f64 }
    }

    /// Mean distance from `i` to every other profile, diagonal excluded.
    pub fn row_mean(&self, i: usize) -> f64 {
        if self.k < 2 {
            return 0.0;
        }
        let mut sum = 0.0;
        for j in 0..self.k {
            if j != i {
                sum += self.get(i, j);
            }
        }
        sum / (self.k - 1) as f64
    }
}

#[derive(Debug, Clone)]
pub struct OutlierSplit<T> {
    pub kept: Vec<T>,
    pub excluded: Vec<T>,
}

pub fn distance_matrix<T: AsRef<Profile>>(
    profiles: &[T],
    scorer: &dyn PairwiseScorer,
) -> Result<DistanceMatrix> {
    let k = profiles.len();
    let mut raw = vec![0.0f64; k * k];
    for i in 0..k {
        for j in i..k {
            let s = scorer.score(profiles[i].as_ref(), profiles[j].as_ref())?;
            if !s.is_finite() {
                return Err(TransferError::Collaborator(format!(
                    "pairwise scorer returned a non-finite score for ({}, {})",
                    i, j
                )));
            }
            raw[i * k + j] = s;
        }
    }

    let mut dist = DistanceMatrix {
        k,
        values: vec![0.0; k * k],
    };
    for i in 0..k {
        for j in (i + 1)..k {
            let denom = (raw[i * k + i] * raw[j * k + j]).sqrt();
            let sim = if denom > 0.0 {
                (raw[i * k + j] / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };
            dist.set_pair(i, j, 1.0 - sim);
        }
    }
    Ok(dist)
}

pub fn outlier_flags(dist: &DistanceMatrix, tolerance: f64) -> Vec<bool> {
    let mut mean = dist.mean_distance();
    if mean == 0.0 {
        mean = MEAN_DIST_EPSILON;
    }
    let cutoff = (1.0 + tolerance) * mean;
    (0..dist.size()).map(|i| dist.row_mean(i) > cutoff).collect()
}

/// Splits profiles into kept and excluded, both in input order. Two or fewer
/// profiles are always kept.
pub fn filter_outliers<T: AsRef<Profile>>(
    profiles: Vec<T>,
    tolerance: f64,
    scorer: &dyn PairwiseScorer,
) -> Result<OutlierSplit<T>> {
    if profiles.len() <= 2 {
        return Ok(OutlierSplit {
            kept: profiles,
            excluded: Vec::new(),
        });
    }

    let dist = distance_matrix(&profiles, scorer)?;
    let flags = outlier_flags(&dist, tolerance);
    tracing::debug!(
        "outlier check over {} profiles: mean distance {:.6}",
        dist.size(),
        dist.mean_distance()
    );

    let mut kept = Vec::with_capacity(profiles.len());
    let mut excluded = Vec::new();
    for (profile, flagged) in profiles.into_iter().zip(flags) {
        if flagged {
            excluded.push(profile);
        } else {
            kept.push(profile);
        }
    }
    Ok(OutlierSplit { kept, excluded })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_outliers.rs"]
mod tests;
