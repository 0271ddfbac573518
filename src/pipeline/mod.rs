pub mod stage1_rank;
pub mod stage2_lookup;
pub mod stage3_outliers;
pub mod stage4_merge;

use serde::Serialize;

use crate::collab::{PairwiseScorer, ProfileBlender};
use crate::error::Result;
use crate::input::ReferenceCollection;
use crate::model::candidate::LabeledCandidate;
use crate::model::consensus::ConsensusProfile;
use crate::model::thresholds::TransferConfig;
use stage1_rank::{Ranking, ThresholdMode, rank_candidates};
use stage2_lookup::lookup_profiles;
use stage3_outliers::filter_outliers;
use stage4_merge::merge_profiles;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferState {
    Start,
    Ranked,
    Merged,
    Done,
    NoTransfer,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferResult {
    /// Every retained best match in ranked order, not capped by the merge limit.
    pub best_matches: Vec<LabeledCandidate>,
    pub excluded_outliers: Vec<LabeledCandidate>,
    pub consensus: ConsensusProfile,
    pub threshold: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransferOutcome {
    Transferred(TransferResult),
    NoTransfer { threshold: Option<f64> },
}

impl TransferOutcome {
    pub fn state(&self) -> TransferState {
        match self {
            TransferOutcome::Transferred(_) => TransferState::Done,
            TransferOutcome::NoTransfer { .. } => TransferState::NoTransfer,
        }
    }
}

pub struct TransferPipeline<'a> {
    config: TransferConfig,
    collection: &'a ReferenceCollection,
    scorer: &'a dyn PairwiseScorer,
    blender: &'a dyn ProfileBlender,
}

impl<'a> TransferPipeline<'a> {
    pub fn new(
        config: TransferConfig,
        collection: &'a ReferenceCollection,
        scorer: &'a dyn PairwiseScorer,
        blender: &'a dyn ProfileBlender,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            collection,
            scorer,
            blender,
        })
    }

    pub fn config(&self) -> &TransferConfig {
        &self.config
    }

    pub fn threshold_mode(&self) -> ThresholdMode {
        if self.config.use_dynamic_threshold {
            ThresholdMode::Dynamic(self.config.tiers)
        } else {
            ThresholdMode::Fixed(self.config.similarity_threshold)
        }
    }

    /// One query: predicted `(reference, score)` pairs in, consensus profile out.
    pub fn run(&self, pairs: &[(String, f64)]) -> Result<TransferOutcome> {
        let mut state = TransferState::Start;
        tracing::debug!("state {:?}: ranking {} predictions", state, pairs.len());

        let Ranking {
            candidates,
            threshold,
        } = rank_candidates(pairs, self.config.max_matches, self.threshold_mode());
        state = TransferState::Ranked;
        tracing::debug!(
            "state {:?}: {} candidates above threshold {:?}",
            state,
            candidates.len(),
            threshold
        );

        if candidates.is_empty() {
            tracing::info!("no candidate passed the threshold; nothing to transfer");
            return Ok(TransferOutcome::NoTransfer { threshold });
        }

        let looked_up = lookup_profiles(&candidates, self.config.merge_cap, self.collection)?;
        let split = filter_outliers(looked_up, self.config.outlier_tolerance, self.scorer)?;
        for outlier in &split.excluded {
            tracing::info!(
                "excluding outlier profile {} (score {:.6})",
                outlier.name,
                outlier.score
            );
        }
        let consensus = merge_profiles(&split.kept, self.blender)?;
        state = TransferState::Merged;
        tracing::debug!(
            "state {:?}: consensus of {} columns from {} profiles",
            state,
            consensus.columns.len(),
            consensus.contributors.len()
        );

        Ok(TransferOutcome::Transferred(TransferResult {
            best_matches: candidates,
            excluded_outliers: split.excluded.iter().map(|c| c.label()).collect(),
            consensus,
            threshold,
        }))
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/mod.rs"]
mod tests;
