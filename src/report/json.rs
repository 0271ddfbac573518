use serde::Serialize;

use crate::model::candidate::LabeledCandidate;
use crate::model::consensus::ConsensusProfile;
use crate::model::thresholds::TransferConfig;
use crate::pipeline::{TransferOutcome, TransferState};

#[derive(Debug, Clone, Serialize)]
pub struct Summary<'a> {
    pub tool: &'a str,
    pub version: &'a str,
    pub query: Option<&'a str>,
    pub n_predictions: usize,
    pub n_references: usize,
    pub config: &'a TransferConfig,
    pub outcome: TransferState,
    pub threshold: Option<f64>,
    pub best_matches: &'a [LabeledCandidate],
    pub excluded_outliers: &'a [LabeledCandidate],
    pub consensus: Option<&'a ConsensusProfile>,
}

#[derive(Debug, Clone)]
pub struct SummaryInput<'a> {
    pub query: Option<&'a str>,
    pub n_predictions: usize,
    pub n_references: usize,
    pub config: &'a TransferConfig,
}

pub fn build_summary<'a>(input: &SummaryInput<'a>, outcome: &'a TransferOutcome) -> Summary<'a> {
    let none: &'a [LabeledCandidate] = &[];
    let (threshold, best_matches, excluded_outliers, consensus) = match outcome {
        TransferOutcome::NoTransfer { threshold } => (*threshold, none, none, None),
        TransferOutcome::Transferred(r) => (
            r.threshold,
            r.best_matches.as_slice(),
            r.excluded_outliers.as_slice(),
            Some(&r.consensus),
        ),
    };

    Summary {
        tool: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        query: input.query,
        n_predictions: input.n_predictions,
        n_references: input.n_references,
        config: input.config,
        outcome: outcome.state(),
        threshold,
        best_matches,
        excluded_outliers,
        consensus,
    }
}

pub fn render_summary_json(summary: &Summary<'_>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(summary)
}
