use serde::{Deserialize, Serialize};

use crate::error::{Result, TransferError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceTiers {
    pub high: f64,
    pub medium: f64,
    pub low: f64,
}

impl ConfidenceTiers {
    pub fn default_v1() -> Self {
        Self {
            high: 0.90,
            medium: 0.75,
            low: 0.60,
        }
    }

    /// First tier the top score clears, checked high, medium, then low.
    pub fn select(&self, top_score: f64) -> f64 {
        if top_score > self.high {
            self.high
        } else if top_score > self.medium {
            self.medium
        } else {
            self.low
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.high.is_finite() && self.medium.is_finite() && self.low.is_finite()) {
            return Err(TransferError::Configuration(
                "confidence tiers must be finite".to_string(),
            ));
        }
        if self.high < self.medium || self.medium < self.low {
            return Err(TransferError::Configuration(format!(
                "confidence tiers must satisfy high >= medium >= low (got {}, {}, {})",
                self.high, self.medium, self.low
            )));
        }
        Ok(())
    }
}

impl Default for ConfidenceTiers {
    fn default() -> Self {
        Self::default_v1()
    }
}

/// Digits past 17 carry no information for an f64.
pub const MAX_SCORE_DECIMALS: usize = 17;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferConfig {
    pub max_matches: usize,
    pub similarity_threshold: f64,
    pub use_dynamic_threshold: bool,
    pub tiers: ConfidenceTiers,
    pub outlier_tolerance: f64,
    pub merge_cap: usize,
    pub score_decimals: usize,
}

impl TransferConfig {
    pub fn default_v1() -> Self {
        Self {
            max_matches: 5,
            similarity_threshold: 0.5,
            use_dynamic_threshold: false,
            tiers: ConfidenceTiers::default_v1(),
            outlier_tolerance: 0.5,
            merge_cap: 5,
            score_decimals: 3,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_matches == 0 {
            return Err(TransferError::Configuration(
                "max_matches must be at least 1".to_string(),
            ));
        }
        if self.merge_cap == 0 {
            return Err(TransferError::Configuration(
                "merge_cap must be at least 1".to_string(),
            ));
        }
        if !self.similarity_threshold.is_finite() {
            return Err(TransferError::Configuration(
                "similarity_threshold must be finite".to_string(),
            ));
        }
        if !self.outlier_tolerance.is_finite() || self.outlier_tolerance < 0.0 {
            return Err(TransferError::Configuration(format!(
                "outlier_tolerance must be a non-negative number (got {})",
                self.outlier_tolerance
            )));
        }
        if self.score_decimals > MAX_SCORE_DECIMALS {
            return Err(TransferError::Configuration(format!(
                "score_decimals must be at most {} (got {})",
                MAX_SCORE_DECIMALS, self.score_decimals
            )));
        }
        self.tiers.validate()
    }
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self::default_v1()
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/thresholds.rs"]
mod tests;
