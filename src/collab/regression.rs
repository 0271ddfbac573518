use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::collab::RegressionScorer;
use crate::error::{Result, TransferError};
use crate::input::FeatureRow;

/// `score = weights . features + bias`, stored as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub weights: Vec<f64>,
    #[serde(default)]
    pub bias: f64,
}

impl LinearModel {
    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let model: LinearModel = serde_json::from_reader(reader)?;
        if model.weights.is_empty() {
            return Err(TransferError::Configuration(format!(
                "model {} has no weights",
                path.display()
            )));
        }
        Ok(model)
    }
}

impl RegressionScorer for LinearModel {
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>> {
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            if row.values.len() != self.weights.len() {
                return Err(TransferError::Collaborator(format!(
                    "feature row '{}' has {} values, model expects {}",
                    row.name,
                    row.values.len(),
                    self.weights.len()
                )));
            }
            let dot: f64 = row
                .values
                .iter()
                .zip(&self.weights)
                .map(|(x, w)| x * w)
                .sum();
            out.push(dot + self.bias);
        }
        Ok(out)
    }
}

/// Runs the regressor and pairs each prediction with its reference name.
pub fn predict_pairs<S: RegressionScorer + ?Sized>(
    rows: &[FeatureRow],
    scorer: &S,
) -> Result<Vec<(String, f64)>> {
    let predictions = scorer.predict(rows)?;
    if predictions.len() != rows.len() {
        return Err(TransferError::Collaborator(format!(
            "regressor returned {} predictions for {} rows",
            predictions.len(),
            rows.len()
        )));
    }
    let mut pairs = Vec::with_capacity(rows.len());
    for (row, score) in rows.iter().zip(predictions) {
        if !score.is_finite() {
            return Err(TransferError::Collaborator(format!(
                "regressor returned a non-finite score for '{}'",
                row.name
            )));
        }
        pairs.push((row.name.clone(), score));
    }
    Ok(pairs)
}

#[cfg(test)]
#[path = "../../tests/src_inline/collab/regression.rs"]
mod tests;
