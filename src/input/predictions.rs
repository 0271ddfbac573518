use std::collections::HashSet;
use std::io::BufRead;
use std::path::Path;

use crate::error::{Result, TransferError};
use crate::input::reader::{for_each_data_line, open_maybe_gz};

/// Reads `reference score` pairs (tab or space separated), keeping file order.
pub fn load_predictions(path: &Path) -> Result<Vec<(String, f64)>> {
    let reader = open_maybe_gz(path)?;
    parse_predictions(reader)
}

pub fn parse_predictions<R: BufRead>(reader: R) -> Result<Vec<(String, f64)>> {
    let mut pairs = Vec::new();
    let mut seen = HashSet::new();

    for_each_data_line(reader, |line_no, line| {
        let cols: Vec<&str> = line.split_whitespace().collect();
        if cols.len() != 2 {
            return Err(TransferError::Parse(format!(
                "predictions line {} has {} columns, expected 2",
                line_no,
                cols.len()
            )));
        }
        let name = cols[0].to_string();
        let score: f64 = cols[1].parse().map_err(|_| {
            TransferError::Parse(format!(
                "predictions line {}: invalid score '{}'",
                line_no, cols[1]
            ))
        })?;
        if !score.is_finite() {
            return Err(TransferError::Parse(format!(
                "predictions line {}: score must be finite",
                line_no
            )));
        }
        if !seen.insert(name.clone()) {
            return Err(TransferError::Parse(format!(
                "predictions line {}: duplicate reference '{}'",
                line_no, name
            )));
        }
        pairs.push((name, score));
        Ok(())
    })?;

    Ok(pairs)
}
