use std::io::BufRead;
use std::path::Path;

use crate::error::{Result, TransferError};
use crate::input::reader::{for_each_data_line, open_maybe_gz};

/// Engineered pairwise features between the query and one reference factor.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub name: String,
    pub values: Vec<f64>,
}

pub fn load_features(path: &Path) -> Result<Vec<FeatureRow>> {
    let reader = open_maybe_gz(path)?;
    parse_features(reader)
}

pub fn parse_features<R: BufRead>(reader: R) -> Result<Vec<FeatureRow>> {
    let mut rows = Vec::new();
    let mut width: Option<usize> = None;

    for_each_data_line(reader, |line_no, line| {
        let mut cols = line.split('\t');
        let name = cols.next().unwrap_or_default().trim().to_string();
        let mut values = Vec::new();
        for raw in cols {
            let v: f64 = raw.trim().parse().map_err(|_| {
                TransferError::Parse(format!(
                    "features line {}: invalid value '{}'",
                    line_no,
                    raw.trim()
                ))
            })?;
            values.push(v);
        }
        if name.is_empty() || values.is_empty() {
            return Err(TransferError::Parse(format!(
                "features line {} needs a name and at least one value",
                line_no
            )));
        }
        match width {
            None => width = Some(values.len()),
            Some(expected) if expected != values.len() => {
                return Err(TransferError::Parse(format!(
                    "features line {} has {} values, expected {}",
                    line_no,
                    values.len(),
                    expected
                )));
            }
            Some(_) => {}
        }
        rows.push(FeatureRow { name, values });
        Ok(())
    })?;

    Ok(rows)
}
