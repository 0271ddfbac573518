pub mod json;
pub mod record;

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::pipeline::TransferOutcome;
use json::{SummaryInput, build_summary, render_summary_json};
use record::render_record;

pub const RECORD_FILE: &str = "transfer.txt";
pub const SUMMARY_FILE: &str = "summary.json";

pub fn format_score(v: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, v)
}

pub fn write_reports(
    input: &SummaryInput<'_>,
    outcome: &TransferOutcome,
    out_dir: &Path,
) -> Result<()> {
    fs::create_dir_all(out_dir)?;

    let record = render_record(outcome, input.query, input.config.score_decimals);
    fs::write(out_dir.join(RECORD_FILE), record)?;

    let summary = build_summary(input, outcome);
    let json = render_summary_json(&summary)?;
    fs::write(out_dir.join(SUMMARY_FILE), json)?;

    tracing::info!("wrote {} and {} to {}", RECORD_FILE, SUMMARY_FILE, out_dir.display());
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
