use std::fmt::Write;

use crate::pipeline::TransferOutcome;
use crate::report::format_score;

/// Line-oriented record read by the downstream report generators.
pub fn render_record(outcome: &TransferOutcome, query: Option<&str>, decimals: usize) -> String {
    let mut out = String::new();

    if let Some(name) = query {
        let _ = writeln!(out, "ID  {}", name);
        out.push_str("XX\n");
    }

    match outcome {
        TransferOutcome::NoTransfer { .. } => {
            out.push_str("BM  none\n");
            out.push_str("XX\n");
            out.push_str("MA  none\n");
            out.push_str("XX\n");
        }
        TransferOutcome::Transferred(result) => {
            for m in &result.best_matches {
                let _ = writeln!(out, "BM  {}  {}", m.name, format_score(m.score, decimals));
            }
            out.push_str("XX\n");
            for [a, c, g, t] in &result.consensus.columns {
                let _ = writeln!(out, "MA  {:<3} {:<3} {:<3} {}", a, c, g, t);
            }
            out.push_str("XX\n");
        }
    }

    out
}
