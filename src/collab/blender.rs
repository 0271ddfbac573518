use std::io::Write;
use std::process::{Command, Stdio};

use crate::collab::ProfileBlender;
use crate::collab::scorer::UngappedColumnScorer;
use crate::error::{Result, TransferError};
use crate::input::collection::{parse_profile_rows, write_profile_block};
use crate::model::profile::{Profile, ProfileColumn};

/// Averages every profile onto the first one at its best ungapped placement.
/// The output keeps the anchor's length and column order.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnchoredAverageBlender {
    pub scorer: UngappedColumnScorer,
}

impl ProfileBlender for AnchoredAverageBlender {
    fn blend(&self, profiles: &[Profile]) -> Result<Profile> {
        let Some(anchor) = profiles.first() else {
            return Err(TransferError::DegenerateInput(
                "nothing to blend".to_string(),
            ));
        };
        let mut sums: Vec<[f64; 4]> = anchor.columns().iter().map(|c| c.values()).collect();
        let mut counts = vec![1usize; anchor.len()];

        for other in &profiles[1..] {
            let placement = self.scorer.best_placement(anchor, other);
            let oriented = if placement.reverse {
                other.reverse_complement()
            } else {
                other.clone()
            };
            for (j, col) in oriented.columns().iter().enumerate() {
                let i = j as isize + placement.offset;
                if i < 0 || i >= anchor.len() as isize {
                    continue;
                }
                let slot = &mut sums[i as usize];
                for (acc, v) in slot.iter_mut().zip(col.values()) {
                    *acc += v;
                }
                counts[i as usize] += 1;
            }
        }

        let mut columns = Vec::with_capacity(sums.len());
        for (sum, count) in sums.iter().zip(&counts) {
            let n = *count as f64;
            let col = ProfileColumn::from_counts([sum[0] / n, sum[1] / n, sum[2] / n, sum[3] / n])
                .ok_or_else(|| {
                    TransferError::DegenerateInput("blended column has no mass".to_string())
                })?;
            columns.push(col);
        }
        Ok(Profile::new(columns))
    }
}

/// Runs an external blending tool: profiles go to its stdin as ID/MA blocks and
/// one profile is read back from the `MA` rows on its stdout.
#[derive(Debug, Clone)]
pub struct CommandBlender {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandBlender {
    /// Splits a command line on whitespace; the first word is the program.
    pub fn from_command_line(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or_else(|| {
            TransferError::Configuration("blend command is empty".to_string())
        })?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }
}

impl ProfileBlender for CommandBlender {
    fn blend(&self, profiles: &[Profile]) -> Result<Profile> {
        let mut input = String::new();
        for (idx, profile) in profiles.iter().enumerate() {
            write_profile_block(&mut input, &format!("P{}", idx + 1), profile);
        }

        tracing::debug!(
            "running blend command {} on {} profiles",
            self.program,
            profiles.len()
        );
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                TransferError::Collaborator(format!("failed to start {}: {e}", self.program))
            })?;
        // Fed from its own thread so a tool that writes before it finishes
        // reading cannot block on a full stdout pipe.
        let stdin = child.stdin.take();
        let (output, fed) = std::thread::scope(|s| {
            let feeder = s.spawn(|| -> std::io::Result<()> {
                if let Some(mut stdin) = stdin {
                    stdin.write_all(input.as_bytes())?;
                }
                Ok(())
            });
            (child.wait_with_output(), feeder.join())
        });
        let output = output.map_err(|e| {
            TransferError::Collaborator(format!("failed to wait for {}: {e}", self.program))
        })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TransferError::Collaborator(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }
        match fed {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                return Err(TransferError::Collaborator(format!(
                    "failed to feed {}: {e}",
                    self.program
                )));
            }
            Err(_) => {
                return Err(TransferError::Collaborator(format!(
                    "stdin writer for {} panicked",
                    self.program
                )));
            }
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_profile_rows(&stdout).map_err(|e| {
            TransferError::Collaborator(format!("{} produced malformed output: {e}", self.program))
        })
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/collab/blender.rs"]
mod tests;
