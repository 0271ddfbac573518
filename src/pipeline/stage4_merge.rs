use crate::collab::ProfileBlender;
use crate::error::{Result, TransferError};
use crate::model::candidate::CandidateProfile;
use crate::model::consensus::ConsensusProfile;
use crate::model::profile::{PercentColumn, Profile, ProfileColumn};

/// Blends the surviving profiles (or takes the single one), renormalises and integerizes every column.
pub fn merge_profiles(
    candidates: &[CandidateProfile],
    blender: &dyn ProfileBlender,
) -> Result<ConsensusProfile> {
    let merged = match candidates {
        [] => {
            return Err(TransferError::DegenerateInput(
                "no profiles left to merge".to_string(),
            ));
        }
        [single] => to_fractions(&single.profile).ok_or_else(|| {
            TransferError::DegenerateInput(format!(
                "profile '{}' has an empty, negative or non-finite column",
                single.name
            ))
        })?,
        many => {
            let profiles: Vec<Profile> = many.iter().map(|c| c.profile.clone()).collect();
            let blended = blender.blend(&profiles)?;
            to_fractions(&blended).ok_or_else(|| {
                TransferError::Collaborator(
                    "blender returned an empty, negative or non-finite column".to_string(),
                )
            })?
        }
    };
    if merged.is_empty() {
        return Err(TransferError::Collaborator(
            "blender returned an empty profile".to_string(),
        ));
    }

    let mut columns = Vec::with_capacity(merged.len());
    for values in merged.to_percent_scale() {
        columns.push(integerize_column(values)?);
    }

    Ok(ConsensusProfile {
        columns,
        contributors: candidates.iter().map(|c| c.label()).collect(),
    })
}

/// Renormalises every column to fractions, whatever scale the source used.
fn to_fractions(profile: &Profile) -> Option<Profile> {
    let columns = profile
        .columns()
        .iter()
        .map(|c| ProfileColumn::from_counts(c.values()))
        .collect::<Option<Vec<_>>>()?;
    Some(Profile::new(columns))
}

/// Rounds a 0-100 column and pushes the rounding error onto the dominant base
/// so the four values sum to exactly 100. Columns too far off the 0-100 scale
/// to absorb the error on one base are rejected.
pub fn integerize_column(values: [f64; 4]) -> Result<PercentColumn> {
    let mut rounded = [0i64; 4];
    for (out, v) in rounded.iter_mut().zip(values) {
        // round() is half-away-from-zero, i.e. half-up for non-negative input
        *out = v.max(0.0).round() as i64;
    }

    let dominant = dominant_index(&rounded);
    let mut sum: i64 = rounded.iter().sum();
    while sum > 100 {
        rounded[dominant] -= 1;
        sum -= 1;
    }
    while sum < 100 {
        rounded[dominant] += 1;
        sum += 1;
    }

    let mut column = [0u32; 4];
    for (out, v) in column.iter_mut().zip(rounded) {
        *out = u32::try_from(v).map_err(|_| {
            TransferError::DegenerateInput(format!(
                "column {:?} is not on the 0-100 scale",
                values
            ))
        })?;
    }
    Ok(column)
}

/// Largest value scanning A, C, G, T; a later base wins only if strictly greater.
pub fn dominant_index(values: &[i64; 4]) -> usize {
    let mut best = 0usize;
    for idx in 1..4 {
        if values[idx] > values[best] {
            best = idx;
        }
    }
    best
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_merge.rs"]
mod tests;
