use crate::error::Result;
use crate::input::ReferenceCollection;
use crate::model::candidate::{CandidateProfile, LabeledCandidate};

/// Looks up the first `merge_cap` ranked candidates. A missing profile aborts the query.
pub fn lookup_profiles(
    candidates: &[LabeledCandidate],
    merge_cap: usize,
    collection: &ReferenceCollection,
) -> Result<Vec<CandidateProfile>> {
    let mut out = Vec::with_capacity(candidates.len().min(merge_cap));
    for candidate in candidates.iter().take(merge_cap) {
        let profile = collection.lookup(&candidate.name)?;
        out.push(CandidateProfile {
            name: candidate.name.clone(),
            score: candidate.score,
            profile: profile.clone(),
        });
    }
    Ok(out)
}
