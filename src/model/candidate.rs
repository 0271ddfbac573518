use serde::Serialize;

use crate::model::profile::Profile;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledCandidate {
    pub name: String,
    pub score: f64,
}

impl LabeledCandidate {
    pub fn new(name: impl Into<String>, score: f64) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// A ranked candidate together with the profile looked up for it.
#[derive(Debug, Clone)]
pub struct CandidateProfile {
    pub name: String,
    pub score: f64,
    pub profile: Profile,
}

impl CandidateProfile {
    pub fn label(&self) -> LabeledCandidate {
        LabeledCandidate::new(self.name.clone(), self.score)
    }
}

impl AsRef<Profile> for CandidateProfile {
    fn as_ref(&self) -> &Profile {
        &self.profile
    }
}
