use serde::Serialize;

use crate::model::candidate::LabeledCandidate;
use crate::model::profile::PercentColumn;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsensusProfile {
    pub columns: Vec<PercentColumn>,
    pub contributors: Vec<LabeledCandidate>,
}
