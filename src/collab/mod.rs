//! Seams to the alignment scorer, the profile blender and the regression model.
//! Stock implementations live next to the traits; anything that shells out or
//! links a native library plugs in behind the same calls.

pub mod blender;
pub mod regression;
pub mod scorer;

use crate::error::Result;
use crate::input::FeatureRow;
use crate::model::profile::Profile;

pub use blender::{AnchoredAverageBlender, CommandBlender};
pub use regression::{LinearModel, predict_pairs};
pub use scorer::UngappedColumnScorer;

/// Raw (unnormalised) similarity between two profiles; `score(p, p)` is the self score.
pub trait PairwiseScorer {
    fn score(&self, a: &Profile, b: &Profile) -> Result<f64>;
}

/// Blends several profiles into one fractional profile.
pub trait ProfileBlender {
    fn blend(&self, profiles: &[Profile]) -> Result<Profile>;
}

/// Maps pairwise feature rows to predicted profile similarity, one value per row.
pub trait RegressionScorer {
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>>;
}
