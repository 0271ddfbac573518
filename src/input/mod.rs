pub mod collection;
pub mod features;
pub mod predictions;
pub mod reader;

pub use collection::{ReferenceCollection, load_collection};
pub use features::{FeatureRow, load_features};
pub use predictions::load_predictions;

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
