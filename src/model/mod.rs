pub mod candidate;
pub mod consensus;
pub mod profile;
pub mod thresholds;
