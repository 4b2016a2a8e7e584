pub mod classify;
pub mod dimension;
pub mod engine;
pub mod ranking;
pub mod types;
pub mod validation;

pub use classify::{classify, LabelConvention};
pub use dimension::Dimension;
pub use engine::{aggregate, ScoreError};
pub use ranking::rank;
pub use types::{HighCounts, Profile, RankedDimension, ScoreVector, Tally};
pub use validation::{validate_responses, ValidationReport};
