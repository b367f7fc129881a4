pub mod config;
pub mod criteria;
pub mod engine;
pub mod error;
pub mod validation;
pub mod weights;

pub use config::*;
pub use criteria::{Criterion, CRITERIA_COUNT};
pub use engine::{compute_scores, pairwise_wins, RankedEntity};
pub use error::ScoreError;
pub use validation::validate_weights;
pub use weights::Weights;
