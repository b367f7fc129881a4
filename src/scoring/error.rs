use thiserror::Error;

use super::criteria::Criterion;

/// Failures of a scoring call. Rows are reported 1-based in input order.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
    #[error("missing weight for criterion '{0}'")]
    MissingWeight(Criterion),

    #[error("row {row}: missing criterion column '{criterion}'")]
    MissingCriterion { row: usize, criterion: Criterion },

    #[error("row {row}: criterion '{criterion}' is not numeric (got {value})")]
    NonNumeric {
        row: usize,
        criterion: Criterion,
        value: String,
    },
}
