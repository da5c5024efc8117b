use thiserror::Error;

/// Rejected scores, coefficients or scheme definitions.
///
/// Every variant is raised before anything reaches the store.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidInput {
    #[error("at least one subject is required")]
    Empty,
    #[error("{scores} scores but {coefficients} coefficients")]
    LengthMismatch { scores: usize, coefficients: usize },
    #[error("score #{index} is {value}, expected a value between 0 and 20")]
    ScoreOutOfRange { index: usize, value: f64 },
    #[error("coefficient #{index} is {value}, expected a positive weight")]
    CoefficientNotPositive { index: usize, value: f64 },
    #[error("coefficients sum to zero")]
    ZeroTotalWeight,
    #[error("coefficients are too large to average")]
    WeightOverflow,
    #[error("current average {0} is not a finite number")]
    NonFiniteAverage(f64),
    #[error("unknown subject '{0}'")]
    UnknownSubject(String),
    #[error("subject '{0}' is listed more than once")]
    DuplicateSubject(String),
    #[error("no score given for '{0}'")]
    MissingScore(String),
    #[error("coefficient for '{name}' is {value}, expected {min}..={max}")]
    CoefficientOutOfRange {
        name: String,
        value: i64,
        min: u32,
        max: u32,
    },
    #[error("malformed input '{0}', expected NAME=VALUE")]
    Malformed(String),
}
