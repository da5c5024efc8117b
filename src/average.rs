use crate::error::InvalidInput;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 20.0;

pub fn validate_score(index: usize, value: f64) -> Result<f64, InvalidInput> {
    // NaN fails both comparisons and lands here too.
    if !(MIN_SCORE..=MAX_SCORE).contains(&value) {
        return Err(InvalidInput::ScoreOutOfRange { index, value });
    }
    Ok(value)
}

/// Coefficient-weighted mean of `scores`.
///
/// Scores must lie in `[0, 20]` and every coefficient must be a finite positive
/// weight. The result is not clamped.
pub fn compute_average(scores: &[f64], coefficients: &[f64]) -> Result<f64, InvalidInput> {
    if scores.len() != coefficients.len() {
        return Err(InvalidInput::LengthMismatch {
            scores: scores.len(),
            coefficients: coefficients.len(),
        });
    }
    if scores.is_empty() {
        return Err(InvalidInput::Empty);
    }
    if coefficients.iter().all(|&coefficient| coefficient == 0.0) {
        return Err(InvalidInput::ZeroTotalWeight);
    }

    let mut total = 0.0;
    let mut weight = 0.0;
    for (index, (&score, &coefficient)) in scores.iter().zip(coefficients).enumerate() {
        validate_score(index, score)?;
        if !coefficient.is_finite() || coefficient <= 0.0 {
            return Err(InvalidInput::CoefficientNotPositive {
                index,
                value: coefficient,
            });
        }
        total += score * coefficient;
        weight += coefficient;
    }

    let average = total / weight;
    if !average.is_finite() {
        return Err(InvalidInput::WeightOverflow);
    }
    Ok(average)
}
