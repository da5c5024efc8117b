use std::cmp::Reverse;

use crate::average::{compute_average, MAX_SCORE};
use crate::error::InvalidInput;
use crate::models::{Improvement, SubjectScore};

/// Gains closer than this are treated as equal when ordering.
const GAIN_RESOLUTION: f64 = 1e-9;

/// Rank subjects by how much a one-point increase would lift the average.
///
/// Each subject below the maximum is bumped by one point (capped at 20) and the
/// whole record is averaged again. Subjects already at 20 are left out. Equal
/// gains keep their input order.
pub fn rank_improvements(
    subjects: &[SubjectScore],
    current_average: f64,
) -> Result<Vec<Improvement>, InvalidInput> {
    if !current_average.is_finite() {
        return Err(InvalidInput::NonFiniteAverage(current_average));
    }

    let scores: Vec<f64> = subjects.iter().map(|subject| subject.score).collect();
    let coefficients: Vec<f64> = subjects
        .iter()
        .map(|subject| f64::from(subject.coefficient))
        .collect();
    // Validates the whole record up front, even if every subject is maxed out.
    compute_average(&scores, &coefficients)?;

    let mut suggestions = Vec::new();
    for (index, subject) in subjects.iter().enumerate() {
        if subject.score >= MAX_SCORE {
            continue;
        }

        let mut bumped = scores.clone();
        bumped[index] = (subject.score + 1.0).min(MAX_SCORE);
        let new_average = compute_average(&bumped, &coefficients)?;

        suggestions.push(Improvement {
            name: subject.name.clone(),
            score: subject.score,
            coefficient: subject.coefficient,
            gain: new_average - current_average,
        });
    }

    suggestions.sort_by_key(|suggestion| Reverse(gain_key(suggestion.gain)));
    Ok(suggestions)
}

fn gain_key(gain: f64) -> i64 {
    (gain / GAIN_RESOLUTION).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject(name: &str, score: f64, coefficient: u32) -> SubjectScore {
        SubjectScore {
            name: name.to_string(),
            score,
            coefficient,
        }
    }

    fn scenario() -> Vec<SubjectScore> {
        let names = [
            "Maths", "FR", "Ar", "PC", "HG", "SVT", "Filo", "II", "Ang", "SLK", "EPS",
        ];
        let scores = [
            18.0, 10.0, 15.0, 12.0, 20.0, 16.0, 14.0, 13.0, 17.0, 19.0, 20.0,
        ];
        let coefficients = [9, 4, 2, 7, 2, 3, 2, 2, 2, 1, 2];
        names
            .iter()
            .zip(scores)
            .zip(coefficients)
            .map(|((name, score), coefficient)| subject(name, score, coefficient))
            .collect()
    }

    fn average_of(subjects: &[SubjectScore]) -> f64 {
        let scores: Vec<f64> = subjects.iter().map(|s| s.score).collect();
        let coefficients: Vec<f64> = subjects.iter().map(|s| f64::from(s.coefficient)).collect();
        compute_average(&scores, &coefficients).unwrap()
    }

    #[test]
    fn scenario_ranks_heavy_subject_first() {
        let subjects = scenario();
        let average = average_of(&subjects);
        let ranked = rank_improvements(&subjects, average).unwrap();

        let names: Vec<&str> = ranked.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Maths", "PC", "FR", "SVT", "Ar", "Filo", "II", "Ang", "SLK"]
        );
        assert!((ranked[0].gain - 9.0 / 36.0).abs() < 1e-9);
        assert!((ranked[2].gain - 4.0 / 36.0).abs() < 1e-9);
        assert!((ranked[8].gain - 1.0 / 36.0).abs() < 1e-9);
    }

    #[test]
    fn never_suggests_maxed_subjects() {
        let subjects = scenario();
        let ranked = rank_improvements(&subjects, average_of(&subjects)).unwrap();
        assert!(ranked.iter().all(|s| s.score < MAX_SCORE));
        assert!(!ranked.iter().any(|s| s.name == "HG" || s.name == "EPS"));
    }

    #[test]
    fn sorted_by_descending_gain() {
        let subjects = scenario();
        let ranked = rank_improvements(&subjects, average_of(&subjects)).unwrap();
        for pair in ranked.windows(2) {
            assert!(pair[0].gain >= pair[1].gain - 1e-9);
        }
    }

    #[test]
    fn equal_gains_keep_input_order() {
        let subjects = vec![
            subject("c", 5.0, 3),
            subject("a", 11.0, 3),
            subject("b", 17.5, 3),
            subject("d", 2.0, 3),
        ];
        let ranked = rank_improvements(&subjects, average_of(&subjects)).unwrap();
        let names: Vec<&str> = ranked.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn increase_is_capped_at_maximum() {
        let subjects = vec![subject("near", 19.6, 5), subject("far", 8.0, 5)];
        let average = average_of(&subjects);
        let ranked = rank_improvements(&subjects, average).unwrap();

        assert_eq!(ranked[0].name, "far");
        assert!((ranked[0].gain - 0.5).abs() < 1e-9);
        assert_eq!(ranked[1].name, "near");
        assert!((ranked[1].gain - 5.0 * 0.4 / 10.0).abs() < 1e-9);
    }

    #[test]
    fn capped_headroom_can_lose_to_lighter_subject() {
        // Coefficient alone would put "heavy" first.
        let subjects = vec![subject("heavy", 19.5, 4), subject("light", 10.0, 3)];
        let ranked = rank_improvements(&subjects, average_of(&subjects)).unwrap();
        assert_eq!(ranked[0].name, "light");
        assert!((ranked[0].gain - 3.0 / 7.0).abs() < 1e-9);
        assert!((ranked[1].gain - 2.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn all_maxed_yields_no_suggestions() {
        let subjects = vec![subject("a", 20.0, 2), subject("b", 20.0, 5)];
        let ranked = rank_improvements(&subjects, 20.0).unwrap();
        assert!(ranked.is_empty());
    }

    #[test]
    fn rejects_invalid_records() {
        let subjects = vec![subject("a", 21.0, 2)];
        assert!(matches!(
            rank_improvements(&subjects, 10.0),
            Err(InvalidInput::ScoreOutOfRange { .. })
        ));

        let subjects = vec![subject("a", 10.0, 0)];
        assert!(matches!(
            rank_improvements(&subjects, 10.0),
            Err(InvalidInput::ZeroTotalWeight)
        ));

        let subjects = vec![subject("a", 10.0, 1)];
        assert!(matches!(
            rank_improvements(&subjects, f64::NAN),
            Err(InvalidInput::NonFiniteAverage(_))
        ));
    }
}
