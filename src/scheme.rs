use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::average::validate_score;
use crate::error::InvalidInput;
use crate::models::{Subject, SubjectScore};

pub const MIN_COEFFICIENT: u32 = 1;
pub const MAX_COEFFICIENT: u32 = 10;

const DEFAULT_SUBJECTS: [(&str, u32); 11] = [
    ("Maths", 9),
    ("FR", 4),
    ("Ar", 2),
    ("PC", 7),
    ("HG", 2),
    ("SVT", 3),
    ("Filo", 2),
    ("II", 2),
    ("Ang", 2),
    ("SLK", 1),
    ("EPS", 2),
];

/// Ordered subject list with one coefficient each.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Scheme {
    pub subjects: Vec<Subject>,
}

impl Default for Scheme {
    fn default() -> Self {
        Self {
            subjects: DEFAULT_SUBJECTS
                .iter()
                .map(|(name, coefficient)| Subject {
                    name: name.to_string(),
                    coefficient: *coefficient,
                })
                .collect(),
        }
    }
}

impl Scheme {
    pub fn new(subjects: Vec<Subject>) -> Result<Self, InvalidInput> {
        let scheme = Self { subjects };
        scheme.validate()?;
        Ok(scheme)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scheme file {}", path.display()))?;
        let parsed: Scheme = serde_json::from_str(&content)
            .with_context(|| format!("invalid scheme JSON in {}", path.display()))?;
        Ok(Self::new(parsed.subjects)?)
    }

    pub fn validate(&self) -> Result<(), InvalidInput> {
        if self.subjects.is_empty() {
            return Err(InvalidInput::Empty);
        }

        let mut seen = HashSet::new();
        for subject in &self.subjects {
            if !seen.insert(name_key(&subject.name)) {
                return Err(InvalidInput::DuplicateSubject(subject.name.clone()));
            }
            check_coefficient(&subject.name, i64::from(subject.coefficient))?;
        }
        Ok(())
    }

    fn position(&self, name: &str) -> Result<usize, InvalidInput> {
        self.subjects
            .iter()
            .position(|subject| same_name(&subject.name, name))
            .ok_or_else(|| InvalidInput::UnknownSubject(name.to_string()))
    }

    /// Apply `NAME=COEF` overrides on top of the current coefficients.
    pub fn with_overrides(mut self, overrides: &[String]) -> Result<Self, InvalidInput> {
        for raw in overrides {
            let (name, value) = split_pair(raw)?;
            let value: i64 = value
                .parse()
                .map_err(|_| InvalidInput::Malformed(raw.clone()))?;
            let index = self.position(name)?;
            let subject = &mut self.subjects[index];
            subject.coefficient = check_coefficient(&subject.name, value)?;
        }
        Ok(self)
    }

    /// Pair `NAME=SCORE` inputs with the scheme, in scheme order.
    ///
    /// With `missing_as_zero`, subjects without a score get 0 instead of an error.
    pub fn assign_scores(
        &self,
        inputs: &[String],
        missing_as_zero: bool,
    ) -> Result<Vec<SubjectScore>, InvalidInput> {
        let mut scores: Vec<Option<f64>> = vec![None; self.subjects.len()];

        for raw in inputs {
            let (name, value) = split_pair(raw)?;
            let value: f64 = value
                .parse()
                .map_err(|_| InvalidInput::Malformed(raw.clone()))?;
            let index = self.position(name)?;
            if scores[index].is_some() {
                return Err(InvalidInput::DuplicateSubject(
                    self.subjects[index].name.clone(),
                ));
            }
            scores[index] = Some(validate_score(index, value)?);
        }

        self.subjects
            .iter()
            .zip(scores)
            .map(|(subject, score)| {
                let score = match score {
                    Some(score) => score,
                    None if missing_as_zero => 0.0,
                    None => return Err(InvalidInput::MissingScore(subject.name.clone())),
                };
                Ok(SubjectScore {
                    name: subject.name.clone(),
                    score,
                    coefficient: subject.coefficient,
                })
            })
            .collect()
    }
}

fn name_key(name: &str) -> String {
    name.to_lowercase()
}

fn same_name(a: &str, b: &str) -> bool {
    name_key(a) == name_key(b)
}

fn check_coefficient(name: &str, value: i64) -> Result<u32, InvalidInput> {
    if value < i64::from(MIN_COEFFICIENT) || value > i64::from(MAX_COEFFICIENT) {
        return Err(InvalidInput::CoefficientOutOfRange {
            name: name.to_string(),
            value,
            min: MIN_COEFFICIENT,
            max: MAX_COEFFICIENT,
        });
    }
    Ok(value as u32)
}

fn split_pair(raw: &str) -> Result<(&str, &str), InvalidInput> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| InvalidInput::Malformed(raw.to_string()))?;
    let (name, value) = (name.trim(), value.trim());
    if name.is_empty() || value.is_empty() {
        return Err(InvalidInput::Malformed(raw.to_string()));
    }
    Ok((name, value))
}
