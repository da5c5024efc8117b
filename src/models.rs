use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Subject {
    pub name: String,
    pub coefficient: u32,
}

/// One subject of a submission together with the score entered for it.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectScore {
    pub name: String,
    pub score: f64,
    pub coefficient: u32,
}

impl SubjectScore {
    pub fn weighted_points(&self) -> f64 {
        self.score * f64::from(self.coefficient)
    }
}

/// A single submission. Built once by `submission::build_record`, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeRecord {
    pub id: Uuid,
    pub calculated_at: DateTime<Utc>,
    pub entries: Vec<SubjectScore>,
    pub weighted_average: f64,
}

impl GradeRecord {
    pub fn total_coefficient(&self) -> u32 {
        self.entries.iter().map(|entry| entry.coefficient).sum()
    }

    pub fn total_points(&self) -> f64 {
        self.entries.iter().map(SubjectScore::weighted_points).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Improvement {
    pub name: String,
    pub score: f64,
    pub coefficient: u32,
    pub gain: f64,
}

#[derive(Debug, Clone)]
pub struct AverageTrend {
    pub calculated_at: DateTime<Utc>,
    pub weighted_average: f64,
    pub delta: Option<f64>,
}
