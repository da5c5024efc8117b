use chrono::Utc;
use uuid::Uuid;

use crate::average::compute_average;
use crate::error::InvalidInput;
use crate::models::{GradeRecord, SubjectScore};
use crate::store::GradeStore;

pub fn build_record(entries: Vec<SubjectScore>) -> Result<GradeRecord, InvalidInput> {
    let scores: Vec<f64> = entries.iter().map(|entry| entry.score).collect();
    let coefficients: Vec<f64> = entries
        .iter()
        .map(|entry| f64::from(entry.coefficient))
        .collect();
    let weighted_average = compute_average(&scores, &coefficients)?;

    Ok(GradeRecord {
        id: Uuid::new_v4(),
        calculated_at: Utc::now(),
        entries,
        weighted_average,
    })
}

/// Validate, compute and append. Nothing is stored when validation fails.
pub async fn submit<S: GradeStore>(
    store: &S,
    entries: Vec<SubjectScore>,
) -> anyhow::Result<GradeRecord> {
    let record = build_record(entries)?;
    store.append_record(&record).await?;
    tracing::info!(
        record_id = %record.id,
        weighted_average = record.weighted_average,
        subjects = record.entries.len(),
        "grade record saved"
    );
    Ok(record)
}
