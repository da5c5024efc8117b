use std::fmt::Write;

use crate::models::{AverageTrend, GradeRecord};

/// Write one record as CSV: a row per subject, then TOTAL and AVERAGE rows.
pub fn export_csv<W: std::io::Write>(record: &GradeRecord, writer: W) -> anyhow::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["Subject", "Grade", "Coefficient", "Weighted Points"])?;

    for entry in &record.entries {
        csv.write_record([
            entry.name.clone(),
            entry.score.to_string(),
            entry.coefficient.to_string(),
            entry.weighted_points().to_string(),
        ])?;
    }

    csv.write_record([
        "TOTAL".to_string(),
        String::new(),
        record.total_coefficient().to_string(),
        record.total_points().to_string(),
    ])?;
    csv.write_record([
        "AVERAGE".to_string(),
        format!("{:.2}", record.weighted_average),
        String::new(),
        String::new(),
    ])?;

    csv.flush()?;
    Ok(())
}

/// Averages from oldest to newest, each with its change from the previous one.
///
/// `records` is expected most recent first, as the store returns them.
pub fn average_trend(records: &[GradeRecord]) -> Vec<AverageTrend> {
    let mut trend = Vec::with_capacity(records.len());
    let mut previous: Option<f64> = None;

    for record in records.iter().rev() {
        trend.push(AverageTrend {
            calculated_at: record.calculated_at,
            weighted_average: record.weighted_average,
            delta: previous.map(|value| record.weighted_average - value),
        });
        previous = Some(record.weighted_average);
    }

    trend
}

pub fn build_report(records: &[GradeRecord]) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Grade History Report");
    let _ = writeln!(output, "Covering the {} most recent calculations", records.len());
    let _ = writeln!(output);
    let _ = writeln!(output, "## Latest Grades by Subject");

    match records.first() {
        None => {
            let _ = writeln!(output, "No calculations recorded yet.");
        }
        Some(latest) => {
            let _ = writeln!(
                output,
                "Calculated {} with a weighted average of {:.2}",
                latest.calculated_at.format("%Y-%m-%d %H:%M"),
                latest.weighted_average
            );
            let _ = writeln!(output);
            for entry in &latest.entries {
                let _ = writeln!(
                    output,
                    "- {}: {:.1} (coef {})",
                    entry.name, entry.score, entry.coefficient
                );
            }
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Calculation History");

    if records.is_empty() {
        let _ = writeln!(output, "No history available yet.");
    } else {
        let subjects: Vec<&str> = records[0]
            .entries
            .iter()
            .map(|entry| entry.name.as_str())
            .collect();
        let _ = writeln!(output, "| Date | Average | {} |", subjects.join(" | "));
        let _ = writeln!(output, "|---|---|{}", "---|".repeat(subjects.len()));
        for record in records {
            let scores: Vec<String> = record
                .entries
                .iter()
                .map(|entry| format!("{:.1}", entry.score))
                .collect();
            let _ = writeln!(
                output,
                "| {} | {:.2} | {} |",
                record.calculated_at.format("%Y-%m-%d %H:%M"),
                record.weighted_average,
                scores.join(" | ")
            );
        }
    }

    if records.len() > 1 {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Average Progress Over Time");
        for point in average_trend(records) {
            let change = match point.delta {
                Some(delta) => format!(" ({delta:+.2})"),
                None => String::new(),
            };
            let _ = writeln!(
                output,
                "- {}: {:.2}{}",
                point.calculated_at.format("%Y-%m-%d %H:%M"),
                point.weighted_average,
                change
            );
        }
    }

    output
}
