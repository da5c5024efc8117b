use std::collections::HashMap;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use crate::models::{GradeRecord, SubjectScore};
use crate::store::GradeStore;

pub async fn connect(database_url: &str) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .context("failed to connect to Postgres")
}

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub struct PgGradeStore {
    pool: PgPool,
}

impl PgGradeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl GradeStore for PgGradeStore {
    #[instrument(skip(self, record), fields(record_id = %record.id))]
    async fn append_record(&self, record: &GradeRecord) -> anyhow::Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO grade_tracker.grade_records (id, calculated_at, weighted_average)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(record.id)
        .bind(record.calculated_at)
        .bind(record.weighted_average)
        .execute(&mut *tx)
        .await
        .context("failed to insert grade record")?;

        for (position, entry) in record.entries.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO grade_tracker.grade_entries
                (record_id, position, subject, score, coefficient)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(record.id)
            .bind(i32::try_from(position)?)
            .bind(&entry.name)
            .bind(entry.score)
            .bind(i32::try_from(entry.coefficient)?)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("failed to insert score for {}", entry.name))?;
        }

        tx.commit().await.context("failed to commit grade record")?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_recent(&self, limit: i64) -> anyhow::Result<Vec<GradeRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, calculated_at, weighted_average
            FROM grade_tracker.grade_records
            ORDER BY calculated_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit.max(1))
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<Uuid> = rows.iter().map(|row| row.get("id")).collect();
        let mut entries = fetch_entries(&self.pool, &ids).await?;

        let records: Vec<GradeRecord> = rows
            .into_iter()
            .map(|row| {
                let id: Uuid = row.get("id");
                GradeRecord {
                    id,
                    calculated_at: row.get("calculated_at"),
                    entries: entries.remove(&id).unwrap_or_default(),
                    weighted_average: row.get("weighted_average"),
                }
            })
            .collect();

        tracing::debug!(count = records.len(), "loaded grade history");
        Ok(records)
    }
}

async fn fetch_entries(
    pool: &PgPool,
    record_ids: &[Uuid],
) -> anyhow::Result<HashMap<Uuid, Vec<SubjectScore>>> {
    let rows = sqlx::query(
        r#"
        SELECT record_id, subject, score, coefficient
        FROM grade_tracker.grade_entries
        WHERE record_id = ANY($1)
        ORDER BY record_id, position
        "#,
    )
    .bind(record_ids)
    .fetch_all(pool)
    .await?;

    let mut entries: HashMap<Uuid, Vec<SubjectScore>> = HashMap::new();
    for row in rows {
        let coefficient: i32 = row.get("coefficient");
        entries
            .entry(row.get("record_id"))
            .or_default()
            .push(SubjectScore {
                name: row.get("subject"),
                score: row.get("score"),
                coefficient: u32::try_from(coefficient)
                    .context("stored coefficient is negative")?,
            });
    }

    Ok(entries)
}
