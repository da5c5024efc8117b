use crate::models::GradeRecord;

pub const DEFAULT_HISTORY_LIMIT: i64 = 20;

/// Append-only history of submissions.
#[allow(async_fn_in_trait)]
pub trait GradeStore {
    /// Persist a new record. Existing records are never modified.
    async fn append_record(&self, record: &GradeRecord) -> anyhow::Result<()>;

    /// Most recent records first, at most `limit` of them.
    async fn list_recent(&self, limit: i64) -> anyhow::Result<Vec<GradeRecord>>;
}
