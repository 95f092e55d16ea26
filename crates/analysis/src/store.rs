use {async_trait::async_trait, tracing::debug};

use crate::{
    Result,
    types::{AnalysisRecord, AnalysisResult},
};

/// Data-access surface for analysis records. Records are insert-only.
#[async_trait]
pub trait AnalysisRepository: Send + Sync {
    /// Serialize `analysis`, insert it for `file_path`, and return the new id.
    async fn save(&self, file_path: &str, analysis: &AnalysisResult) -> Result<i64>;

    /// Every record, most recent first.
    async fn list_all(&self) -> Result<Vec<AnalysisRecord>>;
}

/// Stores analysis records in the `analyses` SQLite table.
pub struct SqliteAnalysisRepository {
    pool: sqlx::SqlitePool,
}

impl SqliteAnalysisRepository {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM analyses")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl AnalysisRepository for SqliteAnalysisRepository {
    async fn save(&self, file_path: &str, analysis: &AnalysisResult) -> Result<i64> {
        let payload = analysis.to_json()?;
        let id = sqlx::query("INSERT INTO analyses (filePath, result) VALUES (?, ?)")
            .bind(file_path)
            .bind(payload)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();
        debug!(id, file_path, "inserted analysis record");
        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<AnalysisRecord>> {
        let rows = sqlx::query_as::<_, AnalysisRow>(
            "SELECT id, filePath, result, createdAt FROM analyses ORDER BY createdAt DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Internal row type for sqlx mapping.
#[derive(sqlx::FromRow)]
struct AnalysisRow {
    id: i64,
    #[sqlx(rename = "filePath")]
    file_path: String,
    result: String,
    #[sqlx(rename = "createdAt")]
    created_at: Option<String>,
}

impl From<AnalysisRow> for AnalysisRecord {
    fn from(r: AnalysisRow) -> Self {
        Self {
            id: r.id,
            file_path: r.file_path,
            result: r.result,
            created_at: r.created_at.unwrap_or_default(),
        }
    }
}
