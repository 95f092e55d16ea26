//! Analysis records: data model, SQLite store, and the repository used by the
//! HTTP layer.
//!
//! The store is a single `analyses` table. Records are inserted once and
//! never updated or deleted. A pool handle is opened once by the host with
//! [`connect`], prepared with [`initialize`], and passed to
//! [`SqliteAnalysisRepository::new`].

pub mod analyzer;
pub mod error;
pub mod store;
pub mod types;

use std::path::Path;

use {
    sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    tracing::debug,
};

pub use {
    error::{Error, Result},
    store::{AnalysisRepository, SqliteAnalysisRepository},
    types::{AnalysisRecord, AnalysisResult, Issue, Severity},
};

/// Open (creating if needed) the SQLite database at `path`.
pub async fn connect(path: &Path) -> Result<sqlx::SqlitePool> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let db_url = format!("sqlite:{}?mode=rwc", path.display());
    debug!(url = %db_url, "opening analysis database");
    Ok(sqlx::SqlitePool::connect(&db_url).await?)
}

/// A private in-memory database on a single long-lived connection.
///
/// Every pool connection to `sqlite::memory:` sees its own database, so the
/// pool is capped at one connection that is never recycled.
pub async fn memory_pool() -> Result<sqlx::SqlitePool> {
    let options = SqliteConnectOptions::new().in_memory(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Create the `analyses` table if it does not exist. Safe to call on every
/// startup.
pub async fn initialize(pool: &sqlx::SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn initialize_is_idempotent() {
        let pool = memory_pool().await.unwrap();
        initialize(&pool).await.unwrap();
        initialize(&pool).await.unwrap();

        let columns: Vec<(String,)> =
            sqlx::query_as("SELECT name FROM pragma_table_info('analyses') ORDER BY cid")
                .fetch_all(&pool)
                .await
                .unwrap();
        let columns: Vec<&str> = columns.iter().map(|(c,)| c.as_str()).collect();
        assert_eq!(columns, vec!["id", "filePath", "result", "createdAt"]);
    }

    #[tokio::test]
    async fn required_columns_reject_null() {
        let pool = memory_pool().await.unwrap();
        initialize(&pool).await.unwrap();
        let res = sqlx::query("INSERT INTO analyses (filePath, result) VALUES (NULL, '{}')")
            .execute(&pool)
            .await;
        assert!(res.is_err());
    }

    #[tokio::test]
    async fn connect_creates_file_and_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("analyses.db");
        let pool = connect(&path).await.unwrap();
        initialize(&pool).await.unwrap();
        assert!(path.exists());

        let repo = SqliteAnalysisRepository::new(pool.clone());
        let id = repo.save("a.ts", &AnalysisResult::default()).await.unwrap();
        pool.close().await;

        // Records survive reopening the same file.
        let pool = connect(&path).await.unwrap();
        initialize(&pool).await.unwrap();
        let records = SqliteAnalysisRepository::new(pool).list_all().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, id);
    }
}
