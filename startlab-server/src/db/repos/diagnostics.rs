//! Database diagnostics for deployment debugging

use serde::Serialize;
use sqlx::PgPool;

use super::DbError;

#[derive(Debug, Clone, Serialize)]
pub struct DatabaseInfo {
    pub database: Option<String>,
    pub version: Option<String>,
    pub answers_columns: Vec<String>,
}

pub struct DiagnosticsRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> DiagnosticsRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Current database, server version, and the columns of `answers`.
    pub async fn info(&self) -> Result<DatabaseInfo, DbError> {
        let database: Option<String> = sqlx::query_scalar("SELECT current_database()::TEXT")
            .fetch_one(self.pool)
            .await?;
        let version: Option<String> = sqlx::query_scalar("SELECT version()")
            .fetch_one(self.pool)
            .await?;
        let answers_columns: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT column_name::TEXT
            FROM information_schema.columns
            WHERE table_name = 'answers'
            ORDER BY ordinal_position
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(DatabaseInfo {
            database,
            version,
            answers_columns,
        })
    }
}
