use chrono::{DateTime, Utc};
use libsql::{params, Connection};

use crate::error::{Result, WcrackError};
use crate::models::{BatchWord, Page, WordFrequency, WordRanking, WordRow};

pub struct WordRepository;

impl WordRepository {
    pub async fn create(
        conn: &Connection,
        value: &str,
        batch_id: Option<i64>,
    ) -> Result<WordRow> {
        let created_at = Utc::now();

        conn.execute(
            "INSERT INTO words (value, batch_id, created_at) VALUES (?1, ?2, ?3)",
            params![value, batch_id, created_at.to_rfc3339()],
        )
        .await?;

        Ok(WordRow {
            id: conn.last_insert_rowid(),
            value: value.to_string(),
            batch_id,
            created_at,
        })
    }

    pub async fn list(conn: &Connection, page: Page) -> Result<Vec<WordRow>> {
        let mut rows = conn
            .query(
                r#"
                SELECT id, value, batch_id, created_at
                FROM words
                WHERE deleted_at IS NULL
                ORDER BY value ASC, id ASC
                LIMIT ?1 OFFSET ?2
                "#,
                params![page.limit as i64, page.offset as i64],
            )
            .await?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(Self::row_to_word(&row)?);
        }

        Ok(results)
    }

    pub async fn frequencies(conn: &Connection, page: Page) -> Result<Vec<WordFrequency>> {
        let mut rows = conn
            .query(
                r#"
                SELECT value, COUNT(*) AS total
                FROM words
                WHERE deleted_at IS NULL
                GROUP BY value
                ORDER BY total DESC, value ASC
                LIMIT ?1 OFFSET ?2
                "#,
                params![page.limit as i64, page.offset as i64],
            )
            .await?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(WordFrequency {
                value: row.get(0)?,
                total: row.get(1)?,
            });
        }

        Ok(results)
    }

    pub async fn rankings(conn: &Connection, page: Page) -> Result<Vec<WordRanking>> {
        let mut rows = conn
            .query(
                r#"
                SELECT value,
                       COUNT(*) AS total,
                       RANK() OVER (ORDER BY COUNT(*) DESC) AS ranking
                FROM words
                WHERE deleted_at IS NULL
                GROUP BY value
                ORDER BY ranking ASC, value ASC
                LIMIT ?1 OFFSET ?2
                "#,
                params![page.limit as i64, page.offset as i64],
            )
            .await?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(WordRanking {
                value: row.get(0)?,
                total: row.get(1)?,
                ranking: row.get(2)?,
            });
        }

        Ok(results)
    }

    pub async fn list_by_batch_name(conn: &Connection, name: &str) -> Result<Vec<BatchWord>> {
        let mut rows = conn
            .query(
                r#"
                SELECT w.id, w.value, wb.name
                FROM words w
                JOIN word_batches wb ON w.batch_id = wb.id
                WHERE wb.name = ?1
                  AND w.deleted_at IS NULL
                  AND wb.deleted_at IS NULL
                ORDER BY w.id ASC
                "#,
                params![name],
            )
            .await?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(BatchWord {
                id: row.get(0)?,
                value: row.get(1)?,
                batch_name: row.get(2)?,
            });
        }

        Ok(results)
    }

    fn row_to_word(row: &libsql::Row) -> Result<WordRow> {
        Ok(WordRow {
            id: row.get(0)?,
            value: row.get(1)?,
            batch_id: row.get(2)?,
            created_at: parse_timestamp(&row.get::<String>(3)?)?,
        })
    }
}

pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| WcrackError::Internal(format!("Invalid timestamp '{value}': {e}")))
}
