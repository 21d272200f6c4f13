use chrono::Utc;
use libsql::{params, Connection};

use crate::error::Result;
use crate::models::{Page, WordBatch};

use super::words::parse_timestamp;

pub struct BatchRepository;

impl BatchRepository {
    pub async fn create(conn: &Connection, name: &str) -> Result<WordBatch> {
        let created_at = Utc::now();

        conn.execute(
            "INSERT INTO word_batches (name, created_at) VALUES (?1, ?2)",
            params![name, created_at.to_rfc3339()],
        )
        .await?;

        Ok(WordBatch {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            created_at,
        })
    }

    /// Creates a batch and inserts every value into it in one transaction.
    pub async fn create_with_words(
        conn: &Connection,
        name: &str,
        values: &[String],
    ) -> Result<(WordBatch, u64)> {
        let tx = conn.transaction().await?;

        let batch = Self::create(&tx, name).await?;
        let created_at = batch.created_at.to_rfc3339();
        let mut inserted = 0;
        for value in values {
            inserted += tx
                .execute(
                    "INSERT INTO words (value, batch_id, created_at) VALUES (?1, ?2, ?3)",
                    params![value.as_str(), batch.id, created_at.as_str()],
                )
                .await?;
        }

        tx.commit().await?;
        Ok((batch, inserted))
    }

    pub async fn list(conn: &Connection, page: Page) -> Result<Vec<WordBatch>> {
        let mut rows = conn
            .query(
                r#"
                SELECT id, name, created_at
                FROM word_batches
                WHERE deleted_at IS NULL
                ORDER BY id DESC
                LIMIT ?1 OFFSET ?2
                "#,
                params![page.limit as i64, page.offset as i64],
            )
            .await?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(WordBatch {
                id: row.get(0)?,
                name: row.get(1)?,
                created_at: parse_timestamp(&row.get::<String>(2)?)?,
            });
        }

        Ok(results)
    }
}
