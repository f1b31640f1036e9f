/// SQL query functions for catalog operations
///
/// All reads return records in ascending id order (catalog order).

use crate::db::models::*;
use crate::db::Database;
use crate::error::Result;
use sqlx::Row;
use tracing::info;

impl Database {
    /// Insert many records in one transaction
    ///
    /// Either every record lands or none does.
    pub async fn import_records(&self, inputs: Vec<NewRecord>) -> Result<Vec<i64>> {
        let mut tx = self.pool().begin().await?;
        let mut ids = Vec::with_capacity(inputs.len());

        for input in inputs {
            let keywords = serde_json::to_string(&input.keywords)?;
            let examples = serde_json::to_string(&input.examples)?;

            let row = sqlx::query(
                r#"
                INSERT INTO records (command, description, details, syntax, category, difficulty, keywords, examples)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                RETURNING id
                "#,
            )
            .bind(&input.command)
            .bind(&input.description)
            .bind(&input.details)
            .bind(&input.syntax)
            .bind(&input.category)
            .bind(&input.difficulty)
            .bind(keywords)
            .bind(examples)
            .fetch_one(&mut *tx)
            .await?;

            ids.push(row.get(0));
        }

        tx.commit().await?;
        info!(count = ids.len(), "imported catalog records");

        Ok(ids)
    }

    /// Load the full record set
    pub async fn all_records(&self) -> Result<Vec<Record>> {
        let rows = sqlx::query_as::<_, RecordRow>("SELECT * FROM records ORDER BY id ASC")
            .fetch_all(self.pool())
            .await?;

        Ok(rows.into_iter().map(Record::from).collect())
    }

    /// First `limit` records in catalog order
    pub async fn browse_records(&self, limit: i64) -> Result<Vec<Record>> {
        let rows =
            sqlx::query_as::<_, RecordRow>("SELECT * FROM records ORDER BY id ASC LIMIT ?")
                .bind(limit)
                .fetch_all(self.pool())
                .await?;

        Ok(rows.into_iter().map(Record::from).collect())
    }

    /// Total number of records, independent of any page bound
    pub async fn count_records(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM records")
            .fetch_one(self.pool())
            .await?;

        Ok(count.0)
    }

    /// Get record by ID
    pub async fn get_record_by_id(&self, id: i64) -> Result<Option<Record>> {
        let row = sqlx::query_as::<_, RecordRow>("SELECT * FROM records WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        Ok(row.map(Record::from))
    }
}
