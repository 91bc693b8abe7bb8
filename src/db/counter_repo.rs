use sqlx::{SqliteConnection, SqlitePool};

use crate::error::Result;
use crate::models::{Collection, Counter};

/// Per-collection sequence counters.
///
/// Ids are minted with a single upsert statement, so the read of the current
/// value and the write of its successor happen under one write lock and two
/// callers can never observe the same value.
#[derive(Clone)]
pub struct CounterRepository {
    pool: SqlitePool,
}

impl CounterRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Allocate the next id for `collection_name`, creating the counter at 1
    /// if it does not exist yet.
    pub async fn next_id(&self, collection_name: &str) -> Result<i64> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO contadores (collection_name, sequence_value)
            VALUES (?, 1)
            ON CONFLICT(collection_name) DO UPDATE SET sequence_value = sequence_value + 1
            RETURNING sequence_value
            "#,
        )
        .bind(collection_name)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(collection = collection_name, id, "Allocated id");
        Ok(id)
    }

    pub async fn list_counters(&self) -> Result<Vec<Counter>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT collection_name, sequence_value FROM contadores ORDER BY collection_name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(collection_name, sequence_value)| Counter {
                collection_name,
                sequence_value,
            })
            .collect())
    }

    pub async fn get(&self, collection_name: &str) -> Result<Option<Counter>> {
        let row: Option<(String, i64)> = sqlx::query_as(
            "SELECT collection_name, sequence_value FROM contadores WHERE collection_name = ?",
        )
        .bind(collection_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(collection_name, sequence_value)| Counter {
            collection_name,
            sequence_value,
        }))
    }

    /// Drop every counter and recreate the known collections at 0.
    /// Only the seeder calls this.
    pub(crate) async fn reset_all(conn: &mut SqliteConnection) -> Result<()> {
        sqlx::query("DELETE FROM contadores")
            .execute(&mut *conn)
            .await?;

        for collection in Collection::ALL {
            sqlx::query("INSERT INTO contadores (collection_name, sequence_value) VALUES (?, 0)")
                .bind(collection.name())
                .execute(&mut *conn)
                .await?;
        }
        Ok(())
    }

    /// Force a counter to `value`. Only the seeder calls this.
    pub(crate) async fn set(
        conn: &mut SqliteConnection,
        collection_name: &str,
        value: i64,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO contadores (collection_name, sequence_value)
            VALUES (?, ?)
            ON CONFLICT(collection_name) DO UPDATE SET sequence_value = excluded.sequence_value
            "#,
        )
        .bind(collection_name)
        .bind(value)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }
}
