use anyhow::Result;

use super::schema::Database;

impl Database {
    // ========================================================================
    // Named Slot Operations
    // ========================================================================

    /// Get a single slot value by key.
    ///
    /// # Returns
    ///
    /// The stored value if the key exists, or `None` if not set.
    pub async fn get_slot(&self, key: &str) -> Result<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM widget_cache WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(value,)| value))
    }

    /// Set several slots in one transaction (UPSERT each).
    ///
    /// Readers never observe a half-written group: either every pair is
    /// visible or none of them is.
    pub async fn set_slots(&self, entries: &[(&str, &str)]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for (key, value) in entries {
            sqlx::query(
                r#"
                INSERT INTO widget_cache (key, value, updated_at)
                VALUES (?, ?, datetime('now'))
                ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            )
            .bind(key)
            .bind(value)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Delete slots by key. Missing keys are ignored.
    ///
    /// Returns the number of rows removed.
    pub async fn delete_slots(&self, keys: &[&str]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut removed = 0;

        for key in keys {
            let result = sqlx::query("DELETE FROM widget_cache WHERE key = ?")
                .bind(key)
                .execute(&mut *tx)
                .await?;
            removed += result.rows_affected();
        }

        tx.commit().await?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::Database;

    async fn test_db() -> Database {
        Database::open(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_get_slot_missing() {
        let db = test_db().await;
        let value = db.get_slot("nonexistent").await.unwrap();
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_set_and_get_slots() {
        let db = test_db().await;
        db.set_slots(&[("a", "1"), ("b", "2")]).await.unwrap();

        assert_eq!(db.get_slot("a").await.unwrap(), Some("1".to_string()));
        assert_eq!(db.get_slot("b").await.unwrap(), Some("2".to_string()));
    }

    #[tokio::test]
    async fn test_set_slots_upsert() {
        let db = test_db().await;
        db.set_slots(&[("a", "old")]).await.unwrap();
        db.set_slots(&[("a", "new")]).await.unwrap();

        assert_eq!(db.get_slot("a").await.unwrap(), Some("new".to_string()));
    }

    #[tokio::test]
    async fn test_delete_slots() {
        let db = test_db().await;
        db.set_slots(&[("a", "1"), ("b", "2")]).await.unwrap();

        let removed = db.delete_slots(&["a", "b", "missing"]).await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(db.get_slot("a").await.unwrap(), None);
        assert_eq!(db.get_slot("b").await.unwrap(), None);
    }
}
