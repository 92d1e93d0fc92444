//! SQLite Document Store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::DbPool;
use crate::application::ports::{DocumentStorePort, StoreError, StoredDocument};

/// SQLite 文档存储
pub struct SqliteDocumentStore {
    pool: DbPool,
}

impl SqliteDocumentStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct DocumentRow {
    data: String,
    update_time: String,
}

impl TryFrom<DocumentRow> for StoredDocument {
    type Error = StoreError;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        Ok(StoredDocument {
            data: serde_json::from_str(&row.data)
                .map_err(|e| StoreError::Corrupted(e.to_string()))?,
            update_time: DateTime::parse_from_rfc3339(&row.update_time)
                .map_err(|e| StoreError::Corrupted(e.to_string()))?
                .with_timezone(&Utc),
        })
    }
}

#[async_trait]
impl DocumentStorePort for SqliteDocumentStore {
    async fn write(
        &self,
        collection: &str,
        key: &str,
        document: &serde_json::Value,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO documents (collection, key, data, update_time)
            VALUES (?, ?, ?, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            ON CONFLICT(collection, key) DO UPDATE SET
                data = excluded.data,
                update_time = excluded.update_time
            "#,
        )
        .bind(collection)
        .bind(key)
        .bind(document.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Ok(())
    }

    async fn read(&self, collection: &str, key: &str) -> Result<StoredDocument, StoreError> {
        let row: Option<DocumentRow> = sqlx::query_as(
            "SELECT data, update_time FROM documents WHERE collection = ? AND key = ?",
        )
        .bind(collection)
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        row.ok_or_else(|| StoreError::NotFound(format!("{}/{}", collection, key)))?
            .try_into()
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("SQLite document store closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::sqlite::{create_pool, run_migrations, DatabaseConfig};
    use serde_json::json;

    async fn store() -> SqliteDocumentStore {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteDocumentStore::new(pool)
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let store = store().await;
        let before = Utc::now() - chrono::Duration::seconds(1);

        store
            .write("cache", "track_abc", &json!({"key": "track_abc", "value": "v", "ttl": 1000}))
            .await
            .unwrap();

        let doc = store.read("cache", "track_abc").await.unwrap();
        assert_eq!(doc.data["value"], "v");
        assert!(doc.update_time >= before);
    }

    #[tokio::test]
    async fn test_upsert_overwrites() {
        let store = store().await;
        store.write("cache", "k", &json!(1)).await.unwrap();
        store.write("cache", "k", &json!(2)).await.unwrap();

        assert_eq!(store.read("cache", "k").await.unwrap().data, json!(2));
    }

    #[tokio::test]
    async fn test_read_missing() {
        let store = store().await;
        let err = store.read("cache", "missing").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_corrupted_row() {
        let store = store().await;
        sqlx::query(
            "INSERT INTO documents (collection, key, data, update_time) VALUES ('cache', 'bad', '{oops', 'yesterday')",
        )
        .execute(&store.pool)
        .await
        .unwrap();

        let err = store.read("cache", "bad").await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupted(_)));
    }
}
