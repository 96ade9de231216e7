//! PostgreSQL document store.
//!
//! Every collection shares one `documents` table; bodies are JSONB. Filters use JSONB
//! containment (`@>`), which for a flat object of scalars is top-level field equality.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::{Collection, Document, DocumentId, DocumentStore, Filter, Result, StoreInfo, StoredDocument};

#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
    database_name: String,
}

#[derive(sqlx::FromRow)]
struct DocumentRow {
    id: Uuid,
    body: Json<Document>,
}

impl From<DocumentRow> for StoredDocument {
    fn from(row: DocumentRow) -> Self {
        Self { id: row.id.into(), body: row.body.0 }
    }
}

impl PgDocumentStore {
    /// Connect, apply migrations and remember which database we landed on.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new().max_connections(max_connections).connect(url).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        let (database_name,): (String,) = sqlx::query_as("SELECT current_database()::text").fetch_one(&pool).await?;
        info!(database = %database_name, "document store connected");
        Ok(Self { pool, database_name })
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert(&self, collection: Collection, document: Document) -> Result<DocumentId> {
        let id = DocumentId::generate();
        sqlx::query("INSERT INTO documents (id, collection, body, created_at) VALUES ($1, $2, $3, NOW())")
            .bind(id.as_uuid())
            .bind(collection.name())
            .bind(Json(&document))
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    async fn find_many(&self, collection: Collection, filter: Filter) -> Result<Vec<StoredDocument>> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, body FROM documents WHERE collection = $1 AND body @> $2 ORDER BY id",
        )
        .bind(collection.name())
        .bind(Json(filter.as_document()))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(StoredDocument::from).collect())
    }

    async fn find_one_by_id(&self, collection: Collection, id: DocumentId) -> Result<Option<StoredDocument>> {
        let row = sqlx::query_as::<_, DocumentRow>("SELECT id, body FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection.name())
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(StoredDocument::from))
    }

    async fn find_one_by_filter(&self, collection: Collection, filter: Filter) -> Result<Option<StoredDocument>> {
        let row = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, body FROM documents WHERE collection = $1 AND body @> $2 ORDER BY id LIMIT 1",
        )
        .bind(collection.name())
        .bind(Json(filter.as_document()))
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(StoredDocument::from))
    }

    async fn update_one_by_id(&self, collection: Collection, id: DocumentId, fields: Document) -> Result<()> {
        sqlx::query("UPDATE documents SET body = body || $3 WHERE collection = $1 AND id = $2")
            .bind(collection.name())
            .bind(id.as_uuid())
            .bind(Json(&fields))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_one_by_filter(&self, collection: Collection, filter: Filter) -> Result<u64> {
        let result = sqlx::query(
            "DELETE FROM documents WHERE id = (SELECT id FROM documents WHERE collection = $1 AND body @> $2 ORDER BY id LIMIT 1)",
        )
        .bind(collection.name())
        .bind(Json(filter.as_document()))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn count(&self, collection: Collection, filter: Filter) -> Result<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM documents WHERE collection = $1 AND body @> $2")
            .bind(collection.name())
            .bind(Json(filter.as_document()))
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }

    async fn list_collections(&self) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT DISTINCT collection FROM documents ORDER BY collection")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    fn describe(&self) -> StoreInfo {
        StoreInfo { backend: "postgres", database_name: self.database_name.clone() }
    }
}
