//! Document store adapter.
//!
//! Services never talk to a database directly; they go through [`DocumentStore`],
//! which is constructed once at startup and shared as `Arc<dyn DocumentStore>`.
//!
//! Implementations:
//! - [`MemoryStore`]: in-process, insertion ordered
//! - [`PgDocumentStore`]: PostgreSQL JSONB table

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Schema-free document body.
pub type Document = Map<String, Value>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Malformed document: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Document must be a JSON object")]
    NotAnObject,
}

/// Entity kind to collection name. Kept explicit rather than derived from type names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Collection {
    Category,
    Product,
    Cart,
    Order,
}

impl Collection {
    pub const ALL: [Collection; 4] = [Self::Category, Self::Product, Self::Cart, Self::Order];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Product => "product",
            Self::Cart => "cart",
            Self::Order => "order",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

/// Backend key. Opaque string at the API boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    pub fn generate() -> Self { Self(Uuid::now_v7()) }
    pub fn as_uuid(&self) -> Uuid { self.0 }
}

impl From<Uuid> for DocumentId {
    fn from(value: Uuid) -> Self { Self(value) }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("'{0}' is not a valid document id")]
pub struct InvalidDocumentId(pub String);

impl FromStr for DocumentId {
    type Err = InvalidDocumentId;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self).map_err(|_| InvalidDocumentId(s.to_string()))
    }
}

/// Top-level field equality; the empty filter matches every document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filter(Document);

impl Filter {
    pub fn all() -> Self { Self::default() }

    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn matches(&self, document: &Document) -> bool {
        self.0.iter().all(|(field, expected)| document.get(field) == Some(expected))
    }

    pub fn as_document(&self) -> &Document { &self.0 }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StoredDocument {
    pub id: DocumentId,
    pub body: Document,
}

impl StoredDocument {
    pub fn decode<T: DeserializeOwned>(self) -> Result<Record<T>> {
        Ok(Record { id: self.id, doc: serde_json::from_value(Value::Object(self.body))? })
    }
}

/// A typed document together with its key, rendered with the key under `_id`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Record<T> {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    #[serde(flatten)]
    pub doc: T,
}

/// Turns a value into a document body. Fails if it does not serialize to a JSON object.
pub fn to_document<T: Serialize>(value: &T) -> Result<Document> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::NotAnObject),
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StoreInfo {
    pub backend: &'static str,
    pub database_name: String,
}

/// Interface for document persistence. Each call is atomic for the single document it touches;
/// nothing spans documents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document and return its newly assigned key.
    async fn insert(&self, collection: Collection, document: Document) -> Result<DocumentId>;

    async fn find_many(&self, collection: Collection, filter: Filter) -> Result<Vec<StoredDocument>>;

    async fn find_one_by_id(&self, collection: Collection, id: DocumentId) -> Result<Option<StoredDocument>>;

    async fn find_one_by_filter(&self, collection: Collection, filter: Filter) -> Result<Option<StoredDocument>>;

    /// Overwrite the given top-level fields, leaving the rest of the document untouched.
    async fn update_one_by_id(&self, collection: Collection, id: DocumentId, fields: Document) -> Result<()>;

    /// Delete the first matching document. Returns the number of documents removed (0 or 1).
    async fn delete_one_by_filter(&self, collection: Collection, filter: Filter) -> Result<u64>;

    async fn count(&self, collection: Collection, filter: Filter) -> Result<u64>;

    /// Names of collections that currently hold documents.
    async fn list_collections(&self) -> Result<Vec<String>>;

    fn describe(&self) -> StoreInfo;
}
