//! Catalog reader: read-only queries over categories and products.

use std::sync::Arc;

use tracing::instrument;

use crate::domain::aggregates::{Category, Product};
use crate::store::{Collection, DocumentId, DocumentStore, Filter, Record, StoredDocument};
use crate::{EcommerceError, Result};

#[derive(Clone)]
pub struct CatalogReader {
    store: Arc<dyn DocumentStore>,
}

impl CatalogReader {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// All categories in storage order.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Record<Category>>> {
        let docs = self.store.find_many(Collection::Category, Filter::all()).await?;
        decode_all(docs)
    }

    /// Products in `category_slug`, optionally narrowed to a case-insensitive text match
    /// on title or description. The text match runs after the category query.
    #[instrument(skip(self))]
    pub async fn list_products(&self, category_slug: Option<&str>, query: Option<&str>) -> Result<Vec<Record<Product>>> {
        let filter = match category_slug {
            Some(slug) => Filter::all().where_eq("category_slug", slug),
            None => Filter::all(),
        };
        let mut products = decode_all::<Product>(self.store.find_many(Collection::Product, filter).await?)?;
        if let Some(q) = query {
            let needle = q.to_lowercase();
            products.retain(|p| p.doc.matches(&needle));
        }
        Ok(products)
    }

    /// Fails with `InvalidReference` for a malformed id and `NotFound` for an unknown one.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: &str) -> Result<Record<Product>> {
        let id: DocumentId = id.parse()?;
        let doc = self
            .store
            .find_one_by_id(Collection::Product, id)
            .await?
            .ok_or(EcommerceError::NotFound("Product"))?;
        Ok(doc.decode()?)
    }
}

fn decode_all<T: serde::de::DeserializeOwned>(docs: Vec<StoredDocument>) -> Result<Vec<Record<T>>> {
    docs.into_iter().map(|d| d.decode().map_err(EcommerceError::from)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Money;
    use crate::store::{to_document, MemoryStore};
    use testresult::TestResult;

    async fn catalog() -> (CatalogReader, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let mut headphones = Product::create("Wireless Headphones", Money::from_cents(12999), "electronics");
        headphones.description = Some("Noise-cancelling over-ear headphones".into());
        let mut speaker = Product::create("Bluetooth Speaker", Money::from_cents(4999), "electronics");
        speaker.description = Some("Portable WIRELESS speaker".into());
        let cable = Product::create("USB Cable", Money::from_cents(999), "electronics");
        let serum = Product::create("Wireless Serum", Money::from_cents(2450), "beauty");
        for p in [headphones, speaker, cable, serum] {
            store.insert(Collection::Product, to_document(&p).unwrap()).await.unwrap();
        }
        (CatalogReader::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_list_products_by_category() -> TestResult {
        let (catalog, _) = catalog().await;
        let products = catalog.list_products(Some("electronics"), None).await?;
        assert_eq!(products.len(), 3);
        assert!(products.iter().all(|p| p.doc.category_slug == "electronics"));
        assert_eq!(catalog.list_products(None, None).await?.len(), 4);
        assert!(catalog.list_products(Some("garden"), None).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_list_products_with_query() -> TestResult {
        let (catalog, _) = catalog().await;
        let titles: Vec<_> = catalog
            .list_products(Some("electronics"), Some("wireless"))
            .await?
            .into_iter()
            .map(|p| p.doc.title)
            .collect();
        assert_eq!(titles, vec!["Wireless Headphones", "Bluetooth Speaker"]);
        assert_eq!(catalog.list_products(None, Some("WIRELESS")).await?.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_product() -> TestResult {
        let (catalog, store) = catalog().await;
        let first = store.find_many(Collection::Product, Filter::all()).await?.remove(0);
        let product = catalog.get_product(&first.id.to_string()).await?;
        assert_eq!(product.doc.title, "Wireless Headphones");
        Ok(())
    }

    #[tokio::test]
    async fn test_get_product_errors() {
        let (catalog, _) = catalog().await;
        assert!(matches!(catalog.get_product("not-an-id").await, Err(EcommerceError::InvalidReference(_))));
        let unknown = DocumentId::generate().to_string();
        assert!(matches!(catalog.get_product(&unknown).await, Err(EcommerceError::NotFound("Product"))));
    }

    #[tokio::test]
    async fn test_list_categories_in_insert_order() -> TestResult {
        let (catalog, store) = catalog().await;
        for c in [Category::new("Beauty", "beauty"), Category::new("Clothing", "clothing")] {
            store.insert(Collection::Category, to_document(&c)?).await?;
        }
        let slugs: Vec<_> = catalog.list_categories().await?.into_iter().map(|c| c.doc.slug).collect();
        assert_eq!(slugs, vec!["beauty", "clothing"]);
        Ok(())
    }
}
