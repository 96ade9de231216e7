//! Sample catalog data for empty stores.

use std::collections::HashMap;

use tracing::{info, instrument};

use crate::domain::aggregates::{Category, Product};
use crate::domain::value_objects::Money;
use crate::store::{to_document, Collection, DocumentStore, Filter};
use crate::Result;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub categories: usize,
    pub products: usize,
}

/// Inserts sample categories and products. Each collection is only seeded while empty,
/// so repeated calls are no-ops.
#[instrument(skip(store))]
pub async fn seed(store: &dyn DocumentStore) -> Result<SeedReport> {
    let mut report = SeedReport::default();
    if store.count(Collection::Category, Filter::all()).await? == 0 {
        for category in sample_categories() {
            store.insert(Collection::Category, to_document(&category)?).await?;
            report.categories += 1;
        }
    }
    if store.count(Collection::Product, Filter::all()).await? == 0 {
        for product in sample_products() {
            store.insert(Collection::Product, to_document(&product)?).await?;
            report.products += 1;
        }
    }
    info!(categories = report.categories, products = report.products, "seed complete");
    Ok(report)
}

pub fn sample_categories() -> Vec<Category> {
    vec![
        Category::new("Electronics", "electronics").with_image("https://images.unsplash.com/photo-1518779578993-ec3579fee39f"),
        Category::new("Home & Kitchen", "home-kitchen").with_image("https://images.unsplash.com/photo-1495546968767-f0573cca821e"),
        Category::new("Beauty", "beauty").with_image("https://images.unsplash.com/photo-1512496015851-a90fb38ba796"),
        Category::new("Clothing", "clothing").with_image("https://images.unsplash.com/photo-1520975916090-3105956dac38"),
    ]
}

#[allow(clippy::too_many_arguments)]
fn sample(
    title: &str, description: &str, cents: i64, category_slug: &str, brand: &str, sku: &str,
    image: &str, rating: f64, stock: u32, attribute: (&str, &str),
) -> Product {
    let mut p = Product::create(title, Money::from_cents(cents), category_slug);
    p.description = Some(description.to_string());
    p.brand = Some(brand.to_string());
    p.sku = Some(sku.to_string());
    p.images = vec![image.to_string()];
    p.rating = rating;
    p.stock = stock;
    p.attributes = HashMap::from([(attribute.0.to_string(), attribute.1.to_string())]);
    p
}

pub fn sample_products() -> Vec<Product> {
    let mut headphones = sample(
        "Wireless Headphones", "Noise-cancelling over-ear headphones", 12999, "electronics", "SoundMax", "HD-1001",
        "https://images.unsplash.com/photo-1512314889357-e157c22f938d", 4.6, 25, ("color", "black"),
    );
    headphones.compare_at_price = Some(Money::from_cents(17999));
    vec![
        headphones,
        sample(
            "Stainless Cookware Set", "10-piece pots and pans set", 8900, "home-kitchen", "ChefPro", "CK-2002",
            "https://images.unsplash.com/photo-1514517220039-39c7b53c0b18", 4.4, 40, ("pieces", "10"),
        ),
        sample(
            "Organic Face Serum", "Vitamin C brightening serum", 2450, "beauty", "GlowLab", "GL-3003",
            "https://images.unsplash.com/photo-1611930022073-b7a4ba5fcccd", 4.7, 60, ("size", "30ml"),
        ),
    ]
}
