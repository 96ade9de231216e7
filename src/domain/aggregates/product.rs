//! Product Aggregate

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::{Validate, ValidationError};
use crate::domain::value_objects::Money;

pub const DEFAULT_RATING: f64 = 4.5;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
pub struct Product {
    #[validate(length(min = 1))]
    pub title: String,
    pub description: Option<String>,
    #[validate(custom = "non_negative")]
    pub price: Money,
    #[validate(custom = "non_negative")]
    pub compare_at_price: Option<Money>,
    pub category_slug: String,
    pub brand: Option<String>,
    pub sku: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default = "default_rating")]
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: f64,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

fn default_rating() -> f64 { DEFAULT_RATING }

pub(crate) fn non_negative(amount: &Money) -> Result<(), ValidationError> {
    if amount.is_negative() { return Err(ValidationError::new("negative_amount")); }
    Ok(())
}

impl Product {
    pub fn create(title: impl Into<String>, price: Money, category_slug: impl Into<String>) -> Self {
        Self {
            title: title.into(), description: None, price, compare_at_price: None,
            category_slug: category_slug.into(), brand: None, sku: None, images: vec![],
            rating: DEFAULT_RATING, stock: 0, attributes: HashMap::new(),
        }
    }

    /// Case-insensitive substring match over title and description.
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.as_deref().unwrap_or_default().to_lowercase().contains(needle)
    }
}
