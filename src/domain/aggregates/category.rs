//! Category Aggregate

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
pub struct Category {
    #[validate(length(min = 1))]
    pub name: String,
    /// URL-safe key referenced by `Product::category_slug`.
    #[validate(length(min = 1))]
    pub slug: String,
    pub image: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<String>,
}

impl Category {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self { name: name.into(), slug: slug.into(), image: None, description: None, parent_id: None }
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self { self.image = Some(url.into()); self }
}
