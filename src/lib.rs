//! Storefront
//!
//! Department store backend: catalog browsing, a session keyed shopping cart and a
//! checkout that turns the cart into an order.
//!
//! ## Features
//! - Category and product catalog with category filter and text search
//! - One cart per session, subtotal always recomputed server side
//! - Checkout with flat-rate tax, order persisted before the cart is cleared
//! - Pluggable document store (in-memory or PostgreSQL JSONB)

use thiserror::Error;

pub mod api;
pub mod config;
pub mod domain;
pub mod services;
pub mod store;

pub use store::StoreError;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum EcommerceError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Invalid reference: {0}")]
    InvalidReference(#[from] store::InvalidDocumentId),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl From<validator::ValidationErrors> for EcommerceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

impl From<domain::value_objects::MoneyError> for EcommerceError {
    fn from(error: domain::value_objects::MoneyError) -> Self {
        Self::Validation(error.to_string())
    }
}

/// Longest excerpt of a backend error shown to callers.
pub const MAX_DETAIL: usize = 50;

/// Char-boundary safe prefix of at most `max_chars` characters.
pub fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

pub type Result<T> = std::result::Result<T, EcommerceError>;
