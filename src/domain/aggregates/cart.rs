//! Cart Aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::domain::aggregates::product::non_negative;
use crate::domain::value_objects::{Money, MoneyError, SessionId};

/// One cart per session. `subtotal` is always derived from `items`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
pub struct Cart {
    pub session_id: SessionId,
    #[serde(default)]
    #[validate]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub subtotal: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Snapshot of a product at add-time; never resynced with the catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
pub struct CartItem {
    pub product_id: String,
    pub title: String,
    #[validate(custom = "non_negative")]
    pub price: Money,
    /// At least 1; bounded above by `u32::MAX`, larger values are rejected at deserialization.
    #[serde(default = "default_quantity")]
    #[validate(range(min = 1))]
    pub quantity: u32,
    pub image: Option<String>,
}

fn default_quantity() -> u32 { 1 }

impl CartItem {
    pub fn line_total(&self) -> Result<Money, MoneyError> { self.price.checked_multiply(self.quantity) }
}

impl Cart {
    /// The cart reported for a session that has never written one.
    pub fn empty(session_id: SessionId) -> Self {
        Self { session_id, items: vec![], subtotal: Money::ZERO, updated_at: None }
    }

    pub fn new(session_id: SessionId, items: Vec<CartItem>) -> Result<Self, MoneyError> {
        let mut cart = Self::empty(session_id);
        cart.replace_items(items)?;
        Ok(cart)
    }

    pub fn session_id(&self) -> &SessionId { &self.session_id }
    pub fn items(&self) -> &[CartItem] { &self.items }
    pub fn subtotal(&self) -> Money { self.subtotal }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    /// Full overwrite: a shorter list shrinks the cart.
    pub fn replace_items(&mut self, items: Vec<CartItem>) -> Result<(), MoneyError> {
        self.items = items;
        self.recalculate()
    }

    /// Ignores whatever subtotal the client sent and stamps the write time.
    pub fn recalculate(&mut self) -> Result<(), MoneyError> {
        let lines = self.items.iter().map(CartItem::line_total).collect::<Result<Vec<_>, _>>()?;
        self.subtotal = Money::checked_sum(lines)?.round_cents();
        self.updated_at = Some(Utc::now());
        Ok(())
    }
}
