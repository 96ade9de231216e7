//! Order Aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::domain::aggregates::cart::CartItem;
use crate::domain::value_objects::{Money, MoneyError, SessionId, TAX_RATE};

/// Placed once per successful checkout and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub session_id: SessionId,
    pub customer: Customer,
    pub items: Vec<OrderItem>,
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
    #[serde(default)]
    pub status: OrderStatus,
    pub placed_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: String,
    pub title: String,
    pub price: Money,
    /// Copied from the cart line, so also capped at `u32::MAX`.
    pub quantity: u32,
    pub image: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus { #[default] Processing }

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
pub struct Customer {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String { "US".to_string() }

impl From<&CartItem> for OrderItem {
    fn from(item: &CartItem) -> Self {
        Self { product_id: item.product_id.clone(), title: item.title.clone(), price: item.price, quantity: item.quantity, image: item.image.clone() }
    }
}

impl Order {
    /// Prices an order from a subtotal that was already computed at cart-write time.
    pub fn place(session_id: SessionId, customer: Customer, items: Vec<OrderItem>, subtotal: Money) -> Result<Self, MoneyError> {
        let tax = subtotal.percentage(TAX_RATE)?;
        let total = subtotal.checked_add(tax)?.round_cents();
        Ok(Self { session_id, customer, items, subtotal, tax, total, status: OrderStatus::Processing, placed_at: Some(Utc::now()) })
    }

    pub fn total(&self) -> Money { self.total }
    pub fn status(&self) -> &OrderStatus { &self.status }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn customer() -> Customer {
        Customer {
            name: "Ada Lovelace".into(), email: "ada@example.com".into(), phone: None,
            address_line1: "1 Analytical Way".into(), address_line2: None, city: "London".into(),
            state: "LDN".into(), postal_code: "N1".into(), country: default_country(),
        }
    }

    #[test]
    fn test_order_pricing() {
        let order = Order::place("s1".into(), customer(), vec![], Money::from_cents(2500)).unwrap();
        assert_eq!(order.tax, Money::from_cents(200));
        assert_eq!(order.total(), Money::from_cents(2700));
        assert_eq!(order.status(), &OrderStatus::Processing);
        assert!(order.placed_at.is_some());
    }

    #[test]
    fn test_order_pricing_overflow() {
        let huge = Money::new(rust_decimal::Decimal::MAX);
        assert_eq!(Order::place("s1".into(), customer(), vec![], huge), Err(MoneyError::Overflow));
    }

    #[test]
    fn test_customer_email_validation() {
        assert!(customer().validate().is_ok());
        let mut bad = customer();
        bad.email = "not-an-email".into();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_customer_country_default() {
        let c: Customer = serde_json::from_value(serde_json::json!({
            "name": "Ada", "email": "ada@example.com", "address_line1": "1 Way",
            "city": "London", "state": "LDN", "postal_code": "N1"
        })).unwrap();
        assert_eq!(c.country, "US");
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_value(OrderStatus::Processing).unwrap(), serde_json::json!("processing"));
    }
}
