//! Domain events
use serde::Serialize;
use crate::domain::value_objects::{Money, SessionId};
use crate::store::DocumentId;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DomainEvent {
    Cart(CartEvent),
    Order(OrderEvent),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CartEvent {
    Updated { session_id: SessionId, item_count: usize, subtotal: Money },
    Cleared { session_id: SessionId },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderEvent {
    Placed { order_id: DocumentId, session_id: SessionId, total: Money },
}

impl DomainEvent {
    /// Bus subject the event is published on.
    pub fn subject(&self) -> &'static str {
        match self {
            Self::Cart(CartEvent::Updated { .. }) => "storefront.cart.updated",
            Self::Cart(CartEvent::Cleared { .. }) => "storefront.cart.cleared",
            Self::Order(OrderEvent::Placed { .. }) => "storefront.order.placed",
        }
    }
}
