//! Checkout processor: cart to order.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::domain::aggregates::{Customer, Order, OrderItem};
use crate::domain::events::{CartEvent, DomainEvent, OrderEvent};
use crate::domain::value_objects::{Money, SessionId};
use crate::services::cart::{session_filter, CartManager};
use crate::services::publisher::EventPublisher;
use crate::store::{to_document, Collection, DocumentId, DocumentStore};
use crate::{EcommerceError, Result};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CheckoutReceipt {
    pub order_id: DocumentId,
    pub total: Money,
}

#[derive(Clone)]
pub struct CheckoutProcessor {
    store: Arc<dyn DocumentStore>,
    carts: CartManager,
    events: EventPublisher,
}

impl CheckoutProcessor {
    pub fn new(store: Arc<dyn DocumentStore>, carts: CartManager, events: EventPublisher) -> Self {
        Self { store, carts, events }
    }

    /// Places an order from the session's cart, then deletes the cart.
    ///
    /// The order insert completes before the cart delete is issued, so a failure in
    /// between leaves the cart in place. The two writes are not atomic, and concurrent
    /// checkouts of one session may both succeed.
    #[instrument(skip(self, customer))]
    pub async fn checkout(&self, session_id: SessionId, customer: Customer) -> Result<CheckoutReceipt> {
        customer.validate()?;

        let cart = match self.carts.find_cart(&session_id).await? {
            Some(record) if !record.doc.is_empty() => record.doc,
            _ => return Err(EcommerceError::EmptyCart),
        };

        // Snapshot copy; current catalog prices are deliberately not consulted.
        let items: Vec<OrderItem> = cart.items().iter().map(OrderItem::from).collect();
        let order = Order::place(session_id.clone(), customer, items, cart.subtotal())?;
        let total = order.total();

        let order_id = self.store.insert(Collection::Order, to_document(&order)?).await?;
        info!(%order_id, %session_id, %total, "order placed");
        self.events
            .publish(DomainEvent::Order(OrderEvent::Placed { order_id, session_id: session_id.clone(), total }))
            .await;

        if self.store.delete_one_by_filter(Collection::Cart, session_filter(&session_id)).await? == 0 {
            warn!(%session_id, "cart vanished before it could be cleared");
        }
        self.events.publish(DomainEvent::Cart(CartEvent::Cleared { session_id })).await;

        Ok(CheckoutReceipt { order_id, total })
    }
}
