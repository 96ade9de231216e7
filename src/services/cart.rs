//! Cart manager: one cart document per session, fully replaced on every write.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument};
use validator::Validate;

use crate::domain::aggregates::{Cart, CartItem};
use crate::domain::events::{CartEvent, DomainEvent};
use crate::domain::value_objects::{Money, SessionId};
use crate::services::publisher::EventPublisher;
use crate::store::{to_document, Collection, DocumentId, DocumentStore, Filter, Record};
use crate::Result;

/// A stored cart, or the synthetic empty cart when the session has none.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CartView {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    #[serde(flatten)]
    pub cart: Cart,
}

#[derive(Clone)]
pub struct CartManager {
    store: Arc<dyn DocumentStore>,
    events: EventPublisher,
}

pub(crate) fn session_filter(session_id: &SessionId) -> Filter {
    Filter::all().where_eq("session_id", session_id.as_str())
}

impl CartManager {
    pub fn new(store: Arc<dyn DocumentStore>, events: EventPublisher) -> Self {
        Self { store, events }
    }

    /// Replace the session's cart with `items` and return the recomputed subtotal.
    /// Two concurrent writes for one session race; the last one wins.
    #[instrument(skip(self, items), fields(items = items.len()))]
    pub async fn upsert_cart(&self, session_id: SessionId, items: Vec<CartItem>) -> Result<Money> {
        let cart = Cart::new(session_id, items)?;
        cart.validate()?;
        let fields = to_document(&cart)?;

        match self.store.find_one_by_filter(Collection::Cart, session_filter(cart.session_id())).await? {
            Some(existing) => self.store.update_one_by_id(Collection::Cart, existing.id, fields).await?,
            None => {
                self.store.insert(Collection::Cart, fields).await?;
            }
        }

        info!(session_id = %cart.session_id(), subtotal = %cart.subtotal(), "cart saved");
        self.events
            .publish(DomainEvent::Cart(CartEvent::Updated {
                session_id: cart.session_id().clone(),
                item_count: cart.items().len(),
                subtotal: cart.subtotal(),
            }))
            .await;
        Ok(cart.subtotal())
    }

    /// Never fails for a missing cart; an unknown session reads as an empty cart.
    #[instrument(skip(self))]
    pub async fn get_cart(&self, session_id: SessionId) -> Result<CartView> {
        Ok(match self.find_cart(&session_id).await? {
            Some(record) => CartView { id: Some(record.id), cart: record.doc },
            None => CartView { id: None, cart: Cart::empty(session_id) },
        })
    }

    /// The stored cart with no empty-cart substitution.
    pub(crate) async fn find_cart(&self, session_id: &SessionId) -> Result<Option<Record<Cart>>> {
        let doc = self.store.find_one_by_filter(Collection::Cart, session_filter(session_id)).await?;
        Ok(doc.map(|d| d.decode()).transpose()?)
    }
}
