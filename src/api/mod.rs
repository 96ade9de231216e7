//! HTTP surface.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::services::{CartManager, CatalogReader, CheckoutProcessor, EventPublisher};
use crate::store::DocumentStore;

pub mod error;
mod handlers;

pub use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub catalog: CatalogReader,
    pub carts: CartManager,
    pub checkout: CheckoutProcessor,
    pub database_url_set: bool,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, events: EventPublisher, database_url_set: bool) -> Self {
        let carts = CartManager::new(store.clone(), events.clone());
        Self {
            catalog: CatalogReader::new(store.clone()),
            checkout: CheckoutProcessor::new(store.clone(), carts.clone(), events),
            carts,
            store,
            database_url_set,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route("/test", get(handlers::diagnostics))
        .route("/seed", post(handlers::seed))
        .route("/categories", get(handlers::list_categories))
        .route("/products", get(handlers::list_products))
        .route("/products/:id", get(handlers::get_product))
        .route("/cart", post(handlers::upsert_cart))
        .route("/cart/:session_id", get(handlers::get_cart))
        .route("/checkout", post(handlers::checkout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
