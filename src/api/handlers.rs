//! Request handlers. Each maps one route onto one service call.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::{ApiError, AppState};
use crate::domain::aggregates::{Cart, Category, Customer, Product};
use crate::domain::value_objects::{Money, SessionId};
use crate::services::diagnostics::{diagnose, DiagnosticsReport};
use crate::services::{seed as seeding, CartView};
use crate::store::{DocumentId, Record};

type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug, Serialize)]
pub struct Message { pub message: &'static str }

#[derive(Debug, Serialize)]
pub struct Status { pub status: &'static str }

#[derive(Debug, Serialize)]
pub struct CartSaved { pub status: &'static str, pub subtotal: Money }

#[derive(Debug, Serialize)]
pub struct OrderPlaced { pub status: &'static str, pub order_id: DocumentId, pub total: Money }

#[derive(Debug, Deserialize)]
pub struct ProductQuery { pub category: Option<String>, pub q: Option<String> }

#[derive(Debug, Deserialize)]
pub struct CheckoutPayload { pub session_id: SessionId, pub customer: Customer }

pub async fn health() -> Json<Message> {
    Json(Message { message: "Department Store API is running" })
}

pub async fn diagnostics(State(s): State<AppState>) -> Json<DiagnosticsReport> {
    Json(diagnose(s.store.as_ref(), s.database_url_set).await)
}

pub async fn seed(State(s): State<AppState>) -> ApiResult<Status> {
    seeding::seed(s.store.as_ref()).await?;
    Ok(Json(Status { status: "ok" }))
}

pub async fn list_categories(State(s): State<AppState>) -> ApiResult<Vec<Record<Category>>> {
    Ok(Json(s.catalog.list_categories().await?))
}

pub async fn list_products(
    State(s): State<AppState>,
    query: Result<Query<ProductQuery>, QueryRejection>,
) -> ApiResult<Vec<Record<Product>>> {
    let Query(p) = query?;
    let category = p.category.as_deref().filter(|c| !c.is_empty());
    let q = p.q.as_deref().filter(|q| !q.is_empty());
    Ok(Json(s.catalog.list_products(category, q).await?))
}

pub async fn get_product(State(s): State<AppState>, id: Result<Path<String>, PathRejection>) -> ApiResult<Record<Product>> {
    let Path(id) = id?;
    Ok(Json(s.catalog.get_product(&id).await?))
}

pub async fn upsert_cart(State(s): State<AppState>, payload: Result<Json<Cart>, JsonRejection>) -> ApiResult<CartSaved> {
    let Json(cart) = payload?;
    let subtotal = s.carts.upsert_cart(cart.session_id, cart.items).await?;
    Ok(Json(CartSaved { status: "ok", subtotal }))
}

pub async fn get_cart(State(s): State<AppState>, session_id: Result<Path<String>, PathRejection>) -> ApiResult<CartView> {
    let Path(session_id) = session_id?;
    Ok(Json(s.carts.get_cart(SessionId::new(session_id)).await?))
}

pub async fn checkout(
    State(s): State<AppState>,
    payload: Result<Json<CheckoutPayload>, JsonRejection>,
) -> ApiResult<OrderPlaced> {
    let Json(p) = payload?;
    let receipt = s.checkout.checkout(p.session_id, p.customer).await?;
    Ok(Json(OrderPlaced { status: "ok", order_id: receipt.order_id, total: receipt.total }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use testresult::TestResult;
    use tower::ServiceExt;

    use crate::api::{router, AppState};
    use crate::services::EventPublisher;
    use crate::store::{MemoryStore, MockDocumentStore, StoreError};

    fn app() -> Router {
        router(AppState::new(Arc::new(MemoryStore::new()), EventPublisher::disabled(), false))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> TestResult<(StatusCode, Value)> {
        let request = Request::builder().method(method).uri(uri).header("content-type", "application/json");
        let request = match body {
            Some(body) => request.body(Body::from(serde_json::to_vec(&body)?))?,
            None => request.body(Body::empty())?,
        };
        let response = app.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
        Ok((status, value))
    }

    fn customer() -> Value {
        json!({
            "name": "Ada Lovelace", "email": "ada@example.com", "address_line1": "1 Analytical Way",
            "city": "London", "state": "LDN", "postal_code": "N1"
        })
    }

    #[tokio::test]
    async fn test_health() -> TestResult {
        let (status, body) = send(&app(), Method::GET, "/", None).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Department Store API is running"}));
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_and_browse() -> TestResult {
        let app = app();
        let (status, body) = send(&app, Method::POST, "/seed", None).await?;
        assert_eq!((status, body), (StatusCode::OK, json!({"status": "ok"})));
        send(&app, Method::POST, "/seed", None).await?;

        let (_, categories) = send(&app, Method::GET, "/categories", None).await?;
        assert_eq!(categories.as_array().map(Vec::len), Some(4));
        assert!(categories[0]["_id"].is_string());

        let (_, products) = send(&app, Method::GET, "/products?category=electronics&q=WIRELESS", None).await?;
        assert_eq!(products.as_array().map(Vec::len), Some(1));
        assert_eq!(products[0]["price"], json!(129.99));

        let id = products[0]["_id"].as_str().unwrap_or_default().to_string();
        let (status, product) = send(&app, Method::GET, &format!("/products/{id}"), None).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(product["title"], "Wireless Headphones");
        Ok(())
    }

    #[tokio::test]
    async fn test_get_product_errors() -> TestResult {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/products/xyz", None).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_reference");

        let unknown = crate::store::DocumentId::generate();
        let (status, body) = send(&app, Method::GET, &format!("/products/{unknown}"), None).await?;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
        Ok(())
    }

    #[tokio::test]
    async fn test_cart_and_checkout_flow() -> TestResult {
        let app = app();
        let cart = json!({
            "session_id": "s1",
            "items": [
                {"product_id": "p1", "title": "Widget", "price": 10.0, "quantity": 2},
                {"product_id": "p2", "title": "Gadget", "price": 5.0}
            ],
            "subtotal": 999.0
        });
        let (status, body) = send(&app, Method::POST, "/cart", Some(cart)).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok", "subtotal": 25.0}));

        let (_, stored) = send(&app, Method::GET, "/cart/s1", None).await?;
        assert_eq!(stored["subtotal"], json!(25.0));
        assert_eq!(stored["items"][1]["quantity"], json!(1));

        let (status, body) = send(&app, Method::POST, "/checkout", Some(json!({"session_id": "s1", "customer": customer()}))).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["total"], json!(27.0));
        assert!(body["order_id"].is_string());

        let (_, cleared) = send(&app, Method::GET, "/cart/s1", None).await?;
        assert_eq!(cleared, json!({"session_id": "s1", "items": [], "subtotal": 0.0}));
        Ok(())
    }

    #[tokio::test]
    async fn test_checkout_empty_cart_is_client_error() -> TestResult {
        let (status, body) = send(&app(), Method::POST, "/checkout", Some(json!({"session_id": "s1", "customer": customer()}))).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "empty_cart", "message": "Cart is empty"}));
        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_payloads_are_validation_errors() -> TestResult {
        let app = app();
        let mut bad_customer = customer();
        bad_customer["email"] = json!("not-an-email");
        let (status, body) = send(&app, Method::POST, "/checkout", Some(json!({"session_id": "s1", "customer": bad_customer}))).await?;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "validation_error");

        let (status, body) = send(&app, Method::POST, "/cart", Some(json!({"items": []}))).await?;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "validation_error");

        let zero = json!({"session_id": "s1", "items": [{"product_id": "p", "title": "t", "price": 1.0, "quantity": 0}]});
        let (status, _) = send(&app, Method::POST, "/cart", Some(zero)).await?;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        Ok(())
    }

    #[tokio::test]
    async fn test_overflowing_cart_is_validation_error() -> TestResult {
        let app = app();
        let cart = json!({"session_id": "s1", "items": [{"product_id": "p", "title": "t", "price": 1e20, "quantity": 1_000_000_000}]});
        let (status, body) = send(&app, Method::POST, "/cart", Some(cart)).await?;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "validation_error");
        let (_, stored) = send(&app, Method::GET, "/cart/s1", None).await?;
        assert_eq!(stored["items"], json!([]));
        Ok(())
    }

    #[tokio::test]
    async fn test_storage_failure_is_truncated_500() -> TestResult {
        let mut store = MockDocumentStore::new();
        store.expect_find_many().returning(|_, _| Err(StoreError::Database(sqlx::Error::Protocol("x".repeat(200)))));
        let app = router(AppState::new(Arc::new(store), EventPublisher::disabled(), true));
        let (status, body) = send(&app, Method::GET, "/categories", None).await?;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "storage_error");
        assert!(body["message"].as_str().is_some_and(|m| m.len() < 80));
        Ok(())
    }

    #[tokio::test]
    async fn test_diagnostics() -> TestResult {
        let (status, body) = send(&app(), Method::GET, "/test", None).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["backend"], "running");
        assert_eq!(body["database_url"], "not set");
        Ok(())
    }
}
