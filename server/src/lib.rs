//! stall HTTP daemon.
//!
//! Serves a JSON CRUD API over two in-memory collections, products and
//! orders. All state lives for the process lifetime only; each store sits
//! behind its own `RwLock` so individual operations are atomic, but nothing
//! coordinates across requests beyond that.
//!
//! Request flow: logging middleware → router → handler → JSON response.
//! Requests that match no route get the fixed 404 envelope; anything a
//! handler fails to catch (including body-parse failures) gets the opaque
//! 500 envelope, with the detail kept in the diagnostic log.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Request, State};
use axum::http::{Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};

use stall_common::id::{IdGenerator, UuidIdGenerator};
use stall_common::order::Order;
use stall_common::product::Product;
use stall_common::store::{OrderStore, ProductStore};

// ─── State ──────────────────────────────────────────────────────────────────

/// Process-wide state handed to every handler.
pub struct AppState {
    pub products: RwLock<ProductStore>,
    pub orders: RwLock<OrderStore>,
}

impl AppState {
    /// Fresh, empty stores sharing one id generator.
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            products: RwLock::new(ProductStore::new(ids.clone())),
            orders: RwLock::new(OrderStore::new(ids)),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(UuidIdGenerator))
    }
}

/// Seeds the catalog the way the process ships: two demo products and an
/// empty order list. Lives outside `AppState::new` so tests start empty.
pub async fn seed_demo_catalog(state: &AppState) {
    let mut products = state.products.write().await;
    products
        .create(Some("Laptop".to_string()), Some(1200.0))
        .expect("demo product is valid");
    products
        .create(Some("Phone".to_string()), Some(800.0))
        .expect("demo product is valid");
}

// ─── API types ──────────────────────────────────────────────────────────────

/// Body of `POST /products`. Fields are optional so that absence flows
/// into validation instead of failing deserialization.
#[derive(Deserialize)]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
}

/// Body of `PUT /products/{id}`. Only supplied fields are applied.
#[derive(Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
}

/// Body of `POST /orders`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub product_id: Option<String>,
    pub quantity: Option<i64>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

/// A body that failed JSON extraction is an unhandled failure rather than
/// a validation error: record the detail, answer with the opaque envelope.
fn reject_body(rejection: JsonRejection) -> ApiError {
    tracing::error!("request body rejected: {rejection}");
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}

// ─── Product handlers ───────────────────────────────────────────────────────

async fn list_products(State(state): State<Arc<AppState>>) -> Json<Vec<Product>> {
    Json(state.products.read().await.list().to_vec())
}

async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let products = state.products.read().await;
    match products.get(&id) {
        Ok(product) => Ok(Json(product.clone())),
        Err(_) => Err(api_error(StatusCode::NOT_FOUND, "Product not found")),
    }
}

async fn create_product(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let Json(req) = body.map_err(reject_body)?;
    let mut products = state.products.write().await;
    match products.create(req.name, req.price) {
        Ok(product) => Ok((StatusCode::CREATED, Json(product))),
        Err(_) => Err(api_error(StatusCode::BAD_REQUEST, "Invalid product data")),
    }
}

async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let Json(req) = body.map_err(reject_body)?;
    let mut products = state.products.write().await;
    match products.update(&id, req.name, req.price) {
        Ok(product) => Ok(Json(product)),
        Err(_) => Err(api_error(StatusCode::NOT_FOUND, "Product not found")),
    }
}

async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<MessageResponse> {
    state.products.write().await.delete(&id);
    Json(MessageResponse {
        message: "Product deleted".to_string(),
    })
}

// ─── Order handlers ─────────────────────────────────────────────────────────

async fn list_orders(State(state): State<Arc<AppState>>) -> Json<Vec<Order>> {
    Json(state.orders.read().await.list().to_vec())
}

async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let orders = state.orders.read().await;
    match orders.get(&id) {
        Ok(order) => Ok(Json(order.clone())),
        Err(_) => Err(api_error(StatusCode::NOT_FOUND, "Order not found")),
    }
}

async fn create_order(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let Json(req) = body.map_err(reject_body)?;

    // Snapshot the product under the read lock, releasing it before the
    // order write lock. An unknown product id is invalid order data, not
    // a 404: the order endpoint never promises the catalog entry exists.
    let product = {
        let products = state.products.read().await;
        req.product_id
            .as_deref()
            .and_then(|id| products.get(id).ok())
            .cloned()
    };
    let Some(product) = product else {
        return Err(api_error(StatusCode::BAD_REQUEST, "Invalid order data"));
    };

    let mut orders = state.orders.write().await;
    match orders.create(product, req.quantity) {
        Ok(order) => Ok((StatusCode::CREATED, Json(order))),
        Err(_) => Err(api_error(StatusCode::BAD_REQUEST, "Invalid order data")),
    }
}

async fn delete_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<MessageResponse> {
    state.orders.write().await.delete(&id);
    Json(MessageResponse {
        message: "Order deleted".to_string(),
    })
}

// ─── Request logging ────────────────────────────────────────────────────────

/// Logs method and path for every request before any handler runs. The fmt
/// subscriber prefixes each line with an ISO-8601 timestamp.
async fn log_request(request: Request, next: Next) -> Response {
    tracing::info!("{} {}", request.method(), request.uri().path());
    next.run(request).await
}

// ─── Error responder ────────────────────────────────────────────────────────

/// Terminal answer for requests that matched no route.
async fn not_found() -> ApiError {
    api_error(StatusCode::NOT_FOUND, "Not Found")
}

/// Converts a handler panic into the opaque 500 envelope, recording the
/// panic payload first. The caller never sees the detail.
fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "non-string panic payload"
    };
    tracing::error!("handler panicked: {detail}");
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}

// ─── Router ─────────────────────────────────────────────────────────────────

/// Builds the full application router around shared state.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    // Method routers carry their own fallback so that a known path with an
    // unsupported method gets the same 404 envelope as an unknown path.
    Router::new()
        .route(
            "/products",
            get(list_products).post(create_product).fallback(not_found),
        )
        .route(
            "/products/{id}",
            get(get_product)
                .put(update_product)
                .delete(delete_product)
                .fallback(not_found),
        )
        .route(
            "/orders",
            get(list_orders).post(create_order).fallback(not_found),
        )
        .route(
            "/orders/{id}",
            get(get_order).delete(delete_order).fallback(not_found),
        )
        .fallback(not_found)
        .layer(middleware::from_fn(log_request))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
        .with_state(state)
}
