mod health;
mod products;

use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::http::HeaderMap;

use yoshon_core::{Authenticator, ServiceError};

use crate::service::ProductService;

/// Shared state of the product routes.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ProductService>,
    pub auth: Arc<dyn Authenticator>,
}

/// Build the product API router.
///
/// Routes:
/// - `GET    /api/products`                 — list products
/// - `POST   /api/products`                 — create product (admin)
/// - `GET    /api/products/{id}`            — get product
/// - `PUT    /api/products/{id}`            — replace product fields (admin)
/// - `DELETE /api/products/{id}`            — delete product (admin)
/// - `POST   /api/products/bulk/replace`    — replace whole catalog (admin)
/// - `POST   /api/products/import/json`     — same as bulk/replace (admin)
/// - `GET    /api/health`                   — liveness + product count
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(products::routes())
        .merge(health::routes())
}

/// Check the admin secret, then hand back the parsed JSON body.
///
/// The secret check runs first so an unauthenticated caller always gets 401,
/// whatever the body looks like.
pub(crate) fn admin_json(
    state: &AppState,
    headers: &HeaderMap,
    body: &Bytes,
) -> Result<serde_json::Value, ServiceError> {
    let parsed = serde_json::from_slice::<serde_json::Value>(body);
    state.auth.check(headers, parsed.as_ref().ok())?;
    parsed.map_err(|e| ServiceError::Validation(format!("invalid JSON body: {e}")))
}

/// Check the admin secret for routes that take no body.
pub(crate) fn admin_only(
    state: &AppState,
    headers: &HeaderMap,
    body: &Bytes,
) -> Result<(), ServiceError> {
    let parsed = serde_json::from_slice::<serde_json::Value>(body).ok();
    state.auth.check(headers, parsed.as_ref())
}
