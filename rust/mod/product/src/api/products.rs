use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;

use yoshon_core::ServiceError;

use super::{AppState, admin_json, admin_only};
use crate::model::{Product, ProductInput};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/products/bulk/replace", post(replace_products))
        .route("/products/import/json", post(replace_products))
}

/// Ids are parsed after the admin check; a key that is not a number cannot
/// name a product.
fn parse_id(raw: &str) -> Result<i64, ServiceError> {
    raw.parse()
        .map_err(|_| ServiceError::NotFound(format!("product {raw} not found")))
}

fn parse_input(value: Value) -> Result<ProductInput, ServiceError> {
    serde_json::from_value(value)
        .map_err(|e| ServiceError::Validation(format!("invalid product: {e}")))
}

/// GET /api/products — the whole catalog.
async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, ServiceError> {
    Ok(Json(state.service.list_products()?))
}

/// GET /api/products/{id}
async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ServiceError> {
    let id = parse_id(&id)?;
    Ok(Json(state.service.get_product(id)?))
}

/// POST /api/products — create; responds 201 with the running total.
async fn create_product(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), ServiceError> {
    let input = parse_input(admin_json(&state, &headers, &body)?)?;
    let (product, total) = state.service.create_product(input)?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Product created",
            "product": product,
            "totalProducts": total,
        })),
    ))
}

/// PUT /api/products/{id} — replace Brand, Product Name and Yoshon.
async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ServiceError> {
    let input = parse_input(admin_json(&state, &headers, &body)?)?;
    let id = parse_id(&id)?;
    let product = state.service.update_product(id, input)?;

    Ok(Json(serde_json::json!({
        "message": "Product updated",
        "product": product,
    })))
}

/// DELETE /api/products/{id}
async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ServiceError> {
    admin_only(&state, &headers, &body)?;
    let id = parse_id(&id)?;
    let (product, total) = state.service.delete_product(id)?;

    Ok(Json(serde_json::json!({
        "message": "Product deleted",
        "product": product,
        "totalProducts": total,
    })))
}

/// POST /api/products/bulk/replace and /api/products/import/json — swap the
/// whole catalog for the posted array.
async fn replace_products(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ServiceError> {
    let Value::Array(items) = admin_json(&state, &headers, &body)? else {
        return Err(ServiceError::Validation(
            "request body must be an array of products".into(),
        ));
    };

    let entries = items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            if !item.is_object() {
                return Err(ServiceError::Validation(format!(
                    "entry {i} is not a product object"
                )));
            }
            parse_input(item)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let total = state.service.replace_products(entries)?;

    Ok(Json(serde_json::json!({
        "message": "Products replaced",
        "totalProducts": total,
    })))
}
