use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tracing::error;

use yoshon_core::now_rfc3339;

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// GET /api/health — store reachability and product count.
async fn health(State(state): State<AppState>) -> Response {
    match state.service.total() {
        Ok(total) => Json(serde_json::json!({
            "status": "ok",
            "totalProducts": total,
            "timestamp": now_rfc3339(),
        }))
        .into_response(),
        Err(e) => {
            error!("health check failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "status": "error",
                    "error": e.to_string(),
                    "timestamp": now_rfc3339(),
                })),
            )
                .into_response()
        }
    }
}
