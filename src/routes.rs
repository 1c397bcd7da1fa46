use axum::{http::Uri, routing::get, Router};
use tower_http::cors::CorsLayer;
use crate::app_state::AppState;
use crate::errors::AppError;

/// Build the main application router
pub fn app_router() -> Router<AppState> {
    let api_v1 = Router::new()
        .nest("/history", crate::api::routes::history_routes::history_routes());

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", api_v1)
        .fallback(handler_404)
        .layer(CorsLayer::very_permissive())
}

async fn root() -> &'static str {
    "Server is running!"
}

async fn health_check() -> &'static str {
    "OK"
}

async fn handler_404(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
