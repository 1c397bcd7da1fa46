//! History routes (e.g., /api/v1/history/*)

use axum::{routing::get, Router};

use crate::api::controller::history::HistoryController;
use crate::app_state::AppState;

pub fn history_routes() -> Router<AppState> {
    Router::new()
        .route("/{key}", get(HistoryController::get_history))
        .route("/{key}/stream", get(HistoryController::stream_history))
}
