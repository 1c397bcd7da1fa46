use axum::Json;

use crate::api::dto::ApiResponse;
use crate::errors::{AppError, HistoryError};

pub fn to_json<T: serde::Serialize>(
    result: Result<T, HistoryError>,
) -> Result<Json<ApiResponse<T>>, AppError> {
    match result {
        Ok(value) => Ok(Json(ApiResponse::ok(value))),
        Err(err) => Err(AppError::from(err)),
    }
}
