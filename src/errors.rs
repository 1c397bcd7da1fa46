use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

/// Failure while fetching one archive page. Surfaced unchanged; retry policy
/// belongs to whoever owns the transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Archive request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Archive returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Archive response could not be decoded: {0}")]
    Decode(String),

    #[error("Archive fetch aborted")]
    Aborted,
}

/// Terminal outcome of a history query that did not produce points.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Invalid query options: {0}")]
    InvalidOptions(String),

    #[error("Unsupported entity type: {0}")]
    UnsupportedEntity(String),

    #[error("History request cancelled")]
    Cancelled,

    #[error(transparent)]
    Transport(TransportError),
}

impl From<TransportError> for HistoryError {
    fn from(err: TransportError) -> Self {
        match err {
            // the transport only aborts when the query's token fired
            TransportError::Aborted => HistoryError::Cancelled,
            other => HistoryError::Transport(other),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Internal server error: {0}")]
    InternalServerError(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Archive error: {0}")]
    ArchiveError(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<HistoryError> for AppError {
    fn from(err: HistoryError) -> Self {
        match err {
            HistoryError::InvalidOptions(_) | HistoryError::UnsupportedEntity(_) => {
                AppError::BadRequest(err.to_string())
            }
            HistoryError::Cancelled => AppError::Cancelled,
            HistoryError::Transport(e) => AppError::ArchiveError(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ArchiveError(_) => StatusCode::BAD_GATEWAY,
            AppError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        };

        let body = Json(json!({
            "message": self.to_string()
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aborted_fetch_becomes_cancellation() {
        assert!(matches!(
            HistoryError::from(TransportError::Aborted),
            HistoryError::Cancelled
        ));
    }

    #[test]
    fn status_errors_map_to_bad_gateway() {
        let err: AppError = HistoryError::from(TransportError::Status {
            status: 500,
            body: "boom".into(),
        })
        .into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn every_app_error_has_its_status() {
        let cases = [
            (AppError::InternalServerError("encode".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::from(HistoryError::InvalidOptions("x".into())), StatusCode::BAD_REQUEST),
            (AppError::from(HistoryError::UnsupportedEntity("x".into())), StatusCode::BAD_REQUEST),
            (AppError::from(HistoryError::Cancelled), StatusCode::SERVICE_UNAVAILABLE),
            (AppError::NotFound("/x".into()), StatusCode::NOT_FOUND),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
