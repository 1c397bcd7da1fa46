use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::{stream, TryStreamExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info_span, Instrument};
use uuid::Uuid;

use crate::api::dto::history_dto::HistoryQueryDto;
use crate::api::dto::ApiResponse;
use crate::api::util::json::to_json;
use crate::app_state::AppState;
use crate::domain::history::model::{CanonicalPoint, TelemetryEntity};
use crate::errors::{AppError, HistoryError};

const NDJSON: &str = "application/x-ndjson";

/// Encoded lines waiting for the client. Kept at one so a slow reader holds
/// back the next archive fetch.
const STREAM_BUFFER: usize = 1;

pub struct HistoryController;

impl HistoryController {
    pub async fn get_history(
        State(state): State<AppState>,
        Path(key): Path<String>,
        Query(query): Query<HistoryQueryDto>,
    ) -> Result<Json<ApiResponse<Vec<CanonicalPoint>>>, AppError> {
        let options = query.to_options()?;
        let entity = supported_entity(&state, &query, &key)?;

        // dropped with the handler future, so a client hang-up cancels the query
        let cancel = CancellationToken::new();
        let _guard = cancel.clone().drop_guard();

        to_json(state.history.request(&entity, &options, &cancel).await)
    }

    /// One JSON array per archive page, newline delimited, written as pages
    /// arrive.
    pub async fn stream_history(
        State(state): State<AppState>,
        Path(key): Path<String>,
        Query(query): Query<HistoryQueryDto>,
    ) -> Result<Response, AppError> {
        let options = query.to_options()?;
        let entity = supported_entity(&state, &query, &key)?;
        let plan = state.history.plan(&entity, &options)?;

        let (tx, rx) = mpsc::channel::<Result<Vec<u8>, AppError>>(STREAM_BUFFER);
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();
        let provider = state.history.clone();
        let span = info_span!("history_stream", request_id = %Uuid::new_v4(), entity = %entity.key);

        tokio::spawn(
            async move {
                let batches = provider.stream_batches(&plan, &task_cancel);
                futures::pin_mut!(batches);

                loop {
                    let line = match batches.try_next().await {
                        Ok(Some(batch)) => encode_line(&batch),
                        Ok(None) => break,
                        Err(e) => Err(AppError::from(e)),
                    };
                    let failed = line.is_err();

                    if tx.send(line).await.is_err() {
                        debug!("History stream client went away");
                        break;
                    }
                    if failed {
                        break;
                    }
                }
            }
            .instrument(span),
        );

        // the guard lives as long as the body; dropping it cancels the walk
        let guard = cancel.drop_guard();
        let body = stream::unfold((rx, guard), |(mut rx, guard)| async move {
            rx.recv().await.map(|item| (item, (rx, guard)))
        });

        Ok(([(CONTENT_TYPE, NDJSON)], Body::from_stream(body)).into_response())
    }
}

fn encode_line(batch: &[CanonicalPoint]) -> Result<Vec<u8>, AppError> {
    let mut line =
        serde_json::to_vec(batch).map_err(|e| AppError::InternalServerError(e.to_string()))?;
    line.push(b'\n');
    Ok(line)
}

fn supported_entity(
    state: &AppState,
    query: &HistoryQueryDto,
    key: &str,
) -> Result<TelemetryEntity, AppError> {
    let entity = query.entity(key);
    if !state.history.supports_request(&entity) {
        return Err(HistoryError::UnsupportedEntity(entity.kind).into());
    }
    Ok(entity)
}
