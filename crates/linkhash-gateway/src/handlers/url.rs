use crate::error::{AppError, Result};
use crate::model::{CreateUrlRequest, CreateUrlResponse, ALREADY_EXISTS_MESSAGE, CREATED_MESSAGE};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use linkhash_core::AllocationOutcome;
use tracing::{debug, info};

/// `POST /`: allocates a short key for the submitted URL.
///
/// Answers `201 Created` for a new mapping and `200 OK` when the URL was
/// already stored. URLs that could never be sent back in a `Location` header
/// (control characters) are rejected with `400` before anything is stored.
pub async fn create_url_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateUrlRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(request) = payload?;

    if HeaderValue::from_str(&request.url).is_err() {
        return Err(AppError::InvalidArgument(
            "url contains characters that cannot be redirected to".to_string(),
        ));
    }

    let allocation = state.shortener().allocate(&request.url).await?;
    let (status, message) = match allocation.outcome {
        AllocationOutcome::Created => {
            info!(key = %allocation.key, url = %request.url, "short key created");
            (StatusCode::CREATED, CREATED_MESSAGE)
        }
        AllocationOutcome::AlreadyExists => (StatusCode::OK, ALREADY_EXISTS_MESSAGE),
    };

    let body = CreateUrlResponse {
        key: allocation.key.to_string(),
        short_url: allocation.key.to_url(state.base_url()),
        original_url: request.url,
        outcome: allocation.outcome,
        message,
    };

    Ok((status, Json(body)).into_response())
}

/// `GET /{key}`: redirects to the stored URL with `302 Found`.
pub async fn redirect_handler(
    Path(key): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    let url = state.shortener().resolve(&key).await?;

    let location = HeaderValue::from_str(&url).map_err(|_| {
        AppError::Internal(format!("stored url for key '{key}' is not a valid Location header"))
    })?;

    debug!(key = %key, url = %url, "redirecting");
    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

/// `GET /` without a key.
pub async fn missing_key_handler() -> AppError {
    AppError::InvalidArgument("short key cannot be empty".to_string())
}
