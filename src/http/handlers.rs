//! Endpoint handlers.
//!
//! Each handler turns one matched request into a store call and a response.
//! They hold no state of their own; everything shared lives in [`AppState`].

use axum::{
    body::Body,
    http::{Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::flags::model::group_entries;
use crate::flags::{ColorSubmission, Flag, FlagPage, NewFlag};
use crate::http::error::AppError;
use crate::http::request::{client_ip, page_params, request_id};
use crate::http::response::{count_message, EVENT_LOGGED, PREFLIGHT_OK};
use crate::http::server::AppState;
use crate::observability::metrics;

/// `OPTIONS *`
pub fn preflight() -> Response {
    (StatusCode::OK, PREFLIGHT_OK).into_response()
}

/// `GET /`
pub async fn count_flags(state: &AppState) -> Result<Response, AppError> {
    let count = state.store.count_flags().await?;
    Ok((StatusCode::OK, count_message(count)).into_response())
}

/// `GET /flags`
pub async fn list_flags(state: &AppState, uri: &Uri) -> Result<Response, AppError> {
    let params = page_params(uri);
    let rows = state.store.list_page(&params).await?;
    let total = state.store.count_flags().await?;

    let page = FlagPage {
        flags: group_entries(rows),
        limit: params.limit_value(),
        offset: params.offset_value(),
        total,
    };

    tracing::debug!(
        limit = %params.limit,
        offset = %params.offset,
        returned = page.flags.len(),
        total,
        "Listed flags"
    );

    // Json sets `Content-Type: application/json`.
    Ok(Json(page).into_response())
}

/// `POST /flags`
pub async fn submit_flag(state: &AppState, request: Request<Body>) -> Result<Response, AppError> {
    let (parts, body) = request.into_parts();
    let request_id = request_id(&parts.headers);

    let submission = match read_submission(body, state.max_body_size).await {
        Ok(s) => s,
        Err(err) => {
            tracing::info!(request_id = %request_id, error = %err, "Flag submission rejected");
            metrics::record_rejected_submission(&err);
            return Err(err);
        }
    };

    let new_flag = NewFlag {
        flag: Flag {
            id: Uuid::new_v4(),
            submitter_ip: client_ip(&parts.headers, &state.client_ip_header),
            timestamp: Utc::now().timestamp_millis(),
        },
        colors: submission.into_colors(),
    };

    state.store.insert_flag(&new_flag).await?;

    tracing::info!(
        request_id = %request_id,
        flag_id = %new_flag.flag.id,
        colors = new_flag.colors.len(),
        "Flag stored"
    );
    metrics::record_flag_stored(new_flag.colors.len());

    Ok((StatusCode::CREATED, EVENT_LOGGED).into_response())
}

async fn read_submission(body: Body, limit: usize) -> Result<ColorSubmission, AppError> {
    let bytes = axum::body::to_bytes(body, limit)
        .await
        .map_err(|_| AppError::PayloadTooLarge(limit))?;
    Ok(ColorSubmission::from_json(&bytes)?)
}
