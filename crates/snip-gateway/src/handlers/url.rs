use crate::error::{AppError, Result};
use crate::model::{CreateUrlRequest, CreateUrlResponse, UrlStatsResponse};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use snip_core::ShortCode;

pub async fn create_url_handler(
    State(state): State<AppState>,
    request: std::result::Result<Json<CreateUrlRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateUrlResponse>)> {
    let Json(request) = request.map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))?;
    let original_url = request
        .original_url
        .ok_or_else(|| AppError::InvalidUrl("originalUrl is required".to_string()))?;

    let shortened = state.shortener().shorten(original_url).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateUrlResponse::from(&shortened.record)),
    ))
}

pub async fn get_url_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<UrlStatsResponse>> {
    let code = ShortCode::new(short_code)?;
    let record = state
        .shortener()
        .stats(&code)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(UrlStatsResponse::from(record)))
}
