use axum::{
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::routes::AppState;

/// GET /map/sdk.js - The Kakao Maps SDK, loaded once per process
///
/// Answers 404 while the script cannot be fetched; pages then render without a map.
pub async fn sdk(State(app): State<AppState>) -> impl IntoResponse {
    match app.sdk_loader.ensure_loaded().await {
        Some(sdk) => (
            [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
            sdk.script().to_owned(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
