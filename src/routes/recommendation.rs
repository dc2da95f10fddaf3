use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;
use time::Date;
use tripview_itinerary::{DayView, TripPayload, hashtags};
use tripview_map::BinderState;
use tripview_shorttrip::{RetryOutcome, SaveOutcome, SaveRequest, SubmitRequest};
use validator::Validate;

use crate::{
    auth::{Credential, login_redirect, page_url},
    page::Page,
    routes::AppState,
    template::{
        NotFoundTemplate, Template, ToastErrorTemplate, ToastSuccessTemplate, filters,
        format_hashtag,
    },
};

#[derive(askama::Template)]
#[template(path = "recommendation.html")]
pub struct RecommendationTemplate {
    pub page_id: String,
    pub day: DayView,
    pub date: Option<Date>,
    pub hashtags: String,
    pub purpose: String,
    pub map_available: bool,
    pub map_commands: String,
    pub loading: bool,
}

#[derive(askama::Template)]
#[template(path = "recommendation-empty.html")]
pub struct RecommendationEmptyTemplate {
    pub page_id: String,
}

#[derive(askama::Template)]
#[template(path = "partials/day-plan.html")]
pub struct DayPlanTemplate {
    pub page_id: String,
    pub day: DayView,
    pub date: Option<Date>,
    pub map_commands: String,
    pub loading: bool,
}

fn error_toast(template: &Template, message: &str) -> axum::response::Response {
    (
        [("ts-swap", "skip")],
        template.render(ToastErrorTemplate { message }),
    )
        .into_response()
}

/// Re-syncs the binder with the current day and drains the journaled map calls.
fn sync_markers(page: &mut Page, app: &AppState) -> String {
    let markers = page.markers(app.config.map.place_axis_order);
    page.binder.sync(&markers);

    let commands = page
        .binder
        .map_mut()
        .map(|map| map.take_commands())
        .unwrap_or_default();

    match serde_json::to_string(&commands) {
        Ok(json) => json,
        Err(err) => {
            tracing::error!(err = %err, "Failed to serialize map commands");

            "[]".to_owned()
        }
    }
}

#[tracing::instrument(skip_all)]
pub async fn mount(
    State(app): State<AppState>,
    Json(payload): Json<TripPayload>,
) -> impl IntoResponse {
    if let Err(err) = payload.validate() {
        tracing::warn!(err = %err, "Rejected recommendation payload");

        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": err.to_string() })),
        )
            .into_response();
    }

    let id = app.pages.mount(payload, app.config.map.level).await;
    let location = format!("/recommendation/{id}");

    (
        StatusCode::SEE_OTHER,
        [
            (header::LOCATION.as_str(), location.to_owned()),
            ("ts-location", location),
        ],
    )
        .into_response()
}

#[tracing::instrument(skip_all, fields(page = id))]
pub async fn page(
    template: Template,
    State(app): State<AppState>,
    Path((id,)): Path<(String,)>,
) -> impl IntoResponse {
    let Some(page) = app.pages.get(&id).await else {
        return (StatusCode::NOT_FOUND, template.render(NotFoundTemplate)).into_response();
    };

    // Load outside the page lock, the binder then finds the script ready
    app.sdk_loader.ensure_loaded().await;

    let mut page = page.lock().await;
    page.touch();

    let Some(day) = page.viewer.view() else {
        return template
            .render(RecommendationEmptyTemplate { page_id: id })
            .into_response();
    };

    // A full render starts a fresh map in the browser. The binder is per page, so the
    // latest render owns the overlay ids and partials from an older tab replay stale ones.
    page.binder.release();
    let center = page
        .context
        .origin()
        .unwrap_or_else(|| app.config.map.default_center());
    let state = page.binder.mount(&*app.sdk_loader, center).await;
    let map_commands = sync_markers(&mut page, &app);

    template
        .render(RecommendationTemplate {
            date: page
                .context
                .start_date()
                .and_then(|start| page.viewer.current_date(start)),
            hashtags: hashtags(&page.context)
                .iter()
                .map(|tag| format_hashtag(tag, &template.preferred_language))
                .collect::<Vec<_>>()
                .join(" "),
            purpose: page.context.purpose.to_owned(),
            map_available: state != BinderState::Unloaded,
            loading: page.slot.is_loading(),
            page_id: id,
            day,
            map_commands,
        })
        .into_response()
}

async fn navigate(
    template: Template,
    app: AppState,
    id: String,
    step: fn(&mut Page) -> bool,
) -> axum::response::Response {
    let Some(page) = app.pages.get(&id).await else {
        return error_toast(&template, "page_expired");
    };

    let mut page = page.lock().await;
    page.touch();

    if !step(&mut page) {
        return StatusCode::NO_CONTENT.into_response();
    }

    let Some(day) = page.viewer.view() else {
        return StatusCode::NO_CONTENT.into_response();
    };

    let map_commands = sync_markers(&mut page, &app);

    template
        .render(DayPlanTemplate {
            date: page
                .context
                .start_date()
                .and_then(|start| page.viewer.current_date(start)),
            loading: page.slot.is_loading(),
            page_id: id,
            day,
            map_commands,
        })
        .into_response()
}

#[tracing::instrument(skip_all, fields(page = id))]
pub async fn next(
    template: Template,
    State(app): State<AppState>,
    Path((id,)): Path<(String,)>,
) -> impl IntoResponse {
    navigate(template, app, id, |page| page.viewer.next()).await
}

#[tracing::instrument(skip_all, fields(page = id))]
pub async fn previous(
    template: Template,
    State(app): State<AppState>,
    Path((id,)): Path<(String,)>,
) -> impl IntoResponse {
    navigate(template, app, id, |page| page.viewer.previous()).await
}

#[tracing::instrument(skip_all, fields(page = id))]
pub async fn save(
    template: Template,
    credential: Credential,
    State(app): State<AppState>,
    Path((id,)): Path<(String,)>,
) -> impl IntoResponse {
    let Some(page) = app.pages.get(&id).await else {
        return error_toast(&template, "page_expired");
    };

    let (request, slot, closed, path) = {
        let mut page = page.lock().await;
        page.touch();

        (
            SaveRequest::new(page.viewer.itinerary(), &page.context),
            page.slot.clone(),
            page.closed(),
            page.path(),
        )
    };

    let outcome = tokio::select! {
        outcome = app.dispatcher.save(&slot, credential.token(), &request) => outcome,
        _ = closed.wait() => {
            tracing::debug!("Page closed, save dropped");

            return StatusCode::NO_CONTENT.into_response();
        }
    };

    match outcome {
        SaveOutcome::LoginRequired => {
            let location = login_redirect(&app.config, &page_url(&app.config, &path));

            (StatusCode::OK, [("ts-location", location)]).into_response()
        }
        SaveOutcome::Unauthorized => {
            tracing::info!("Credential rejected, redirecting to login");

            let location = login_redirect(&app.config, &page_url(&app.config, &path));

            (
                StatusCode::OK,
                [("ts-location", location)],
                template.render(ToastErrorTemplate {
                    message: "auth_required",
                }),
            )
                .into_response()
        }
        SaveOutcome::Saved => {
            tracing::info!("Itinerary saved");

            (
                StatusCode::OK,
                [(
                    "ts-location",
                    app.config.navigation.saved_trips_path.to_owned(),
                )],
                template.render(ToastSuccessTemplate {
                    message: "save_success",
                }),
            )
                .into_response()
        }
        SaveOutcome::Failed(_) => error_toast(&template, "save_failed"),
        SaveOutcome::Busy => error_toast(&template, "request_in_progress"),
    }
}

#[tracing::instrument(skip_all, fields(page = id))]
pub async fn retry(
    template: Template,
    State(app): State<AppState>,
    Path((id,)): Path<(String,)>,
) -> impl IntoResponse {
    let Some(page) = app.pages.get(&id).await else {
        return error_toast(&template, "page_expired");
    };

    let (payload, slot, closed) = {
        let mut page = page.lock().await;
        page.touch();

        (page.payload(), page.slot.clone(), page.closed())
    };

    let request = SubmitRequest::new(&payload);
    let outcome = tokio::select! {
        outcome = app.dispatcher.retry(&slot, &request) => outcome,
        _ = closed.wait() => {
            tracing::debug!("Page closed, retry dropped");

            return StatusCode::NO_CONTENT.into_response();
        }
    };

    match outcome {
        RetryOutcome::Recommended(recommendations) => {
            if !app.pages.unmount(&id).await {
                return StatusCode::NO_CONTENT.into_response();
            }

            let next = app
                .pages
                .mount(
                    TripPayload {
                        recommendations,
                        context: payload.context,
                    },
                    app.config.map.level,
                )
                .await;

            tracing::info!(next = next, "Recommendation replaced");

            (
                StatusCode::OK,
                [("ts-location", format!("/recommendation/{next}"))],
            )
                .into_response()
        }
        RetryOutcome::Failed(err) => {
            tracing::debug!(err = %err, "Retry surfaced to user");

            error_toast(&template, "retry_failed")
        }
        RetryOutcome::Busy => error_toast(&template, "request_in_progress"),
    }
}

#[tracing::instrument(skip_all, fields(page = id))]
pub async fn close(State(app): State<AppState>, Path((id,)): Path<(String,)>) -> impl IntoResponse {
    app.pages.unmount(&id).await;

    StatusCode::NO_CONTENT
}
