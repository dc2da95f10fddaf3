use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tripview_map::SdkLoader;
use tripview_shorttrip::{ActionDispatcher, HttpClient};

use crate::{
    map_script::KakaoScript,
    page::PageStore,
    template::{NotFoundTemplate, Template},
};

mod assets;
mod health;
mod map;
mod recommendation;

pub use assets::AssetsService;

#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub pages: PageStore,
    pub dispatcher: Arc<ActionDispatcher<HttpClient>>,
    pub sdk_loader: Arc<SdkLoader<KakaoScript>>,
}

impl AppState {
    pub fn new(config: crate::config::Config) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(config.api.timeout_secs);
        let api = HttpClient::new(config.api.base_url.to_owned(), timeout)?;
        let script = KakaoScript::new(config.map.script_url(), timeout)?;

        Ok(Self {
            pages: PageStore::new(Duration::from_secs(config.pages.idle_minutes * 60)),
            dispatcher: Arc::new(ActionDispatcher::new(api)),
            sdk_loader: Arc::new(SdkLoader::new(script)),
            config,
        })
    }
}

pub async fn fallback(template: Template) -> impl IntoResponse {
    (StatusCode::NOT_FOUND, template.render(NotFoundTemplate))
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/recommendation", post(recommendation::mount))
        .route("/recommendation/{id}", get(recommendation::page))
        .route("/recommendation/{id}/next", post(recommendation::next))
        .route("/recommendation/{id}/previous", post(recommendation::previous))
        .route("/recommendation/{id}/save", post(recommendation::save))
        .route("/recommendation/{id}/retry", post(recommendation::retry))
        .route("/recommendation/{id}/close", post(recommendation::close))
        .route("/map/sdk.js", get(map::sdk))
        .fallback(fallback)
        .nest_service("/static", AssetsService::new())
        .with_state(app_state)
}
