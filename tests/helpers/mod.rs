//! Test helpers: a fake short-trip backend and an app wired against it.

#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, Response, StatusCode},
    routing::{get, post},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

/// Records every body posted to it.
#[derive(Clone, Default)]
pub struct Backend {
    pub saved: Arc<Mutex<Vec<Value>>>,
    pub submitted: Arc<Mutex<Vec<Value>>>,
    pub fail_submit: Arc<AtomicBool>,
}

impl Backend {
    pub fn saves(&self) -> usize {
        self.saved.lock().unwrap().len()
    }

    pub fn submits(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }

    pub fn saved(&self) -> Vec<Value> {
        self.saved.lock().unwrap().clone()
    }

    pub fn submitted(&self) -> Vec<Value> {
        self.submitted.lock().unwrap().clone()
    }
}

async fn save(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    backend.saved.lock().unwrap().push(body);

    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some("Bearer good") => StatusCode::OK,
        Some("Bearer broken") => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::UNAUTHORIZED,
    }
}

async fn submit(
    State(backend): State<Backend>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    backend.submitted.lock().unwrap().push(body);

    if backend.fail_submit.load(Ordering::SeqCst) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    Ok(Json(json!([
        {
            "day": "day 1",
            "places": [{ "name": "해운대", "city": "부산", "latitude": 129.16, "longitude": 35.16 }]
        }
    ])))
}

pub struct TestApp {
    pub router: Router,
    pub backend: Backend,
}

impl TestApp {
    pub async fn spawn() -> anyhow::Result<Self> {
        let backend = Backend::default();
        let fake = Router::new()
            .route("/api/shortTrip/save", post(save))
            .route("/api/shortTrip/submit", post(submit))
            .route("/sdk.js", get(|| async { "/* kakao maps */" }))
            .with_state(backend.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move { axum::serve(listener, fake).await });

        let mut config = tripview::config::Config::load(Some("does/not/exist.toml".to_owned()))?;
        config.api.base_url = format!("http://{addr}");
        config.api.timeout_secs = 5;
        config.map.sdk_url = format!("http://{addr}/sdk.js");

        let state = tripview::AppState::new(config)?;

        Ok(Self {
            router: tripview::server::app(state),
            backend,
        })
    }

    pub async fn request(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.request(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::post(uri);
        if let Some(cookie) = cookie {
            builder = builder.header("cookie", cookie);
        }

        self.request(builder.body(Body::empty()).unwrap()).await
    }

    /// Mounts a page and returns its path.
    pub async fn mount(&self, payload: Value) -> String {
        let response = self
            .request(
                Request::post("/recommendation")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        header(&response, "location").unwrap()
    }
}

pub fn header(response: &Response<Body>, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .map(|v| v.to_str().unwrap().to_owned())
}

pub async fn body(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn payload() -> Value {
    json!({
        "recommendations": [
            {
                "day": "day 1",
                "places": [
                    { "name": "경복궁", "city": "서울", "latitude": 126.977, "longitude": 37.579 },
                    { "name": "북촌", "city": "서울", "latitude": 126.985, "longitude": 37.582 },
                    { "name": "광장시장", "city": "서울" }
                ]
            },
            {
                "day": "day 2",
                "places": [
                    { "name": "남산타워", "city": "서울", "latitude": 126.988, "longitude": 37.551 }
                ]
            }
        ],
        "companion": "가족",
        "transport": "대중교통",
        "preferences": { "nature": "nature", "newPlaces": "new" },
        "purpose": "힐링",
        "startDate": "2024-03-01",
        "endDate": "2024-03-02",
        "latitude": 37.5,
        "longitude": 127.0
    })
}
