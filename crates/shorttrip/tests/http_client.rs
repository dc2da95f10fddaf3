use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use serde_json::{Value, json};
use tripview_itinerary::{DayPlan, Itinerary, TripContext, TripPayload};
use tripview_shorttrip::{ApiError, HttpClient, SaveRequest, ShortTripApi, SubmitRequest};

#[derive(Clone, Default)]
struct Backend {
    received: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

async fn save(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let status = match auth.as_deref() {
        Some("Bearer good") => StatusCode::CREATED,
        Some("Bearer broken") => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::UNAUTHORIZED,
    };

    backend.received.lock().unwrap().push((auth, body));
    status
}

async fn submit(State(backend): State<Backend>, Json(body): Json<Value>) -> Json<Value> {
    backend.received.lock().unwrap().push((None, body));

    Json(json!([
        { "day": "day 1", "places": [{ "name": "남산타워", "city": "서울" }] },
        { "day": "day 2", "places": [] }
    ]))
}

async fn spawn_backend() -> anyhow::Result<(HttpClient, Backend)> {
    let backend = Backend::default();
    let app = Router::new()
        .route("/api/shortTrip/save", post(save))
        .route("/api/shortTrip/submit", post(submit))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move { axum::serve(listener, app).await });

    let client = HttpClient::new(format!("http://{addr}/"), Duration::from_secs(5))?;

    Ok((client, backend))
}

fn itinerary() -> Itinerary {
    vec![DayPlan {
        day: "day 1".to_owned(),
        ..Default::default()
    }]
    .into()
}

#[tokio::test]
async fn test_save_sends_bearer_credential() -> anyhow::Result<()> {
    let (client, backend) = spawn_backend().await?;
    let context = TripContext {
        start_date: "2024-03-01".to_owned(),
        end_date: "2024-03-03".to_owned(),
        latitude: Some(37.5),
        longitude: Some(127.0),
        ..Default::default()
    };

    client
        .save("good", &SaveRequest::new(&itinerary(), &context))
        .await?;

    let received = backend.received.lock().unwrap().clone();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].0.as_deref(), Some("Bearer good"));
    assert_eq!(received[0].1["startDate"], "2024-03-01");
    assert_eq!(received[0].1["latitude"], 37.5);

    Ok(())
}

#[tokio::test]
async fn test_save_status_mapping() -> anyhow::Result<()> {
    let (client, _backend) = spawn_backend().await?;
    let request = SaveRequest::new(&itinerary(), &TripContext::default());

    assert!(matches!(
        client.save("expired", &request).await,
        Err(ApiError::Unauthorized)
    ));
    assert!(matches!(
        client.save("broken", &request).await,
        Err(ApiError::Status(500))
    ));

    Ok(())
}

#[tokio::test]
async fn test_submit_returns_recommendations() -> anyhow::Result<()> {
    let (client, backend) = spawn_backend().await?;
    let payload = TripPayload {
        recommendations: itinerary(),
        context: TripContext {
            companion: "연인".to_owned(),
            purpose: "데이트".to_owned(),
            ..Default::default()
        },
    };

    let itinerary = client.submit(&SubmitRequest::new(&payload)).await?;

    assert_eq!(itinerary.len(), 2);
    assert_eq!(itinerary.days()[0].places[0].name, "남산타워");

    let received = backend.received.lock().unwrap().clone();
    assert_eq!(received[0].1["companion"], "연인");
    assert_eq!(received[0].1["travelPurpose"], "데이트");

    Ok(())
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let client = HttpClient::new(format!("http://{addr}"), Duration::from_secs(2))?;
    let result = client
        .submit(&SubmitRequest::new(&TripPayload::default()))
        .await;

    assert!(matches!(result, Err(ApiError::Transport(_))));

    Ok(())
}
