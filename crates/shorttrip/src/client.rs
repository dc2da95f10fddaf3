use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tripview_itinerary::Itinerary;

use crate::{ApiError, ApiResult, SaveRequest, SubmitRequest, SubmitResponse};

pub const SAVE_PATH: &str = "/api/shortTrip/save";
pub const SUBMIT_PATH: &str = "/api/shortTrip/submit";

#[async_trait]
pub trait ShortTripApi: Send + Sync {
    async fn save(&self, credential: &str, request: &SaveRequest) -> ApiResult<()>;

    async fn submit(&self, request: &SubmitRequest) -> ApiResult<Itinerary>;
}

/// reqwest-backed [`ShortTripApi`].
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

fn check_status(status: StatusCode) -> ApiResult<()> {
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }

    if !status.is_success() {
        return Err(ApiError::Status(status.as_u16()));
    }

    Ok(())
}

#[async_trait]
impl ShortTripApi for HttpClient {
    #[tracing::instrument(skip_all, fields(days = request.recommendations.len()))]
    async fn save(&self, credential: &str, request: &SaveRequest) -> ApiResult<()> {
        let response = self
            .client
            .post(self.url(SAVE_PATH))
            .bearer_auth(credential)
            .json(request)
            .send()
            .await?;

        check_status(response.status())
    }

    #[tracing::instrument(skip_all, fields(purpose = %request.travel_purpose))]
    async fn submit(&self, request: &SubmitRequest) -> ApiResult<Itinerary> {
        let response = self
            .client
            .post(self.url(SUBMIT_PATH))
            .json(request)
            .send()
            .await?;

        check_status(response.status())?;

        let bytes = response.bytes().await?;
        let body: SubmitResponse = serde_json::from_slice(&bytes)?;

        Ok(body.into())
    }
}
