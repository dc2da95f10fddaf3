use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("authentication rejected")]
    Unauthorized,

    #[error("backend returned status {0}")]
    Status(u16),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid response body: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
