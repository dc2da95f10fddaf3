use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("map script request failed: {0}")]
    Request(String),

    #[error("map script returned status {0}")]
    Status(u16),

    #[error("map script is empty")]
    EmptyScript,
}

pub type MapResult<T> = Result<T, MapError>;
