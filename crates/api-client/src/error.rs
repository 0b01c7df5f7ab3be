use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("The quote request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("The quote API returned an error: HTTP {0}")]
    Status(u16),

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),

    #[error("Invalid data format from API: {0}")]
    InvalidData(String),
}
