use thiserror::Error;

/// Error taxonomy shared across the booking cells. `Display` strings are
/// shown to the user as-is, so keep them human-readable.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Response decoding error: {0}")]
    Decode(#[from] serde_json::Error),
}
