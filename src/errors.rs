// errors.rs
use astra::Response;
use thiserror::Error;

/// Errors originating from either the server logic
/// (routing, validation, missing resources) or downstream layers (store, disk).
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("Method Not Allowed")]
    MethodNotAllowed,
    #[error("Payload exceeds {0} bytes")]
    PayloadTooLarge(u64),
    #[error("Store Error: {0}")]
    Store(String),
    #[error("IO Error: {0}")]
    Io(String),
    #[error("Internal Server Error")]
    Internal,
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;

impl ServerError {
    pub fn not_found(what: &str) -> Self {
        ServerError::NotFound(format!("{what} not found"))
    }

    /// HTTP status this error is reported with.
    pub fn status(&self) -> u16 {
        match self {
            ServerError::NotFound(_) => 404,
            ServerError::Validation(_) => 422,
            ServerError::BadRequest(_) => 400,
            ServerError::Unauthorized(_) => 401,
            ServerError::MethodNotAllowed => 405,
            ServerError::PayloadTooLarge(_) => 413,
            ServerError::Store(_) | ServerError::Io(_) | ServerError::Internal => 500,
        }
    }

    /// Message safe to show to the client. Server-side failures stay generic.
    pub fn public_message(&self) -> String {
        match self {
            ServerError::Store(_) | ServerError::Io(_) | ServerError::Internal => {
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<rusqlite::Error> for ServerError {
    fn from(e: rusqlite::Error) -> Self {
        ServerError::Store(e.to_string())
    }
}

impl From<serde_json::Error> for ServerError {
    fn from(e: serde_json::Error) -> Self {
        ServerError::Store(format!("document (de)serialization failed: {e}"))
    }
}

impl From<std::io::Error> for ServerError {
    fn from(e: std::io::Error) -> Self {
        ServerError::Io(e.to_string())
    }
}
