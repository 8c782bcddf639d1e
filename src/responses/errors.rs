use crate::errors::ServerError;
use astra::{Body, Response, ResponseBuilder};
use tracing::error;

pub use crate::errors::ResultResp;

/// Convert a ServerError into a JSON `{"detail": ...}` response.
pub fn error_to_response(err: ServerError) -> Response {
    if err.status() >= 500 {
        error!(error = %err, "request failed");
    }

    let body = serde_json::json!({ "detail": err.public_message() }).to_string();

    ResponseBuilder::new()
        .status(err.status())
        .header("Content-Type", mime::APPLICATION_JSON.as_ref())
        .body(Body::from(body))
        .unwrap_or_else(|_| Response::new(Body::from("Internal Server Error")))
}
