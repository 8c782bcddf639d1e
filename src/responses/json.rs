// responses/json.rs
use crate::errors::ServerError;
use crate::responses::ResultResp;
use astra::{Body, ResponseBuilder};
use serde::Serialize;

/// Serialize `payload` as the JSON body of a response with `status`.
pub fn json_response<T: Serialize + ?Sized>(status: u16, payload: &T) -> ResultResp {
    let body = serde_json::to_vec(payload).map_err(|_| ServerError::Internal)?;

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", mime::APPLICATION_JSON.as_ref())
        .body(Body::from(body))
        .map_err(|_| ServerError::Internal)
}

/// `{"message": ...}` with the given status.
pub fn message_response(status: u16, message: &str) -> ResultResp {
    json_response(status, &serde_json::json!({ "message": message }))
}

pub fn no_content() -> ResultResp {
    ResponseBuilder::new()
        .status(204)
        .body(Body::empty())
        .map_err(|_| ServerError::Internal)
}
