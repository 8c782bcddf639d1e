// responses/files.rs
use crate::errors::ServerError;
use crate::responses::ResultResp;
use astra::{Body, ResponseBuilder};
use mime::Mime;

/// Return stored file bytes with their content type.
pub fn file_response(bytes: Vec<u8>, content_type: &Mime) -> ResultResp {
    ResponseBuilder::new()
        .status(200)
        .header("Content-Type", content_type.as_ref())
        .header("Cache-Control", "public, max-age=86400")
        .body(Body::from(bytes))
        .map_err(|_| ServerError::Internal)
}
