mod properties_tests;
mod upload_tests;

use crate::app::AppState;
use crate::responses::error_to_response;
use crate::router::handle;
use astra::{Body, Response};
use http::{Method, Request};

/// Route a request the way the server does, errors included.
pub(crate) fn send(state: &AppState, req: Request<Body>) -> Response {
    handle(req, state).unwrap_or_else(error_to_response)
}

pub(crate) fn get(state: &AppState, uri: &str) -> Response {
    let req = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(state, req)
}
