pub mod errors;
pub mod files;
pub mod json;

use astra::Response;
use http::header::{HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN};

pub use errors::{error_to_response, ResultResp};
pub use files::file_response;
pub use json::{json_response, message_response, no_content};

/// Permissive CORS headers, attached to every response.
pub fn with_cors(mut resp: Response) -> Response {
    let headers = resp.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Authorization, Content-Type"),
    );
    resp
}
