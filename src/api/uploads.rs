// src/api/uploads.rs
use astra::Request;
use tracing::warn;

use crate::api::params::{parse_form, read_body};
use crate::app::AppState;
use crate::errors::ServerError;
use crate::responses::{file_response, json_response, ResultResp};

/// Room for multipart framing around the file itself.
const MULTIPART_OVERHEAD: u64 = 64 * 1024;

/// POST /api/upload with a multipart `file` part.
pub fn upload(req: Request, state: &AppState) -> ResultResp {
    let (parts, body) = req.into_parts();

    let body = match read_body(body, state.media.max_bytes() + MULTIPART_OVERHEAD) {
        Err(ServerError::PayloadTooLarge(_)) => {
            warn!(limit = state.media.max_bytes(), "upload rejected: too large");
            return Err(ServerError::PayloadTooLarge(state.media.max_bytes()));
        }
        other => other?,
    };
    let form = parse_form(&parts.headers, &body)?;

    let Some((filename, data)) = form.iter().find_map(|p| {
        let filename = p.filename.as_deref().filter(|f| !f.trim().is_empty())?;
        (p.name == "file").then_some((filename, &p.data))
    }) else {
        return Err(ServerError::BadRequest("No file uploaded".into()));
    };

    let stored = state.media.save(filename, data)?;
    json_response(200, &stored)
}

/// GET /uploads/{filename}
pub fn serve(state: &AppState, filename: &str) -> ResultResp {
    let (bytes, mime) = state.media.open(filename)?;
    file_response(bytes, &mime)
}
