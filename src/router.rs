use crate::api::{agents, auth, properties, uploads};
use crate::app::AppState;
use crate::domain::listing::PropertyType;
use crate::errors::ServerError;
use crate::responses::{message_response, no_content, ResultResp};
use astra::Request;

pub fn handle(req: Request, state: &AppState) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match (method.as_str(), segments.as_slice()) {
        ("OPTIONS", _) => no_content(),

        ("GET", []) => message_response(200, "Listings API is running!"),

        // Listings
        ("GET", ["api", "properties"]) => properties::list(req, state),
        ("POST", ["api", "properties"]) => properties::create(req, state),
        ("GET", ["api", "properties", "sale"]) => properties::list_kind(state, PropertyType::Sale),
        ("GET", ["api", "properties", "rent"]) => properties::list_kind(state, PropertyType::Rent),
        ("GET", ["api", "properties", id]) => properties::get(state, id),
        ("PUT", ["api", "properties", id]) => properties::update(req, state, id),
        ("DELETE", ["api", "properties", id]) => properties::delete(state, id),

        // Office
        ("GET", ["api", "agents"]) => agents::list(state),
        ("GET", ["api", "office-info"]) => agents::office_info(),

        // Media
        ("POST", ["api", "upload"]) => uploads::upload(req, state),
        ("GET", ["uploads", filename]) => uploads::serve(state, filename),

        // Auth
        ("POST", ["api", "auth", "login"]) => auth::login(req, state),
        ("GET", ["api", "auth", "me"]) => auth::me(&req, state),
        ("POST", ["api", "auth", "logout"]) => auth::logout(&req, state),

        (_, segs) if is_known_path(segs) => Err(ServerError::MethodNotAllowed),
        _ => Err(ServerError::NotFound("Not Found".into())),
    }
}

fn is_known_path(segments: &[&str]) -> bool {
    matches!(
        segments,
        []
            | ["api", "properties"]
            | ["api", "properties", _]
            | ["api", "agents"]
            | ["api", "office-info"]
            | ["api", "upload"]
            | ["uploads", _]
            | ["api", "auth", "login" | "me" | "logout"]
    )
}
