// src/api/auth.rs
use astra::Request;
use tracing::info;

use crate::api::params::{bearer_token, parse_form, read_body, MAX_FORM_BYTES};
use crate::app::{now_unix, AppState};
use crate::db::agents::AgentRegistry;
use crate::errors::ServerError;
use crate::responses::{json_response, message_response, ResultResp};

/// POST /api/auth/login with form field `agent_name`.
pub fn login(req: Request, state: &AppState) -> ResultResp {
    let (parts, body) = req.into_parts();
    let body = read_body(body, MAX_FORM_BYTES)?;
    let form = parse_form(&parts.headers, &body)?;

    let agent_name = form
        .iter()
        .find(|p| p.name == "agent_name")
        .and_then(|p| p.text())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ServerError::Validation("agent_name is required".into()))?;

    let grant = AgentRegistry::new(&state.db).login(
        agent_name,
        now_unix(),
        state.config.session_ttl_secs,
    )?;
    json_response(200, &grant)
}

/// GET /api/auth/me
pub fn me(req: &Request, state: &AppState) -> ResultResp {
    let token = bearer_token(req.headers())
        .ok_or_else(|| ServerError::Unauthorized("missing bearer token".into()))?;

    let agent = AgentRegistry::new(&state.db).authenticate(token, now_unix())?;
    json_response(200, &agent)
}

/// POST /api/auth/logout
pub fn logout(req: &Request, state: &AppState) -> ResultResp {
    let token = bearer_token(req.headers())
        .ok_or_else(|| ServerError::Unauthorized("missing bearer token".into()))?;

    AgentRegistry::new(&state.db).logout(token)?;
    info!("agent logged out");
    message_response(200, "Logged out")
}
