// src/api/agents.rs
use crate::app::AppState;
use crate::db::agents::AgentRegistry;
use crate::domain::office::OfficeInfo;
use crate::responses::{json_response, ResultResp};

pub fn list(state: &AppState) -> ResultResp {
    let agents = AgentRegistry::new(&state.db).list()?;
    json_response(200, &agents)
}

pub fn office_info() -> ResultResp {
    json_response(200, &OfficeInfo::default())
}
