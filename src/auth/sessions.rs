// src/auth/sessions.rs
use serde::{Deserialize, Serialize};

use crate::auth::token::{new_session_token, token_digest};
use crate::db::connection::Database;
use crate::db::store::{Document, Filter};
use crate::domain::agent::Agent;
use crate::errors::ServerError;

/// A login session. `id` is the hash of the bearer token; the raw token is
/// only ever returned to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub agent_id: String,
    pub agent_name: String,
    pub created_at: i64,
    pub expires_at: i64,
}

impl Document for Session {
    const COLLECTION: &'static str = "sessions";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Start a session for `agent` and return the raw token.
pub fn create_session(
    db: &Database,
    agent: &Agent,
    now: i64,
    ttl_secs: i64,
) -> Result<String, ServerError> {
    let raw_token = new_session_token();

    let session = Session {
        id: token_digest(&raw_token),
        agent_id: agent.id.clone(),
        agent_name: agent.name.clone(),
        created_at: now,
        expires_at: now + ttl_secs,
    };
    db.collection::<Session>().insert(&session)?;

    Ok(raw_token)
}

/// The unexpired session behind `raw_token`, if any.
pub fn load_session(
    db: &Database,
    raw_token: &str,
    now: i64,
) -> Result<Option<Session>, ServerError> {
    let filter = Filter::new()
        .eq("id", token_digest(raw_token.trim()))
        .gte("expires_at", now + 1);

    db.collection::<Session>().find_one(&filter)
}

/// End the session behind `raw_token`. Returns whether one existed.
pub fn revoke_session(db: &Database, raw_token: &str) -> Result<bool, ServerError> {
    db.collection::<Session>()
        .delete_one(&Filter::new().eq("id", token_digest(raw_token.trim())))
}
