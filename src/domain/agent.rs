// src/domain/agent.rs
use serde::{Deserialize, Serialize};

use crate::db::store::Document;

/// One entry of the configured office team.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AgentSeed {
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

/// A registered office member. `name` is the business key listings refer to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

impl Document for Agent {
    const COLLECTION: &'static str = "agents";

    fn id(&self) -> &str {
        &self.id
    }
}

/// An agent together with the live number of listings carrying its name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentSummary {
    #[serde(flatten)]
    pub agent: Agent,
    pub properties_count: i64,
}
