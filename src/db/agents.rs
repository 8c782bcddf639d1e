use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::sessions;
use crate::db::connection::Database;
use crate::db::listings::ListingRepository;
use crate::db::store::{Collection, Filter, Sort};
use crate::domain::agent::{Agent, AgentSeed, AgentSummary};
use crate::errors::ServerError;

/// What a successful login hands back to the client.
#[derive(Debug, Clone, Serialize)]
pub struct LoginGrant {
    pub token: String,
    pub agent: Agent,
}

/// The office team: seeded once, read with live listing counts.
pub struct AgentRegistry<'a> {
    db: &'a Database,
    agents: Collection<'a, Agent>,
}

impl<'a> AgentRegistry<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self {
            db,
            agents: db.collection(),
        }
    }

    /// Insert every seed whose name is not registered yet.
    /// Returns how many agents were added.
    pub fn seed(&self, seeds: &[AgentSeed]) -> Result<usize, ServerError> {
        let mut added = 0;

        for seed in seeds {
            if self.agents.find_one(&by_name(&seed.name))?.is_some() {
                continue;
            }

            let agent = Agent {
                id: Uuid::new_v4().to_string(),
                name: seed.name.clone(),
                phone: seed.phone.clone(),
                email: seed.email.clone(),
            };
            self.agents.insert(&agent)?;
            added += 1;
        }

        info!(added, configured = seeds.len(), "agents seeded");
        Ok(added)
    }

    /// All agents with the number of listings currently carrying their name.
    pub fn list(&self) -> Result<Vec<AgentSummary>, ServerError> {
        let agents = self.agents.find_many(&Filter::new(), Sort::Natural)?;
        let listings = ListingRepository::new(self.db);

        agents
            .into_iter()
            .map(|agent| {
                let properties_count = listings.count_for_agent(&agent.name)?;
                Ok(AgentSummary {
                    agent,
                    properties_count,
                })
            })
            .collect()
    }

    pub fn find_by_name(&self, name: &str) -> Result<Agent, ServerError> {
        self.agents
            .find_one(&by_name(name))?
            .ok_or_else(|| ServerError::not_found("Agent"))
    }

    /// Look the agent up by exact name and open a session for it.
    pub fn login(&self, name: &str, now: i64, ttl_secs: i64) -> Result<LoginGrant, ServerError> {
        let agent = match self.find_by_name(name) {
            Ok(agent) => agent,
            Err(e) => {
                warn!(name, "login for unknown agent");
                return Err(e);
            }
        };

        let token = sessions::create_session(self.db, &agent, now, ttl_secs)?;
        info!(agent = %agent.name, "agent logged in");

        Ok(LoginGrant { token, agent })
    }

    /// The agent behind a bearer token, if the session is still valid.
    pub fn authenticate(&self, raw_token: &str, now: i64) -> Result<Agent, ServerError> {
        let Some(session) = sessions::load_session(self.db, raw_token, now)? else {
            return Err(ServerError::Unauthorized("invalid or expired token".into()));
        };

        self.agents
            .find_one(&Filter::new().eq("id", session.agent_id))?
            .ok_or_else(|| ServerError::Unauthorized("invalid or expired token".into()))
    }

    pub fn logout(&self, raw_token: &str) -> Result<(), ServerError> {
        if !sessions::revoke_session(self.db, raw_token)? {
            return Err(ServerError::Unauthorized("invalid or expired token".into()));
        }
        Ok(())
    }
}

fn by_name(name: &str) -> Filter {
    Filter::new().eq("name", name)
}
