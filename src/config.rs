// src/config.rs
use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::domain::agent::AgentSeed;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub bind_addr: SocketAddr,
    pub max_workers: usize,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: u64,
    pub session_ttl_secs: i64,
    pub agents: Vec<AgentSeed>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: "listings.sqlite3".to_string(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8001)),
            max_workers: 8,
            upload_dir: PathBuf::from("uploads"),
            max_upload_bytes: 25 * 1024 * 1024,
            session_ttl_secs: 60 * 60 * 24 * 7,
            agents: default_agents(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let defaults = Self::default();

        let agents = match env::var("AGENT_SEED_FILE") {
            Ok(path) => load_agent_seeds(&path)?,
            Err(_) => defaults.agents,
        };

        Ok(Self {
            database_path: env::var("DATABASE_PATH").unwrap_or(defaults.database_path),
            bind_addr: parse_var("BIND_ADDR")?.unwrap_or(defaults.bind_addr),
            max_workers: parse_var("MAX_WORKERS")?.unwrap_or(defaults.max_workers),
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            max_upload_bytes: parse_var("MAX_UPLOAD_BYTES")?.unwrap_or(defaults.max_upload_bytes),
            session_ttl_secs: parse_var("SESSION_TTL_SECS")?.unwrap_or(defaults.session_ttl_secs),
            agents,
        })
    }
}

/// Reads `key`; an unset variable is `None`, an unparsable one is an error.
fn parse_var<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        Err(_) => Ok(None),
    }
}

fn load_agent_seeds(path: &str) -> Result<Vec<AgentSeed>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read agent seed file {path}"))?;
    serde_json::from_str(&raw).with_context(|| format!("agent seed file {path} is not valid JSON"))
}

/// The office team seeded on first start.
pub fn default_agents() -> Vec<AgentSeed> {
    [
        ("איתמר", "052-1111111", "itamar@minadlan.co.il"),
        ("מתן", "052-2222222", "matan@minadlan.co.il"),
        ("עדן", "052-3333333", "eden@minadlan.co.il"),
        ("ליטל", "052-4444444", "lital@minadlan.co.il"),
    ]
    .into_iter()
    .map(|(name, phone, email)| AgentSeed {
        name: name.to_string(),
        phone: phone.to_string(),
        email: email.to_string(),
    })
    .collect()
}
