// src/app.rs
use anyhow::{Context, Result};

use crate::config::Config;
use crate::db::agents::AgentRegistry;
use crate::db::Database;
use crate::media::MediaStore;

/// Everything a request handler needs, built once at startup.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub media: MediaStore,
    pub config: Config,
}

impl AppState {
    /// Open the store, prepare the upload directory and seed the agents.
    pub fn init(config: Config) -> Result<Self> {
        let db = Database::open(config.database_path.clone())
            .with_context(|| format!("failed to open database {}", config.database_path))?;

        let media = MediaStore::new(&config.upload_dir, config.max_upload_bytes).with_context(
            || format!("failed to prepare upload dir {}", config.upload_dir.display()),
        )?;

        AgentRegistry::new(&db)
            .seed(&config.agents)
            .context("failed to seed agents")?;

        Ok(Self { db, media, config })
    }

    /// Release the store at shutdown.
    pub fn shutdown(self) -> Result<()> {
        self.db.close().context("failed to close database")
    }
}

pub fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}
