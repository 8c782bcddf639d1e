use crate::app::AppState;
use crate::config::Config;
use crate::responses::{error_to_response, with_cors};
use crate::router::handle;
use anyhow::Context;
use astra::Server;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod api;
mod app;
mod auth;
mod config;
mod db;
mod domain;
mod errors;
mod media;
mod responses;
mod router;

#[cfg(test)]
mod tests;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // 1️⃣ Configuration
    let config = Config::from_env()?;
    let addr = config.bind_addr;
    let workers = config.max_workers;

    // 2️⃣ Store, uploads, seeded agents
    let state = AppState::init(config)?;

    // 3️⃣ Start the server
    info!(%addr, workers, "starting server");
    let server = Server::bind(&addr).max_workers(workers);

    let shared = state.clone();
    let result = server.serve(move |req: astra::Request, _info| {
        let started = Instant::now();
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        let resp = match handle(req, &shared) {
            Ok(resp) => resp,
            Err(err) => error_to_response(err),
        };

        info!(
            %method,
            %path,
            status = resp.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request"
        );
        with_cors(resp)
    });

    result.context("server ended with error")?;

    state.shutdown()?;
    info!("server shut down cleanly");
    Ok(())
}
