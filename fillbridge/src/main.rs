//! Fetches BigBelly container assets once and forwards their fill levels as SenML.

mod config;

use std::error::Error as StdError;

use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::Client;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use fillbridge_core::service::FillLevelService;
use fillbridge_provider_bigbelly as bigbelly;
use fillbridge_sink_http as http_sink;

use crate::config::{DEFAULT_LOG_LEVEL, ServiceConfig};

const SERVICE_NAME: &str = env!("CARGO_PKG_NAME");
const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Logging comes up before the config is checked so a bad config is logged too.
    let loaded = ServiceConfig::from_env();
    init_tracing(
        loaded
            .as_ref()
            .map_or(DEFAULT_LOG_LEVEL, |config| config.log_level.as_str()),
    );
    let config = checked_config(loaded)?;

    info!(service = SERVICE_NAME, version = SERVICE_VERSION, "starting");
    info!(?config, "configuration loaded");

    // HTTP + service setup
    let client = Client::builder()
        .user_agent(format!("{SERVICE_NAME}/{SERVICE_VERSION}"))
        .timeout(config.request_timeout())
        .build()?;

    let service = FillLevelService::new(
        bigbelly::asset_port(client.clone(), &config.bigbelly_api, &config.xtoken),
        http_sink::sink(client),
        &config.diwise_api,
    );

    match service.run(Utc::now()).await {
        Ok(summary) => {
            info!(sent = summary.sent, "run complete");
            Ok(())
        }
        Err(err) => {
            error!(error = %err, "run failed");
            Err(err).context("failed to forward fill levels")
        }
    }
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .init();
}

fn checked_config<E>(loaded: Result<ServiceConfig, E>) -> Result<ServiceConfig>
where
    E: StdError + Send + Sync + 'static,
{
    loaded
        .inspect_err(|err| error!(error = %err, "failed to load configuration"))
        .context("failed to load configuration")
}
