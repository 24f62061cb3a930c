//! Hearts reward server
//!
//! Serves reward queries as line-delimited JSON-RPC on stdio. Logs go to
//! stderr.
//!
//! Shaping config is read from the file named by the first argument or by
//! `HEARTS_REWARD_CONFIG`; without either the defaults are used.

use anyhow::{Context, Result};
use hearts_reward_core::ShapingConfig;
use hearts_reward_server::RewardServer;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const CONFIG_ENV: &str = "HEARTS_REWARD_CONFIG";

fn load_config() -> Result<ShapingConfig> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_ENV).ok());

    match path {
        Some(path) => {
            info!("Loading shaping config from {}", path);
            ShapingConfig::from_path(&path)
                .with_context(|| format!("failed to load shaping config {}", path))
        }
        None => {
            info!("No shaping config given, using defaults");
            Ok(ShapingConfig::default())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config()?;
    info!("Trick policy: {:?}", config.trick_policy);

    let server = RewardServer::new(config);
    server.run_stdio().await?;

    Ok(())
}
