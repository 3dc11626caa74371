use argh::FromArgs;
use tracing::{info, warn};

use holdbot::{Config, Holdbot, consts, storage, telemetry};

/// An IRC bot with a bag of holding
#[derive(Debug, FromArgs)]
struct Opts {
    /// path to config file
    #[argh(
        option,
        short = 'c',
        default = "String::from(consts::DEFAULT_CONFIG_PATH)"
    )]
    config_path: String,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let opts: Opts = argh::from_env();

    println!(
        "{} v{} running",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::load(&opts.config_path)?;

    telemetry::try_init(&config.tracing)?;

    info!(config_path = %opts.config_path, "configuration loaded");

    let store = storage::open(&config.storage)
        .await
        .map_err(holdbot::Error::from)?;
    let bot = Holdbot::new(config, store);

    bot.run().await?;

    warn!("connection closed");

    Ok(())
}
