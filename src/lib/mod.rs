#![warn(clippy::shadow_unrelated)]
pub mod args;
pub mod config;
pub mod discord;
pub mod error;
pub mod health;
pub mod poll;
pub mod state;
pub mod tiktok;
use args::*;
use config::Config;
use discord::Webhook;
use log::info;
use log::{Level, LevelFilter};
use poll::Poller;
use state::FileStateStore;
use std::sync::Arc;
use tiktok::ProfileFetcher;
use tokio::net::TcpListener;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::new();
    let level = to_level_filter(args.verbose.log_level());
    env_logger::Builder::new().filter_level(level).init();
    info!("Log level: {level}");
    let config = Arc::new(Config::try_from(args)?);
    info!("Config is {:?}.", config);
    let poller = Arc::new(Poller::new(
        Box::new(ProfileFetcher::new(&config)?),
        Box::new(Webhook::new(&config)?),
        Box::new(FileStateStore::new(config.state_file.clone())),
    ));
    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!("Server running on port {}", config.port);
    let poll_task = tokio::spawn(poll::run(poller, config.poll_interval));
    tokio::select! {
        result = health::serve(listener, config.clone()) => result?,
        _ = tokio::signal::ctrl_c() => info!("Shutting down."),
    }
    poll_task.abort();
    Ok(())
}

fn to_level_filter(level: Option<Level>) -> LevelFilter {
    match level {
        None => LevelFilter::Off,
        Some(level) => match level {
            Level::Error => LevelFilter::Error,
            Level::Warn => LevelFilter::Warn,
            Level::Info => LevelFilter::Info,
            Level::Debug => LevelFilter::Debug,
            Level::Trace => LevelFilter::Trace,
        },
    }
}
