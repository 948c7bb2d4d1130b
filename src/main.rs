//! slirc-bridge - Straylight protocol bridge
//!
//! Usage:
//!   slirc-bridge [config.toml]
//!   slirc-bridge [config.toml] replay <#channel> <log glob>

use std::sync::Arc;

use slirc_bridge::config::{Config, LogFormat, validation};
use slirc_bridge::replay::{expand_logs, replay};
use slirc_bridge::transport::LineTransport;
use slirc_bridge::{Gateway, TracingSink};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

enum Mode {
    Bridge,
    Replay { channel: String, pattern: String },
}

fn parse_args() -> anyhow::Result<(String, Mode)> {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let config_path = match args.first() {
        Some(first) if first != "replay" => args.remove(0),
        _ => "config.toml".to_string(),
    };
    let mode = match args.as_slice() {
        [] => Mode::Bridge,
        [cmd, channel, pattern] if cmd == "replay" => Mode::Replay {
            channel: channel.clone(),
            pattern: pattern.clone(),
        },
        _ => anyhow::bail!("usage: slirc-bridge [config.toml] [replay <#channel> <log glob>]"),
    };
    Ok((config_path, mode))
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    match config.logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config_path, mode) = parse_args()?;
    let config = Config::load(&config_path)
        .map_err(|e| anyhow::anyhow!("failed to load {config_path}: {e}"))?;
    init_tracing(&config);

    if let Err(errors) = validation::validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        anyhow::bail!("{} configuration error(s) in {config_path}", errors.len());
    }

    info!(
        network = %config.server.name,
        hostname = %config.server.hostname,
        address = %config.link.address(),
        "Starting slirc-bridge"
    );

    let transport = Arc::new(LineTransport::new(config.link.clone()));
    let gateway = Gateway::new(config, transport, Arc::new(TracingSink));
    gateway.connect().await?;

    match mode {
        Mode::Bridge => {
            let latch = gateway.latch();
            tokio::select! {
                res = tokio::signal::ctrl_c() => {
                    if let Err(e) = res {
                        warn!(error = %e, "Cannot listen for ctrl-c");
                    }
                    info!("Shutdown requested");
                }
                _ = latch.wait() => {
                    warn!("Foreign link closed");
                }
            }
        }
        Mode::Replay { channel, pattern } => {
            let logs = expand_logs(&pattern)?;
            if logs.is_empty() {
                warn!(pattern = %pattern, "No log files matched");
            }
            let replay_config = gateway.config().replay.clone();
            let result = replay(&gateway, &channel, &logs, &replay_config).await;
            if let Err(e) = &result {
                error!(error = %e, code = e.error_code(), "Replay failed");
            }
            gateway.stop().await;
            result?;
            return Ok(());
        }
    }

    if let Some(split) = gateway.stop().await {
        info!(users = split.users.len(), "Gateway stopped");
    }
    Ok(())
}
