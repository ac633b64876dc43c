//! CLI binary for the talking IRC client.

use clap::Parser;
use std::path::PathBuf;
use talking_irc::{ClientConfig, controller};
use tracing_subscriber::EnvFilter;

/// Speaking IRC client: reads channel activity aloud, relays typed input.
#[derive(Parser)]
#[command(name = "talking-irc", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Hostname to connect to.
    #[arg(long)]
    host: Option<String>,

    /// Server port.
    #[arg(long)]
    port: Option<u16>,

    /// Channel to join.
    #[arg(long)]
    channel: Option<String>,

    /// Nickname to appear as.
    #[arg(long)]
    nick: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Diagnostics go to the tracing subscriber; stdout is reserved for the
    // conversation echo.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("talking_irc=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = if let Some(ref path) = cli.config {
        ClientConfig::from_file(path)?
    } else {
        ClientConfig::default()
    };
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(channel) = cli.channel {
        config.server.channel = channel;
    }
    if let Some(nick) = cli.nick {
        config.server.nick = nick;
    }
    config.validate()?;

    println!(
        "Connecting to {} {} as {}",
        config.server.host, config.server.channel, config.server.nick
    );
    controller::run(&config).await?;
    println!("Closed");
    Ok(())
}
