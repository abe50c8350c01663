use anyhow::{Context, Result};
use clap::Parser;
use std::time::Duration;
use tracing::Level;
use war::server::{Server, ServerConfig, DEFAULT_PORT};

#[derive(Parser)]
#[command(about = "Referee games of War between pairs of clients")]
struct ServerArgs {
    #[arg(default_value = "0.0.0.0")]
    host: String,
    #[arg(default_value_t = DEFAULT_PORT)]
    port: u16,
    /// Kill a game when a player stays silent this long
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Log every protocol step
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = ServerArgs::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .init();

    let config = ServerConfig {
        host: args.host,
        port: args.port,
        io_timeout: args.timeout_secs.map(Duration::from_secs),
    };
    let addr = format!("{}:{}", config.host, config.port);

    let server = Server::bind(config).with_context(|| format!("failed to bind {}", addr))?;
    server.serve()?;

    Ok(())
}
