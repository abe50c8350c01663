use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;
use tracing::{info, Level};
use war::client::{play_game, run_clients, DEFAULT_LIMIT, DEFAULT_TIMEOUT};

#[derive(Parser)]
#[command(about = "Play War automatically against a server")]
struct ClientArgs {
    host: String,
    port: u16,
    /// Run this many players at once instead of a single game
    #[arg(long)]
    clients: Option<usize>,
    /// Most games in flight at a time when running several clients
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    limit: usize,
    /// Seconds each of several clients waits on the server before giving up
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout_secs: u64,
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = ClientArgs::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .init();

    let addr = resolve(&args.host, args.port)?;

    match args.clients {
        Some(count) => {
            let timeout = Duration::from_secs(args.timeout_secs);
            let tally = run_clients(addr, count, args.limit, timeout);
            info!("{} completed clients", tally.completed);
        }
        None => {
            let record = play_game(addr).context("game failed")?;
            info!(
                "Game over! You {:?} ({} wins, {} losses, {} draws)",
                record.verdict(),
                record.wins,
                record.losses,
                record.draws
            );
        }
    }

    Ok(())
}

fn resolve(host: &str, port: u16) -> Result<SocketAddr> {
    (host, port)
        .to_socket_addrs()
        .with_context(|| format!("cannot resolve {}:{}", host, port))?
        .next()
        .ok_or_else(|| anyhow!("no address for {}:{}", host, port))
}
