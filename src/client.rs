//! An automatic War player: plays its cards in the order they were dealt.

use crate::error::WarError;
use crate::frame::{Frame, Outcome};
use crate::handle::Handle;
use std::net::{SocketAddr, TcpStream};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// How many games the harness runs at once unless told otherwise.
pub const DEFAULT_LIMIT: usize = 1000;

/// How long a batch player waits on the server before giving up.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Won,
    Lost,
    Drew,
}

/// One player's view of a finished game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameRecord {
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
}

impl GameRecord {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Lose => self.losses += 1,
            Outcome::Draw => self.draws += 1,
        }
    }

    pub fn rounds(&self) -> usize {
        self.wins + self.losses + self.draws
    }

    pub fn score(&self) -> i64 {
        self.wins as i64 - self.losses as i64
    }

    pub fn verdict(&self) -> Verdict {
        match self.score() {
            s if s > 0 => Verdict::Won,
            s if s < 0 => Verdict::Lost,
            _ => Verdict::Drew,
        }
    }
}

/// Connects to a server and plays one full game, waiting as long as it
/// takes for an opponent.
pub fn play_game(addr: SocketAddr) -> Result<GameRecord, WarError> {
    play_game_with_timeout(addr, None)
}

/// Like [`play_game`], but gives up when any single read or write takes
/// longer than `timeout`, including the wait for an opponent.
pub fn play_game_with_timeout(
    addr: SocketAddr,
    timeout: Option<Duration>,
) -> Result<GameRecord, WarError> {
    let mut handle = Handle::new(TcpStream::connect(addr)?)?;
    handle.set_timeout(timeout)?;

    debug!("WANTGAME");
    handle.send_frame(&Frame::WantGame)?;

    let hand = handle.read_game_start()?;
    debug!(%hand, "GAMESTART");

    let mut record = GameRecord::default();
    for card in hand.cards() {
        handle.send_frame(&Frame::PlayCard(card.value()))?;

        let outcome = handle.read_play_result()?;
        record.record(outcome);
        debug!(%card, ?outcome, score = record.score(), "PLAYRESULT");
    }

    debug!("Game over! {:?}", record.verdict());
    Ok(record)
}

/// Result of a batch of clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientTally {
    pub completed: usize,
    pub failed: usize,
}

/// Plays `count` games against `addr`, at most `limit` at a time.
///
/// A new player starts as soon as any running one finishes. Every player
/// gives up after `timeout` without hearing from the server, so the odd one
/// out of an odd `count` is tallied as failed instead of waiting forever.
/// A failed game is counted, not propagated.
pub fn run_clients(addr: SocketAddr, count: usize, limit: usize, timeout: Duration) -> ClientTally {
    // The first player in flight can only be paired with a second.
    let limit = limit.max(2);
    let (tx, rx) = mpsc::channel();
    let mut tally = ClientTally::default();
    let mut started = 0;

    while tally.completed + tally.failed < count {
        while started < count && started - (tally.completed + tally.failed) < limit {
            let tx = tx.clone();
            let spawned = thread::Builder::new()
                .name(format!("war-client-{}", started))
                .spawn(move || {
                    let _ = tx.send(play_game_with_timeout(addr, Some(timeout)));
                });
            started += 1;

            if let Err(e) = spawned {
                warn!("could not start client: {}", e);
                tally.failed += 1;
            }
        }

        // Nothing in flight when the last spawns failed.
        if started == tally.completed + tally.failed {
            continue;
        }

        match rx.recv() {
            Ok(Ok(_)) => tally.completed += 1,
            Ok(Err(e)) => {
                warn!("client failed: {}", e);
                tally.failed += 1;
            }
            Err(_) => break,
        }
    }

    info!("{} completed clients, {} failed", tally.completed, tally.failed);
    tally
}
