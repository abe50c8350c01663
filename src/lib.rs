pub mod error;
pub use error::{ErrorKind, WarError};

pub mod frame;
pub use frame::{Command, Frame, Outcome};

pub mod handle;
pub use handle::Handle;

pub mod game;
pub use game::{compare_cards, deal_cards, Card, Deck, Hand};

pub mod session;
pub use session::{GameSummary, Session, SessionId};

pub mod server;
pub use server::{serve_game, Server, ServerConfig};

pub mod client;
pub use client::{play_game, play_game_with_timeout, run_clients, ClientTally, GameRecord, Verdict};
