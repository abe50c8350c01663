use crate::frame::Command;
use crate::session::Seat;
use std::io;
use thiserror::Error;

/// Everything that can end a game early.
///
/// The session treats every variant the same way (both connections are torn
/// down), but keeping them apart makes the logs useful.
#[derive(Debug, Error)]
pub enum WarError {
    /// Peer closed the connection in the middle of a message.
    #[error("peer closed after {received} of {expected} bytes")]
    Framing { expected: usize, received: usize },

    #[error("expected {expected:?}, got command byte {found:#04x}")]
    UnexpectedCommand { expected: Command, found: u8 },

    #[error("bad payload {payload:#04x} for {command:?}")]
    BadPayload { command: Command, payload: u8 },

    /// Card is not in the claimant's remaining hand: replayed, never dealt
    /// to them, or not a card at all.
    #[error("{seat} played card {card} which is not in their hand")]
    IllegalMove { seat: Seat, card: u8 },

    #[error(transparent)]
    Transport(#[from] io::Error),
}

/// Coarse classification of a [`WarError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Framing,
    ProtocolViolation,
    IllegalMove,
    Transport,
}

impl WarError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WarError::Framing { .. } => ErrorKind::Framing,
            WarError::UnexpectedCommand { .. } | WarError::BadPayload { .. } => {
                ErrorKind::ProtocolViolation
            }
            WarError::IllegalMove { .. } => ErrorKind::IllegalMove,
            WarError::Transport(_) => ErrorKind::Transport,
        }
    }
}
