//! One game of War between two connections.
//!
//! The server is the only party that knows both hands, so it checks every
//! card a player claims to hold. Any deviation from the protocol ends the
//! game for both players.

use crate::error::WarError;
use crate::frame::{Frame, Outcome};
use crate::game::{compare_cards, deal_cards_with, Hand, HAND_SIZE};
use crate::handle::Handle;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use tracing::{debug, info, info_span, warn};

/// Number of rounds in a full game: one per dealt card.
pub const ROUNDS: usize = HAND_SIZE;

/// Opaque identifier handed out by the server in pairing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seat {
    One,
    Two,
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Seat::One => write!(f, "p1"),
            Seat::Two => write!(f, "p2"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitingWantGame,
    Dealt,
    Round(usize),
    Complete,
}

/// How a finished game went, from the server's side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameSummary {
    pub rounds: usize,
    pub p1_wins: usize,
    pub p2_wins: usize,
    pub draws: usize,
    /// Cards each seat still held when the game ended.
    pub cards_left: [usize; 2],
}

struct Player {
    seat: Seat,
    handle: Handle,
    hand: Hand,
}

impl Player {
    fn new(seat: Seat, handle: Handle) -> Player {
        Player {
            seat,
            handle,
            hand: Hand::default(),
        }
    }
}

pub struct Session<R = StdRng> {
    id: SessionId,
    players: [Player; 2],
    rng: R,
    summary: GameSummary,
}

impl Session {
    /// A session whose deal is drawn from a freshly seeded generator.
    pub fn new(id: SessionId, p1: Handle, p2: Handle) -> Session {
        Session::with_rng(id, p1, p2, StdRng::from_entropy())
    }
}

impl<R: Rng> Session<R> {
    pub fn with_rng(id: SessionId, p1: Handle, p2: Handle, rng: R) -> Session<R> {
        Session {
            id,
            players: [Player::new(Seat::One, p1), Player::new(Seat::Two, p2)],
            rng,
            summary: GameSummary::default(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Plays the game to the end. Both connections are closed when this
    /// returns, whether or not the game completed.
    pub fn run(mut self) -> Result<GameSummary, WarError> {
        let span = info_span!("session", id = %self.id);
        let _enter = span.enter();

        let mut state = State::AwaitingWantGame;
        while state != State::Complete {
            state = match self.step(state) {
                Ok(next) => next,
                Err(e) => {
                    warn!(?state, error = %e, "killing game");
                    self.kill();
                    return Err(e);
                }
            };
        }

        self.summary.cards_left = [self.players[0].hand.len(), self.players[1].hand.len()];
        info!(
            p1_wins = self.summary.p1_wins,
            p2_wins = self.summary.p2_wins,
            draws = self.summary.draws,
            "game complete"
        );

        let summary = self.summary.clone();
        self.close();
        Ok(summary)
    }

    fn step(&mut self, state: State) -> Result<State, WarError> {
        match state {
            State::AwaitingWantGame => {
                for player in self.players.iter_mut() {
                    player.handle.read_want_game()?;
                    debug!(seat = %player.seat, "WANTGAME");
                }
                Ok(State::Dealt)
            }
            State::Dealt => {
                let (first, second) = deal_cards_with(&mut self.rng);
                self.players[0].hand = first;
                self.players[1].hand = second;

                for player in self.players.iter_mut() {
                    player
                        .handle
                        .send_frame(&Frame::GameStart(player.hand.clone()))?;
                    debug!(seat = %player.seat, hand = %player.hand, "GAMESTART");
                }
                Ok(State::Round(0))
            }
            State::Round(round) => {
                self.play_round(round)?;
                if round + 1 == ROUNDS {
                    Ok(State::Complete)
                } else {
                    Ok(State::Round(round + 1))
                }
            }
            State::Complete => Ok(State::Complete),
        }
    }

    fn play_round(&mut self, round: usize) -> Result<(), WarError> {
        let plays = [
            self.players[0].handle.read_play_card()?,
            self.players[1].handle.read_play_card()?,
        ];

        let mut cards = Vec::with_capacity(2);
        for (player, card) in self.players.iter_mut().zip(plays) {
            let taken = player.hand.take(card).ok_or(WarError::IllegalMove {
                seat: player.seat,
                card,
            })?;
            cards.push(taken);
        }

        let first = Outcome::of(compare_cards(cards[0], cards[1]));
        let outcomes = [first, first.opposite()];
        debug!(round, p1 = %cards[0], p2 = %cards[1], ?first, "PLAYCARD");

        match first {
            Outcome::Win => self.summary.p1_wins += 1,
            Outcome::Lose => self.summary.p2_wins += 1,
            Outcome::Draw => self.summary.draws += 1,
        }
        self.summary.rounds += 1;

        for (player, outcome) in self.players.iter_mut().zip(outcomes) {
            player.handle.send_frame(&Frame::PlayResult(outcome))?;
        }
        Ok(())
    }

    fn close(self) {
        debug!("closing connections");
        // Dropping the handles closes both sockets.
    }

    fn kill(self) {
        for player in self.players {
            player.handle.shutdown();
        }
    }
}
