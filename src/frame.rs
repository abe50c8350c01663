//! The four War messages and their fixed-size byte layouts.
//!
//! ```text
//! WANTGAME    00 00
//! GAMESTART   01 c0 c1 .. c25
//! PLAYCARD    02 card
//! PLAYRESULT  03 result
//! ```
//!
//! There is no length prefix; the reader already knows which message comes
//! next from where it is in the game.

use crate::error::WarError;
use crate::game::{Card, Hand, HAND_SIZE};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::cmp::Ordering;

/// First byte of every message.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    WantGame = 0,
    GameStart = 1,
    PlayCard = 2,
    PlayResult = 3,
}

impl Command {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::WantGame),
            1 => Some(Self::GameStart),
            2 => Some(Self::PlayCard),
            3 => Some(Self::PlayResult),
            _ => None,
        }
    }

    /// Size of the whole message, command byte included.
    pub fn frame_len(self) -> usize {
        match self {
            Command::GameStart => 1 + HAND_SIZE,
            _ => 2,
        }
    }
}

/// Payload of PLAYRESULT, from the receiving player's point of view.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win = 0,
    Draw = 1,
    Lose = 2,
}

impl Outcome {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Win),
            1 => Some(Self::Draw),
            2 => Some(Self::Lose),
            _ => None,
        }
    }

    /// Outcome for the owner of the left-hand card of a comparison.
    pub fn of(ordering: Ordering) -> Outcome {
        match ordering {
            Ordering::Greater => Outcome::Win,
            Ordering::Equal => Outcome::Draw,
            Ordering::Less => Outcome::Lose,
        }
    }

    pub fn opposite(self) -> Outcome {
        match self {
            Outcome::Win => Outcome::Lose,
            Outcome::Draw => Outcome::Draw,
            Outcome::Lose => Outcome::Win,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    WantGame,
    GameStart(Hand),
    /// Raw card byte; whether it is a legal card is for the referee to decide.
    PlayCard(u8),
    PlayResult(Outcome),
}

impl Frame {
    pub fn command(&self) -> Command {
        match self {
            Frame::WantGame => Command::WantGame,
            Frame::GameStart(_) => Command::GameStart,
            Frame::PlayCard(_) => Command::PlayCard,
            Frame::PlayResult(_) => Command::PlayResult,
        }
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        buf.reserve(self.command().frame_len());
        buf.put_u8(self.command() as u8);

        match self {
            Frame::WantGame => buf.put_u8(0),
            Frame::GameStart(hand) => {
                for card in hand.cards() {
                    buf.put_u8(card.value());
                }
            }
            Frame::PlayCard(card) => buf.put_u8(*card),
            Frame::PlayResult(outcome) => buf.put_u8(*outcome as u8),
        }
    }

    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::new();
        self.encode(&mut buf);
        buf.freeze()
    }

    /// Decodes one complete message of the `expected` kind.
    pub fn decode<B: Buf>(expected: Command, buf: B) -> Result<Frame, WarError> {
        match expected {
            Command::WantGame => decode_want_game(buf).map(|()| Frame::WantGame),
            Command::GameStart => decode_game_start(buf).map(Frame::GameStart),
            Command::PlayCard => decode_play_card(buf).map(Frame::PlayCard),
            Command::PlayResult => decode_play_result(buf).map(Frame::PlayResult),
        }
    }
}

// Checks the length and consumes the command byte
fn expect<B: Buf>(expected: Command, buf: &mut B) -> Result<(), WarError> {
    if buf.remaining() < expected.frame_len() {
        return Err(WarError::Framing {
            expected: expected.frame_len(),
            received: buf.remaining(),
        });
    }

    match buf.get_u8() {
        found if found == expected as u8 => Ok(()),
        found => Err(WarError::UnexpectedCommand { expected, found }),
    }
}

pub fn decode_want_game<B: Buf>(mut buf: B) -> Result<(), WarError> {
    expect(Command::WantGame, &mut buf)?;
    match buf.get_u8() {
        0 => Ok(()),
        payload => Err(WarError::BadPayload {
            command: Command::WantGame,
            payload,
        }),
    }
}

pub fn decode_game_start<B: Buf>(mut buf: B) -> Result<Hand, WarError> {
    expect(Command::GameStart, &mut buf)?;

    let mut cards = Vec::with_capacity(HAND_SIZE);
    for _ in 0..HAND_SIZE {
        let payload = buf.get_u8();
        let card = Card::new(payload).ok_or(WarError::BadPayload {
            command: Command::GameStart,
            payload,
        })?;
        cards.push(card);
    }

    Hand::new(cards).map_err(|dup| WarError::BadPayload {
        command: Command::GameStart,
        payload: dup.value(),
    })
}

/// The raw card byte; whether it is a legal card is for the referee to decide.
pub fn decode_play_card<B: Buf>(mut buf: B) -> Result<u8, WarError> {
    expect(Command::PlayCard, &mut buf)?;
    Ok(buf.get_u8())
}

pub fn decode_play_result<B: Buf>(mut buf: B) -> Result<Outcome, WarError> {
    expect(Command::PlayResult, &mut buf)?;
    let payload = buf.get_u8();
    Outcome::from_u8(payload).ok_or(WarError::BadPayload {
        command: Command::PlayResult,
        payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::game::deal_cards;

    #[test]
    fn layouts() {
        assert_eq!(&Frame::WantGame.to_bytes()[..], &[0x00, 0x00]);
        assert_eq!(&Frame::PlayCard(51).to_bytes()[..], &[0x02, 51]);
        assert_eq!(&Frame::PlayResult(Outcome::Win).to_bytes()[..], &[0x03, 0x00]);
        assert_eq!(&Frame::PlayResult(Outcome::Draw).to_bytes()[..], &[0x03, 0x01]);
        assert_eq!(&Frame::PlayResult(Outcome::Lose).to_bytes()[..], &[0x03, 0x02]);

        let (hand, _) = deal_cards();
        let bytes = Frame::GameStart(hand.clone()).to_bytes();
        assert_eq!(bytes.len(), 27);
        assert_eq!(bytes[0], 0x01);
        let values: Vec<u8> = hand.cards().iter().map(Card::value).collect();
        assert_eq!(&bytes[1..], &values[..]);
    }

    #[test]
    fn game_start_carries_the_hand() {
        let (hand, _) = deal_cards();
        let bytes = Frame::GameStart(hand.clone()).to_bytes();
        assert_eq!(
            Frame::decode(Command::GameStart, bytes).unwrap(),
            Frame::GameStart(hand)
        );
    }

    #[test]
    fn want_game_needs_zero_payload() {
        let err = Frame::decode(Command::WantGame, &[0x00, 0x01][..]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProtocolViolation);
        assert!(matches!(
            err,
            WarError::BadPayload {
                command: Command::WantGame,
                payload: 1
            }
        ));
    }

    #[test]
    fn wrong_command() {
        let err = Frame::decode(Command::PlayCard, &[0x00, 0x00][..]).unwrap_err();
        assert!(matches!(
            err,
            WarError::UnexpectedCommand {
                expected: Command::PlayCard,
                found: 0
            }
        ));
    }

    #[test]
    fn play_card_keeps_raw_byte() {
        assert_eq!(
            Frame::decode(Command::PlayCard, &[0x02, 200][..]).unwrap(),
            Frame::PlayCard(200)
        );
    }

    #[test]
    fn bad_result_byte() {
        let err = Frame::decode(Command::PlayResult, &[0x03, 0x03][..]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProtocolViolation);
    }

    #[test]
    fn game_start_rejects_bad_cards() {
        let mut bytes = vec![0x01];
        bytes.extend(0..26u8);
        bytes[5] = 52;
        let err = Frame::decode(Command::GameStart, &bytes[..]).unwrap_err();
        assert!(matches!(err, WarError::BadPayload { payload: 52, .. }));

        // Card 10 dealt twice.
        bytes[5] = 10;
        let err = decode_game_start(&bytes[..]).unwrap_err();
        assert!(matches!(
            err,
            WarError::BadPayload {
                command: Command::GameStart,
                payload: 10
            }
        ));
    }

    #[test]
    fn typed_decoders() {
        assert!(decode_want_game(&[0x00, 0x00][..]).is_ok());
        assert_eq!(decode_play_card(&[0x02, 33][..]).unwrap(), 33);
        assert_eq!(decode_play_result(&[0x03, 0x02][..]).unwrap(), Outcome::Lose);

        let err = decode_play_result(&[0x02, 0x00][..]).unwrap_err();
        assert!(matches!(
            err,
            WarError::UnexpectedCommand {
                expected: Command::PlayResult,
                found: 2
            }
        ));
    }

    #[test]
    fn short_buffer_is_framing() {
        let err = Frame::decode(Command::GameStart, &[0x01, 0x02][..]).unwrap_err();
        assert!(matches!(
            err,
            WarError::Framing {
                expected: 27,
                received: 2
            }
        ));
    }

    #[test]
    fn outcomes() {
        assert_eq!(Outcome::of(Ordering::Greater), Outcome::Win);
        assert_eq!(Outcome::of(Ordering::Less).opposite(), Outcome::Win);
        assert_eq!(Outcome::Draw.opposite(), Outcome::Draw);
    }
}
