use itertools::Itertools;
use rand::rngs::StdRng;
use rand::{seq::SliceRandom, Rng, SeedableRng};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

pub const SUITS: u8 = 4;
pub const RANKS: u8 = 13;
pub const DECK_SIZE: usize = (SUITS * RANKS) as usize;
pub const HAND_SIZE: usize = DECK_SIZE / 2;

/// A card on the wire: `suit * 13 + rank`, always in `0..52`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Card(u8);

impl Card {
    pub fn new(value: u8) -> Option<Card> {
        if (value as usize) < DECK_SIZE {
            Some(Card(value))
        } else {
            None
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Only the rank decides a round.
    pub fn rank(&self) -> u8 {
        self.0 % RANKS
    }

    pub fn suit(&self) -> u8 {
        self.0 / RANKS
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let rank = match self.rank() {
            8 => "10".to_string(),
            r => "23456789TJQKA"
                .chars()
                .nth(r as usize)
                .map(String::from)
                .unwrap_or_default(),
        };

        write!(
            f,
            "{}{}",
            rank,
            match self.suit() {
                0 => "♤",
                1 => "♥",
                2 => "♦",
                _ => "♧",
            }
        )
    }
}

/// Compares two cards by rank. Suits are ignored.
pub fn compare_cards(a: Card, b: Card) -> Ordering {
    a.rank().cmp(&b.rank())
}

pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// An unshuffled deck, every card exactly once.
    pub fn new() -> Deck {
        let cards: Vec<Card> = (0..SUITS)
            .cartesian_product(0..RANKS)
            .map(|(suit, rank)| Card(suit * RANKS + rank))
            .collect();

        Deck { cards }
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        assert!(
            self.cards.len() == DECK_SIZE,
            "Tried to shuffle with {} cards!",
            self.cards.len()
        );

        self.cards.shuffle(rng);
    }

    pub fn deal(&mut self, num: usize) -> Hand {
        let at = self.cards.len().saturating_sub(num);
        Hand {
            cards: self.cards.split_off(at),
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Deck::new()
    }
}

/// Shuffles a fresh deck with a generator seeded from the OS and splits it
/// into two hands.
pub fn deal_cards() -> (Hand, Hand) {
    deal_cards_with(&mut StdRng::from_entropy())
}

pub fn deal_cards_with<R: Rng + ?Sized>(rng: &mut R) -> (Hand, Hand) {
    let mut deck = Deck::new();
    deck.shuffle(rng);

    let first = deck.deal(HAND_SIZE);
    let second = deck.deal(HAND_SIZE);
    (first, second)
}

/// The cards a player still holds, in the order they were dealt.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    /// Fails with the first card that appears twice.
    pub fn new(cards: Vec<Card>) -> Result<Hand, Card> {
        let mut seen = HashSet::with_capacity(cards.len());
        if let Some(dup) = cards.iter().find(|&&card| !seen.insert(card)) {
            return Err(*dup);
        }

        Ok(Hand { cards })
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn contains(&self, value: u8) -> bool {
        self.cards.iter().any(|card| card.value() == value)
    }

    /// Removes the card with this wire value, if the hand holds it.
    pub fn take(&mut self, value: u8) -> Option<Card> {
        let index = self.cards.iter().position(|card| card.value() == value)?;
        Some(self.cards.remove(index))
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.cards.iter().join(","))
    }
}
