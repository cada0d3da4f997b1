use rand::{seq::SliceRandom, Rng};
use serde::{Serialize, Serializer};

use crate::card::Card;

/// Raised when a draw is attempted on an empty pool. Given the 15-card pool
/// and the supported seat counts this cannot happen in a legal game, so
/// callers treat it as fatal.
#[derive(Debug, PartialEq, Eq)]
pub struct DeckExhausted;

#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// The full pool in a uniformly random order. Only used once, at game
    /// start.
    pub fn shuffled() -> Self {
        let mut cards = Card::full_deck();
        cards.shuffle(&mut rand::thread_rng());
        Deck { cards }
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        Deck { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Removes the top card.
    pub fn draw(&mut self) -> Result<Card, DeckExhausted> {
        self.cards.pop().ok_or(DeckExhausted)
    }

    /// Reinserts a card at a uniformly random position, so its new place
    /// cannot be correlated with future draws.
    pub fn return_card(&mut self, card: Card) {
        let index = rand::thread_rng().gen_range(0..=self.cards.len());
        self.cards.insert(index, card);
    }
}

// Snapshots carry only the remaining count; the order of the pool is hidden
// information.
impl Serialize for Deck {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(self.cards.len() as u64)
    }
}
