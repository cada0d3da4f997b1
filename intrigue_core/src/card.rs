use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::{EnumMessage, IntoEnumIterator};
use strum_macros::{Display, EnumIter, EnumMessage, EnumString};

pub const COPIES_PER_ROLE: usize = 3;

#[derive(
    Debug,
    PartialEq,
    Eq,
    Hash,
    Copy,
    Clone,
    Display,
    EnumIter,
    EnumString,
    EnumMessage,
    Serialize,
    Deserialize,
)]
pub enum Card {
    #[strum(
        serialize = "Tax Collector",
        message = "Claim this role to levy 3 ducats from the treasury, or to block another player from smuggling goods."
    )]
    TaxCollector,
    #[strum(
        message = "Claim this role and pay 3 ducats to attack another player, forcing them to reveal a card."
    )]
    Warrior,
    #[strum(
        message = "Claim this role to thieve up to 2 ducats from another player, or to block a thieve aimed at you."
    )]
    Thief,
    #[strum(
        message = "Claim this role to exchange cards with the deck, or to block a thieve aimed at you."
    )]
    Courtier,
    #[strum(message = "Claim this role to block an attack aimed at you.")]
    Defender,
}

impl Card {
    /// The full 15-card pool the game is played with.
    pub fn full_deck() -> Vec<Card> {
        Card::iter()
            .flat_map(|c| std::iter::repeat(c).take(COPIES_PER_ROLE))
            .collect()
    }

    pub fn rules() -> String {
        Card::iter().map(|c| c.rule()).join("\n")
    }

    pub fn rule(&self) -> String {
        format!("{}: {}", self, self.get_message().unwrap_or("No rule"))
    }
}
