use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumMessage, EnumString};

use crate::card::Card;

#[derive(
    Debug,
    PartialEq,
    Eq,
    Copy,
    Clone,
    Display,
    EnumIter,
    EnumString,
    EnumMessage,
    Serialize,
    Deserialize,
)]
pub enum ActionKind {
    #[strum(
        serialize = "Harvest Crop",
        message = "Take 1 ducat from the treasury. Cannot be challenged or blocked."
    )]
    Harvest,
    #[strum(
        message = "Pay 7 ducats to force another player to reveal a card. Cannot be challenged or blocked."
    )]
    Overthrow,
    #[strum(message = "Claim the Tax Collector and take 3 ducats from the treasury.")]
    Levy,
    #[strum(
        message = "Claim the Warrior and pay 3 ducats to force another player to reveal a card. Blocked by the Defender."
    )]
    Attack,
    #[strum(
        message = "Claim the Thief and take up to 2 ducats from another player. Blocked by the Thief or the Courtier."
    )]
    Thieve,
    #[strum(
        message = "Claim the Courtier, draw 2 cards and return 2 of your choice to the deck."
    )]
    Exchange,
    #[strum(
        serialize = "Smuggle Goods",
        message = "Take 2 ducats from the treasury without claiming a role. Blocked by the Tax Collector."
    )]
    Smuggle,
}

impl ActionKind {
    pub fn cost(self) -> u32 {
        match self {
            ActionKind::Overthrow => 7,
            ActionKind::Attack => 3,
            _ => 0,
        }
    }

    /// The role the actor asserts to hold, for kinds that carry a claim.
    pub fn claimed_role(self) -> Option<Card> {
        match self {
            ActionKind::Levy => Some(Card::TaxCollector),
            ActionKind::Attack => Some(Card::Warrior),
            ActionKind::Thieve => Some(Card::Thief),
            ActionKind::Exchange => Some(Card::Courtier),
            _ => None,
        }
    }

    /// The roles that may legally be claimed to counter this action.
    pub fn blocked_by(self) -> &'static [Card] {
        match self {
            ActionKind::Attack => &[Card::Defender],
            ActionKind::Thieve => &[Card::Thief, Card::Courtier],
            ActionKind::Smuggle => &[Card::TaxCollector],
            _ => &[],
        }
    }

    pub fn is_blockable(self) -> bool {
        !self.blocked_by().is_empty()
    }

    pub fn needs_target(self) -> bool {
        matches!(
            self,
            ActionKind::Overthrow | ActionKind::Attack | ActionKind::Thieve
        )
    }
}
