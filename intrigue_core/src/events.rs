use serde::{Deserialize, Serialize};

use crate::{action::ActionKind, card::Card, player::PlayerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Response {
    Challenge,
    Pass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockDecision {
    NoBlock,
    Claim(Card),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SmuggleDecision {
    Block,
    Pass,
}

/// One inbound player message. The caller's seat is established by the
/// session layer and passed alongside; it is never trusted from the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    PerformAction {
        action: ActionKind,
        target: Option<PlayerId>,
    },
    ChallengeResponse {
        response: Response,
    },
    DeclareBlock {
        block: BlockDecision,
    },
    BlockResponse {
        response: Response,
    },
    SmuggleResponse {
        response: SmuggleDecision,
    },
    RevealCard {
        card: Card,
    },
    ReturnExchangeCards {
        kept: Vec<Card>,
    },
}
