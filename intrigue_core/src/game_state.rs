use std::collections::HashSet;

use itertools::Itertools;
use rand::Rng;
use serde::Serialize;

use crate::{
    action::ActionKind,
    action_log::ActionLog,
    card::Card,
    deck::Deck,
    player::{Player, PlayerId},
};

pub const MIN_SEATS: usize = 2;
pub const MAX_SEATS: usize = 6;

const CARDS_PER_SEAT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Action,
    Challenge,
    DeclareBlock,
    BlockDeclarationPeriod,
    BlockChallenge,
    RevealCard,
    ExchangeCards,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PendingAction {
    pub kind: ActionKind,
    pub actor: PlayerId,
    pub target: Option<PlayerId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PendingBlock {
    pub blocker: PlayerId,
    pub claimed_role: Card,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RevealReason {
    FailedChallenge,
    CaughtBluffing,
    FailedBlockChallenge,
    CaughtBluffingBlock,
    Attacked,
    Overthrown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PendingReveal {
    pub player: PlayerId,
    pub reason: RevealReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExchangeInfo {
    pub player: PlayerId,
    /// Hand size to get back to once the leftover cards are returned.
    pub keep: usize,
}

/// The authoritative state of one game. Mutated only through
/// `handle_intent`, one intent at a time; the serialized form is the
/// broadcast snapshot (per-recipient hand hiding is the transport's job,
/// the deck serializes as a bare count).
#[derive(Debug, Serialize)]
pub struct GameState {
    pub players: Vec<Player>,
    pub(crate) deck: Deck,
    pub turn: PlayerId,
    pub phase: Phase,
    pub pending_action: Option<PendingAction>,
    pub pending_block: Option<PendingBlock>,
    pub pending_reveal: Option<PendingReveal>,
    pub exchange: Option<ExchangeInfo>,
    pub(crate) passed: HashSet<PlayerId>,
    pub log: ActionLog,
}

impl GameState {
    pub fn new(names: Vec<String>) -> Self {
        assert!(
            (MIN_SEATS..=MAX_SEATS).contains(&names.len()),
            "a game needs {} to {} seats, got {}",
            MIN_SEATS,
            MAX_SEATS,
            names.len()
        );
        let mut deck = Deck::shuffled();
        let mut players = vec![];
        for (id, name) in names.into_iter().enumerate() {
            let hand = (0..CARDS_PER_SEAT)
                .map(|_| deck.draw().expect("the full pool covers every seat"))
                .collect();
            players.push(Player::new(id, name, hand));
        }
        let turn = rand::thread_rng().gen_range(0..players.len());
        let mut log = ActionLog::default();
        log.record(format!(
            "Game started. It is {}'s turn.",
            players[turn].name
        ));
        GameState {
            players,
            deck,
            turn,
            phase: Phase::Action,
            pending_action: None,
            pending_block: None,
            pending_reveal: None,
            exchange: None,
            passed: HashSet::new(),
            log,
        }
    }

    pub fn active_player(&self) -> &Player {
        &self.players[self.turn]
    }

    pub fn is_seat(&self, id: PlayerId) -> bool {
        id < self.players.len()
    }

    pub fn living_players(&self) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|p| p.alive)
            .map(|p| p.id)
            .collect_vec()
    }

    pub fn living_count(&self) -> usize {
        self.players.iter().filter(|p| p.alive).count()
    }

    pub fn has_passed(&self, id: PlayerId) -> bool {
        self.passed.contains(&id)
    }

    pub(crate) fn note_pass(&mut self, id: PlayerId) {
        self.passed.insert(id);
    }

    pub(crate) fn reset_passed(&mut self) {
        self.passed.clear();
    }

    /// True once every living seat except `exempt` has passed the current
    /// sub-round.
    pub(crate) fn sub_round_complete(&self, exempt: PlayerId) -> bool {
        self.players
            .iter()
            .filter(|p| p.alive && p.id != exempt)
            .all(|p| self.passed.contains(&p.id))
    }

    pub(crate) fn total_cards(&self) -> usize {
        self.deck.len()
            + self
                .players
                .iter()
                .map(|p| p.hand().len() + p.revealed.len())
                .sum::<usize>()
    }
}
