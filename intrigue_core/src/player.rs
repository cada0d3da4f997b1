use serde::Serialize;

use crate::card::Card;

pub type PlayerId = usize;

pub const STARTING_DUCATS: u32 = 2;

#[derive(Debug, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub ducats: u32,
    hand: Vec<Card>,
    pub revealed: Vec<Card>,
    pub alive: bool,
}

impl Player {
    pub fn new(id: PlayerId, name: String, hand: Vec<Card>) -> Self {
        Player {
            id,
            name,
            ducats: STARTING_DUCATS,
            hand,
            revealed: vec![],
            alive: true,
        }
    }

    pub fn hand(&self) -> &Vec<Card> {
        &self.hand
    }

    pub fn hand_mut(&mut self) -> &mut Vec<Card> {
        &mut self.hand
    }

    pub fn holds(&self, role: Card) -> bool {
        self.hand.contains(&role)
    }
}
