use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use intrigue_core::{
    events::Intent,
    game_state::{GameState, MAX_SEATS, MIN_SEATS},
    player::PlayerId,
};
use rand::Rng;

/// Identity handed out by the transport layer when a connection is
/// established; the session layer maps it to a seat.
pub type ClientId = u64;
pub type RoomId = String;

pub struct Room {
    host: ClientId,
    roster: Vec<(ClientId, String)>,
    game: Option<GameState>,
}

impl Room {
    fn seat_of(&self, client: ClientId) -> Option<PlayerId> {
        self.roster.iter().position(|(id, _)| *id == client)
    }
}

/// Owns every room. The map lock is held only for lookup and lifecycle; the
/// per-room lock is held across the whole validate-then-mutate-then-serialize
/// unit, so two near-simultaneous intents for one room cannot both be
/// accepted.
pub struct SessionManager {
    rooms: Mutex<HashMap<RoomId, Arc<Mutex<Room>>>>,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManager {
    pub fn new() -> Self {
        SessionManager {
            rooms: Mutex::new(HashMap::new()),
        }
    }

    pub fn create_room(&self, host: ClientId, name: String) -> RoomId {
        let mut rooms = self.rooms.lock().unwrap();
        let mut id = generate_room_id();
        while rooms.contains_key(&id) {
            id = generate_room_id();
        }
        rooms.insert(
            id.clone(),
            Arc::new(Mutex::new(Room {
                host,
                roster: vec![(host, name)],
                game: None,
            })),
        );
        log::info!("room {} created", id);
        id
    }

    /// Lobby only: joining is refused once the game has started or the
    /// table is full.
    pub fn join_room(&self, id: &str, client: ClientId, name: String) -> bool {
        let room = match self.room(id) {
            Some(room) => room,
            None => return false,
        };
        let mut room = room.lock().unwrap();
        if room.game.is_some() || room.roster.len() >= MAX_SEATS || room.seat_of(client).is_some() {
            return false;
        }
        room.roster.push((client, name));
        true
    }

    pub fn leave_room(&self, id: &str, client: ClientId) {
        let room = match self.room(id) {
            Some(room) => room,
            None => return,
        };
        let empty = {
            let mut room = room.lock().unwrap();
            room.roster.retain(|(c, _)| *c != client);
            room.roster.is_empty()
        };
        if empty {
            self.rooms.lock().unwrap().remove(id);
            log::info!("room {} deleted (empty)", id);
        }
    }

    /// Host only, once, with a full enough lobby. Seats the roster in join
    /// order and returns the initial snapshot for the transport to
    /// broadcast to every seat.
    pub fn start_game(&self, id: &str, client: ClientId) -> Option<String> {
        let room = self.room(id)?;
        let mut room = room.lock().unwrap();
        if room.host != client || room.game.is_some() || room.roster.len() < MIN_SEATS {
            return None;
        }
        let names = room.roster.iter().map(|(_, n)| n.clone()).collect();
        room.game = Some(GameState::new(names));
        log::info!("game started in room {}", id);
        snapshot(room.game.as_ref().expect("the game was just seeded"))
    }

    /// Forwards one intent to the room's game under the room lock and
    /// returns the snapshot to broadcast iff the intent was accepted.
    pub fn dispatch(&self, id: &str, client: ClientId, intent: Intent) -> Option<String> {
        let room = self.room(id)?;
        let mut room = room.lock().unwrap();
        let seat = room.seat_of(client)?;
        let game = room.game.as_mut()?;
        if game.handle_intent(seat, intent) {
            snapshot(game)
        } else {
            None
        }
    }

    /// Read access for local drivers (bots, tests); the transport only ever
    /// sees serialized snapshots.
    pub fn with_game<R>(&self, id: &str, f: impl FnOnce(&GameState) -> R) -> Option<R> {
        let room = self.room(id)?;
        let room = room.lock().unwrap();
        room.game.as_ref().map(f)
    }

    fn room(&self, id: &str) -> Option<Arc<Mutex<Room>>> {
        self.rooms.lock().unwrap().get(id).cloned()
    }
}

fn generate_room_id() -> RoomId {
    const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let mut rng = rand::thread_rng();
    (0..6)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

fn snapshot(state: &GameState) -> Option<String> {
    match serde_json::to_string(state) {
        Ok(s) => Some(s),
        Err(e) => {
            log::error!("snapshot serialization failed: {}", e);
            None
        }
    }
}
