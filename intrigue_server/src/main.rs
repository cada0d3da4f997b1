mod random_playing_computer;
mod session;

use intrigue_core::game_state::Phase;

use crate::random_playing_computer::RandomPlayingComputer;
use crate::session::{ClientId, SessionManager};

/// Local demo: a room of four bots playing one game to completion. The real
/// transport hands the same SessionManager calls client ids and intents and
/// broadcasts the returned snapshots.
fn main() {
    env_logger::init();
    let manager = SessionManager::new();

    let host: ClientId = 1;
    let room = manager.create_room(host, "Alice".to_string());
    for (client, name) in [(2, "Bob"), (3, "Carol"), (4, "Dave")] {
        manager.join_room(&room, client, name.to_string());
    }
    let snapshot = manager
        .start_game(&room, host)
        .expect("the room was just assembled");
    log::info!("game started, first snapshot is {} bytes", snapshot.len());

    let bots: Vec<(ClientId, RandomPlayingComputer)> = (0..4)
        .map(|seat| (seat as ClientId + 1, RandomPlayingComputer::new(seat)))
        .collect();

    let mut broadcasts = 1u32;
    for round in 0.. {
        assert!(round < 10_000, "bots failed to finish a game");
        let over = manager
            .with_game(&room, |state| state.phase == Phase::GameOver)
            .expect("the room is still alive");
        if over {
            break;
        }
        for (client, bot) in &bots {
            let intent = manager
                .with_game(&room, |state| bot.obtain_intent(state))
                .expect("the room is still alive");
            if let Some(intent) = intent {
                if manager.dispatch(&room, *client, intent).is_some() {
                    broadcasts += 1;
                }
            }
        }
    }
    log::info!("game finished after {} broadcast snapshots", broadcasts);

    manager
        .with_game(&room, |state| {
            let lines: Vec<&str> = state.log.entries().collect();
            for line in lines.iter().rev() {
                println!("{}", line);
            }
        })
        .expect("the room is still alive");

    for (client, _) in &bots {
        manager.leave_room(&room, *client);
    }
}
