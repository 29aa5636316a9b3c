use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::chess::{Board, Color};
use crate::config::ProtocolConfig;
use crate::protocol::{generate_room_code_with_config, PlayerId};

/// One occupied side of a room. The live transport handle is the
/// connection manager's concern, not the seat's.
#[derive(Debug, Clone)]
pub struct Seat {
    pub player_id: PlayerId,
    pub username: String,
    pub elo: i32,
}

/// A game session. Created with only the white seat; playable once black
/// is seated and the board initialized. All mutable state is guarded by
/// the room's own lock in the registry.
#[derive(Debug)]
pub struct Room {
    pub code: String,
    pub white: Seat,
    pub black: Option<Seat>,
    pub board: Option<Board>,
    /// Pending draw offer, by the offering color. Cleared by any move.
    pub draw_offer: Option<Color>,
    /// Set once a terminal outcome has been emitted; later forfeit or
    /// resign events against the room are no-ops.
    pub finished: bool,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl Room {
    fn new(code: String, white: Seat) -> Self {
        let now = Utc::now();
        Self {
            code,
            white,
            black: None,
            board: None,
            draw_offer: None,
            finished: false,
            created_at: now,
            last_activity: now,
        }
    }

    pub fn is_full(&self) -> bool {
        self.black.is_some()
    }

    /// Seat color of `player_id`, if seated here.
    pub fn seat_color(&self, player_id: PlayerId) -> Option<Color> {
        if self.white.player_id == player_id {
            return Some(Color::White);
        }
        if self.black.as_ref().map(|seat| seat.player_id) == Some(player_id) {
            return Some(Color::Black);
        }
        None
    }

    pub fn seat(&self, color: Color) -> Option<&Seat> {
        match color {
            Color::White => Some(&self.white),
            Color::Black => self.black.as_ref(),
        }
    }

    pub fn opponent(&self, color: Color) -> Option<&Seat> {
        self.seat(color.opposite())
    }

    /// Seat black and bring up the starting position.
    pub fn start(&mut self, black: Seat) {
        self.black = Some(black);
        self.board = Some(Board::new());
        self.touch();
    }

    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }
}

/// Registry of active rooms keyed by 6-character codes, plus the
/// player-to-room membership index.
pub struct RoomRegistry {
    rooms: DashMap<String, Arc<Mutex<Room>>>,
    memberships: DashMap<PlayerId, String>,
    protocol_config: ProtocolConfig,
}

impl RoomRegistry {
    pub fn new(protocol_config: ProtocolConfig) -> Self {
        Self {
            rooms: DashMap::new(),
            memberships: DashMap::new(),
            protocol_config,
        }
    }

    /// Create a room seating `white`, generating a code that is unique
    /// among live rooms. Collisions regenerate; the entry API makes the
    /// check-and-insert atomic.
    pub fn create(&self, white: Seat) -> (String, Arc<Mutex<Room>>) {
        loop {
            let code = generate_room_code_with_config(&self.protocol_config);
            match self.rooms.entry(code.clone()) {
                dashmap::mapref::entry::Entry::Occupied(_) => continue,
                dashmap::mapref::entry::Entry::Vacant(entry) => {
                    let player_id = white.player_id;
                    let room = Arc::new(Mutex::new(Room::new(code.clone(), white)));
                    entry.insert(Arc::clone(&room));
                    self.memberships.insert(player_id, code.clone());
                    return (code, room);
                }
            }
        }
    }

    pub fn get(&self, code: &str) -> Option<Arc<Mutex<Room>>> {
        self.rooms.get(code).map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, code: &str) -> bool {
        self.rooms.contains_key(code)
    }

    pub fn remove(&self, code: &str) -> Option<Arc<Mutex<Room>>> {
        self.rooms.remove(code).map(|(_, room)| room)
    }

    pub fn record_membership(&self, player_id: PlayerId, code: String) {
        self.memberships.insert(player_id, code);
    }

    pub fn clear_membership(&self, player_id: PlayerId) {
        self.memberships.remove(&player_id);
    }

    /// Code of the room `player_id` is seated in, if any.
    pub fn room_of_player(&self, player_id: PlayerId) -> Option<String> {
        self.memberships
            .get(&player_id)
            .map(|entry| entry.value().clone())
    }

    pub fn codes(&self) -> Vec<String> {
        self.rooms.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn seat(name: &str) -> Seat {
        Seat {
            player_id: Uuid::new_v4(),
            username: name.to_string(),
            elo: 1200,
        }
    }

    #[tokio::test]
    async fn created_rooms_get_unique_codes() {
        let registry = RoomRegistry::new(ProtocolConfig::default());
        let mut codes = std::collections::HashSet::new();
        for i in 0..200 {
            let (code, _) = registry.create(seat(&format!("player{i}")));
            assert_eq!(code.len(), 6);
            assert!(codes.insert(code), "registry produced a duplicate code");
        }
        assert_eq!(registry.len(), 200);
    }

    #[tokio::test]
    async fn membership_tracks_the_creator() {
        let registry = RoomRegistry::new(ProtocolConfig::default());
        let white = seat("alice");
        let player_id = white.player_id;
        let (code, _) = registry.create(white);
        assert_eq!(registry.room_of_player(player_id), Some(code.clone()));

        registry.clear_membership(player_id);
        assert_eq!(registry.room_of_player(player_id), None);
        assert!(registry.contains(&code));
    }

    #[tokio::test]
    async fn seating_black_initializes_the_board() {
        let registry = RoomRegistry::new(ProtocolConfig::default());
        let (_, room) = registry.create(seat("alice"));
        let mut guard = room.lock().await;
        assert!(!guard.is_full());
        assert!(guard.board.is_none());

        guard.start(seat("bob"));
        assert!(guard.is_full());
        assert!(guard.board.is_some());
    }

    #[tokio::test]
    async fn seat_color_identifies_both_sides() {
        let registry = RoomRegistry::new(ProtocolConfig::default());
        let white = seat("alice");
        let black = seat("bob");
        let (white_id, black_id) = (white.player_id, black.player_id);
        let (_, room) = registry.create(white);
        let mut guard = room.lock().await;
        guard.start(black);

        assert_eq!(guard.seat_color(white_id), Some(Color::White));
        assert_eq!(guard.seat_color(black_id), Some(Color::Black));
        assert_eq!(guard.seat_color(Uuid::new_v4()), None);
    }
}
