use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use tokio::sync::Mutex;

use super::registry::Seat;
use crate::protocol::PlayerId;

/// A player waiting to be paired. At most one entry per player; a
/// re-enqueue refreshes the info in place, keeping queue position.
#[derive(Debug, Clone)]
pub struct MatchmakingEntry {
    pub seat: Seat,
    pub enqueued_at: DateTime<Utc>,
}

/// Strict-FIFO anonymous matchmaking queue. No rating buckets: the two
/// oldest entries at pairing time form the match.
#[derive(Debug, Default)]
pub struct MatchmakingQueue {
    entries: Mutex<VecDeque<MatchmakingEntry>>,
}

impl MatchmakingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `seat` to the queue, or refresh an existing entry in place.
    pub async fn enqueue(&self, seat: Seat) {
        let mut entries = self.entries.lock().await;
        let entry = MatchmakingEntry {
            seat,
            enqueued_at: Utc::now(),
        };
        if let Some(existing) = entries
            .iter_mut()
            .find(|e| e.seat.player_id == entry.seat.player_id)
        {
            *existing = entry;
        } else {
            entries.push_back(entry);
        }
    }

    /// Remove any entry for `player_id`. Silent on absence.
    pub async fn remove(&self, player_id: PlayerId) {
        let mut entries = self.entries.lock().await;
        entries.retain(|entry| entry.seat.player_id != player_id);
    }

    /// Pair the two oldest entries, or None when fewer than two wait.
    /// The first dequeued player takes white.
    pub async fn find_match(&self) -> Option<(MatchmakingEntry, MatchmakingEntry)> {
        let mut entries = self.entries.lock().await;
        if entries.len() < 2 {
            return None;
        }
        let white = entries.pop_front()?;
        let black = entries.pop_front()?;
        Some((white, black))
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
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
    async fn pairs_the_two_oldest_entries() {
        let queue = MatchmakingQueue::new();
        let (a, b, c) = (seat("a"), seat("b"), seat("c"));
        queue.enqueue(a.clone()).await;
        queue.enqueue(b.clone()).await;
        queue.enqueue(c.clone()).await;

        let (white, black) = queue.find_match().await.unwrap();
        assert_eq!(white.seat.player_id, a.player_id);
        assert_eq!(black.seat.player_id, b.player_id);

        // C alone cannot be paired until D arrives.
        assert!(queue.find_match().await.is_none());
        let d = seat("d");
        queue.enqueue(d.clone()).await;
        let (white, black) = queue.find_match().await.unwrap();
        assert_eq!(white.seat.player_id, c.player_id);
        assert_eq!(black.seat.player_id, d.player_id);
        assert!(queue.is_empty().await);
    }

    #[tokio::test]
    async fn re_enqueue_keeps_queue_position() {
        let queue = MatchmakingQueue::new();
        let (a, b) = (seat("a"), seat("b"));
        queue.enqueue(a.clone()).await;
        queue.enqueue(b.clone()).await;

        // A re-enqueues with a new rating; still first in line.
        let mut refreshed = a.clone();
        refreshed.elo = 1300;
        queue.enqueue(refreshed).await;
        assert_eq!(queue.len().await, 2);

        let (white, _) = queue.find_match().await.unwrap();
        assert_eq!(white.seat.player_id, a.player_id);
        assert_eq!(white.seat.elo, 1300);
    }

    #[tokio::test]
    async fn remove_is_silent_on_absence() {
        let queue = MatchmakingQueue::new();
        let a = seat("a");
        queue.enqueue(a.clone()).await;
        queue.remove(a.player_id).await;
        queue.remove(a.player_id).await;
        assert!(queue.is_empty().await);
    }
}
