//! User store abstraction. The core treats persistence as an injected
//! interface; the in-memory implementation backs the default deployment
//! and the test suites.

use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// Game outcome from one user's perspective, as persisted to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameOutcome {
    Win,
    Loss,
    Draw,
}

/// Stats record the store supplies for a username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub elo: i32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub games_played: u32,
}

impl UserRecord {
    pub fn new(username: String, elo: i32) -> Self {
        Self {
            username,
            elo,
            wins: 0,
            losses: 0,
            draws: 0,
            games_played: 0,
        }
    }
}

/// Storage seam for user records. Authentication and the persistence
/// format are external concerns; the core calls exactly these two
/// operations, and `update_stats` at most once per seat per game end.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch the record for `username`, creating a fresh one at
    /// `default_elo` when the store has never seen the name.
    async fn get_or_create_user(&self, username: &str, default_elo: i32) -> Result<UserRecord>;

    /// Persist a game result and the post-game rating for `username`.
    async fn update_stats(&self, username: &str, outcome: GameOutcome, new_elo: i32) -> Result<()>;
}

/// In-memory user store keyed by username.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: DashMap<String, UserRecord>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn get_or_create_user(&self, username: &str, default_elo: i32) -> Result<UserRecord> {
        let record = self
            .users
            .entry(username.to_string())
            .or_insert_with(|| UserRecord::new(username.to_string(), default_elo))
            .clone();
        Ok(record)
    }

    async fn update_stats(&self, username: &str, outcome: GameOutcome, new_elo: i32) -> Result<()> {
        let Some(mut record) = self.users.get_mut(username) else {
            anyhow::bail!("unknown user '{username}'");
        };
        record.elo = new_elo;
        record.games_played += 1;
        match outcome {
            GameOutcome::Win => record.wins += 1,
            GameOutcome::Loss => record.losses += 1,
            GameOutcome::Draw => record.draws += 1,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_sight_creates_default_record() {
        let store = InMemoryUserStore::new();
        let record = store.get_or_create_user("alice", 1200).await.unwrap();
        assert_eq!(record.elo, 1200);
        assert_eq!(record.games_played, 0);

        // Second fetch returns the same record, not a reset one.
        store.update_stats("alice", GameOutcome::Win, 1216).await.unwrap();
        let record = store.get_or_create_user("alice", 1200).await.unwrap();
        assert_eq!(record.elo, 1216);
        assert_eq!(record.wins, 1);
        assert_eq!(record.games_played, 1);
    }

    #[tokio::test]
    async fn update_stats_tracks_each_outcome() {
        let store = InMemoryUserStore::new();
        store.get_or_create_user("bob", 1200).await.unwrap();
        store.update_stats("bob", GameOutcome::Loss, 1184).await.unwrap();
        store.update_stats("bob", GameOutcome::Draw, 1184).await.unwrap();

        let record = store.get_or_create_user("bob", 1200).await.unwrap();
        assert_eq!(record.losses, 1);
        assert_eq!(record.draws, 1);
        assert_eq!(record.games_played, 2);
    }

    #[tokio::test]
    async fn update_stats_for_unknown_user_fails() {
        let store = InMemoryUserStore::new();
        assert!(store
            .update_stats("ghost", GameOutcome::Win, 1200)
            .await
            .is_err());
    }
}
