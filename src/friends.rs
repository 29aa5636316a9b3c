//! Friends relation: username to set-of-usernames with bidirectional
//! consistency, plus pending requests. Thin surface over the same
//! in-memory registry style as the user store.

use dashmap::DashMap;
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FriendsError {
    #[error("users cannot befriend themselves")]
    SelfReference,
    #[error("the users are already friends")]
    AlreadyFriends,
    #[error("a request between these users is already pending")]
    RequestPending,
    #[error("no pending request from that user")]
    NoSuchRequest,
    #[error("the users are not friends")]
    NotFriends,
}

/// Sorted sets keep the wire lists deterministic.
#[derive(Debug, Default)]
pub struct FriendsRegistry {
    friends: DashMap<String, BTreeSet<String>>,
    /// Incoming requests: target username -> requesters.
    pending: DashMap<String, BTreeSet<String>>,
}

impl FriendsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a request from `from` to `to`.
    pub fn request(&self, from: &str, to: &str) -> Result<(), FriendsError> {
        if from == to {
            return Err(FriendsError::SelfReference);
        }
        if self.are_friends(from, to) {
            return Err(FriendsError::AlreadyFriends);
        }
        if self.has_pending(from, to) || self.has_pending(to, from) {
            return Err(FriendsError::RequestPending);
        }
        self.pending
            .entry(to.to_string())
            .or_default()
            .insert(from.to_string());
        Ok(())
    }

    /// `to` accepts the pending request from `from`; both sets gain the
    /// other name.
    pub fn accept(&self, to: &str, from: &str) -> Result<(), FriendsError> {
        self.take_pending(to, from)?;
        self.friends
            .entry(to.to_string())
            .or_default()
            .insert(from.to_string());
        self.friends
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string());
        Ok(())
    }

    /// `to` declines the pending request from `from`.
    pub fn decline(&self, to: &str, from: &str) -> Result<(), FriendsError> {
        self.take_pending(to, from)
    }

    /// Mutual removal.
    pub fn remove(&self, a: &str, b: &str) -> Result<(), FriendsError> {
        if !self.are_friends(a, b) {
            return Err(FriendsError::NotFriends);
        }
        if let Some(mut set) = self.friends.get_mut(a) {
            set.remove(b);
        }
        if let Some(mut set) = self.friends.get_mut(b) {
            set.remove(a);
        }
        Ok(())
    }

    pub fn friends_of(&self, username: &str) -> Vec<String> {
        self.friends
            .get(username)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn incoming_requests(&self, username: &str) -> Vec<String> {
        self.pending
            .get(username)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn are_friends(&self, a: &str, b: &str) -> bool {
        self.friends
            .get(a)
            .is_some_and(|set| set.contains(b))
    }

    fn has_pending(&self, from: &str, to: &str) -> bool {
        self.pending
            .get(to)
            .is_some_and(|set| set.contains(from))
    }

    fn take_pending(&self, to: &str, from: &str) -> Result<(), FriendsError> {
        let Some(mut set) = self.pending.get_mut(to) else {
            return Err(FriendsError::NoSuchRequest);
        };
        if !set.remove(from) {
            return Err(FriendsError::NoSuchRequest);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accept_makes_the_relation_mutual() {
        let registry = FriendsRegistry::new();
        registry.request("alice", "bob").unwrap();
        registry.accept("bob", "alice").unwrap();

        assert!(registry.are_friends("alice", "bob"));
        assert!(registry.are_friends("bob", "alice"));
        assert!(registry.incoming_requests("bob").is_empty());
    }

    #[test]
    fn decline_leaves_no_relation() {
        let registry = FriendsRegistry::new();
        registry.request("alice", "bob").unwrap();
        registry.decline("bob", "alice").unwrap();

        assert!(!registry.are_friends("alice", "bob"));
        assert_eq!(
            registry.decline("bob", "alice"),
            Err(FriendsError::NoSuchRequest)
        );
    }

    #[test]
    fn removal_is_mutual() {
        let registry = FriendsRegistry::new();
        registry.request("alice", "bob").unwrap();
        registry.accept("bob", "alice").unwrap();
        registry.remove("alice", "bob").unwrap();

        assert!(!registry.are_friends("alice", "bob"));
        assert!(!registry.are_friends("bob", "alice"));
    }

    #[test]
    fn duplicate_and_self_requests_are_rejected() {
        let registry = FriendsRegistry::new();
        assert_eq!(
            registry.request("alice", "alice"),
            Err(FriendsError::SelfReference)
        );
        registry.request("alice", "bob").unwrap();
        assert_eq!(
            registry.request("alice", "bob"),
            Err(FriendsError::RequestPending)
        );
        // A counter-request while one is pending is also rejected.
        assert_eq!(
            registry.request("bob", "alice"),
            Err(FriendsError::RequestPending)
        );
    }
}
