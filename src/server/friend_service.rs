use tracing::debug;

use super::{ConnectionId, GameServer};
use crate::protocol::validation;
use crate::protocol::{ErrorCode, ServerMessage};

impl GameServer {
    fn identified_username(&self, conn_id: ConnectionId) -> Result<String, ErrorCode> {
        let player_id = self
            .connections()
            .player_for_conn(conn_id)
            .ok_or(ErrorCode::PlayerNotIdentified)?;
        self.connections()
            .username_of(player_id)
            .ok_or(ErrorCode::PlayerNotIdentified)
    }

    /// Push the current friend/request lists to a user's live transport.
    fn push_friend_list(&self, username: &str) {
        if let Some(player_id) = self.connections().player_by_username(username) {
            self.send_to_player(
                player_id,
                ServerMessage::FriendList {
                    friends: self.friends().friends_of(username),
                    incoming_requests: self.friends().incoming_requests(username),
                },
            );
        }
    }

    pub async fn handle_friend_request(&self, conn_id: ConnectionId, target: String) {
        let me = match self.identified_username(conn_id) {
            Ok(me) => me,
            Err(err) => return self.send_error_to_conn(conn_id, err),
        };
        if let Err(err) = validation::validate_username(&target, self.protocol_config()) {
            return self.send_error_to_conn(conn_id, err);
        }
        match self.friends().request(&me, &target) {
            Ok(()) => {
                debug!(from = %me, to = %target, "Friend request sent");
                if let Some(target_id) = self.connections().player_by_username(&target) {
                    self.send_to_player(
                        target_id,
                        ServerMessage::FriendRequestReceived { from: me.clone() },
                    );
                }
                self.push_friend_list(&me);
            }
            Err(err) => self.send_to_conn(
                conn_id,
                ServerMessage::Error {
                    message: err.to_string(),
                    error_code: None,
                },
            ),
        }
    }

    pub async fn handle_friend_accept(&self, conn_id: ConnectionId, from: String) {
        let me = match self.identified_username(conn_id) {
            Ok(me) => me,
            Err(err) => return self.send_error_to_conn(conn_id, err),
        };
        match self.friends().accept(&me, &from) {
            Ok(()) => {
                debug!(user = %me, friend = %from, "Friend request accepted");
                self.push_friend_list(&me);
                self.push_friend_list(&from);
            }
            Err(err) => self.send_to_conn(
                conn_id,
                ServerMessage::Error {
                    message: err.to_string(),
                    error_code: None,
                },
            ),
        }
    }

    pub async fn handle_friend_decline(&self, conn_id: ConnectionId, from: String) {
        let me = match self.identified_username(conn_id) {
            Ok(me) => me,
            Err(err) => return self.send_error_to_conn(conn_id, err),
        };
        match self.friends().decline(&me, &from) {
            Ok(()) => self.push_friend_list(&me),
            Err(err) => self.send_to_conn(
                conn_id,
                ServerMessage::Error {
                    message: err.to_string(),
                    error_code: None,
                },
            ),
        }
    }

    pub async fn handle_friend_remove(&self, conn_id: ConnectionId, other: String) {
        let me = match self.identified_username(conn_id) {
            Ok(me) => me,
            Err(err) => return self.send_error_to_conn(conn_id, err),
        };
        match self.friends().remove(&me, &other) {
            Ok(()) => {
                self.push_friend_list(&me);
                self.push_friend_list(&other);
            }
            Err(err) => self.send_to_conn(
                conn_id,
                ServerMessage::Error {
                    message: err.to_string(),
                    error_code: None,
                },
            ),
        }
    }

    pub async fn handle_friend_list(&self, conn_id: ConnectionId) {
        let me = match self.identified_username(conn_id) {
            Ok(me) => me,
            Err(err) => return self.send_error_to_conn(conn_id, err),
        };
        self.send_to_conn(
            conn_id,
            ServerMessage::FriendList {
                friends: self.friends().friends_of(&me),
                incoming_requests: self.friends().incoming_requests(&me),
            },
        );
    }
}
