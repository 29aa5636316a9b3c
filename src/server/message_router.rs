use super::{ConnectionId, GameServer};
use crate::protocol::ClientMessage;

impl GameServer {
    /// Handle one inbound client event to completion. Events for the
    /// same room serialize on its lock; events for different rooms run
    /// in parallel.
    pub async fn handle_client_message(&self, conn_id: ConnectionId, message: ClientMessage) {
        match message {
            ClientMessage::CreateRoom { player_info } => {
                self.handle_create_room(conn_id, player_info).await;
            }
            ClientMessage::JoinRoom { code, player_info } => {
                self.handle_join_room(conn_id, code, player_info).await;
            }
            ClientMessage::FindMatch { player_info } => {
                self.handle_find_match(conn_id, player_info).await;
            }
            ClientMessage::MakeMove {
                code,
                from,
                to,
                promotion,
            } => {
                self.handle_make_move(conn_id, code, from, to, promotion)
                    .await;
            }
            ClientMessage::ChatMessage { code, message } => {
                self.handle_chat_message(conn_id, code, message).await;
            }
            ClientMessage::OfferDraw { code } => {
                self.handle_offer_draw(conn_id, code).await;
            }
            ClientMessage::RespondDraw { code, accept } => {
                self.handle_respond_draw(conn_id, code, accept).await;
            }
            ClientMessage::Resign { code } => {
                self.handle_resign(conn_id, code).await;
            }
            ClientMessage::ReconnectPlayer { player_id } => {
                self.handle_reconnect(conn_id, player_id).await;
            }
            ClientMessage::FriendRequest { username } => {
                self.handle_friend_request(conn_id, username).await;
            }
            ClientMessage::FriendAccept { username } => {
                self.handle_friend_accept(conn_id, username).await;
            }
            ClientMessage::FriendDecline { username } => {
                self.handle_friend_decline(conn_id, username).await;
            }
            ClientMessage::FriendRemove { username } => {
                self.handle_friend_remove(conn_id, username).await;
            }
            ClientMessage::FriendList => {
                self.handle_friend_list(conn_id).await;
            }
        }
    }
}
