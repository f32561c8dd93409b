//! # Matrix Service Adapter
//!
//! Implements the chat trait seams for the Matrix protocol using the
//! `matrix_sdk`. `MatrixService` answers the room a command came from;
//! `MatrixOutlet` is one named outbound connection used by the fanout.

use async_trait::async_trait;
use matrix_sdk::Client;
use matrix_sdk::room::Room;
use matrix_sdk::ruma::OwnedRoomId;
use matrix_sdk::ruma::events::room::message::RoomMessageEventContent;

use crate::domain::traits::{ChatOutlet, ChatProvider};

#[derive(Clone)]
pub struct MatrixService {
    room: Room,
}

impl MatrixService {
    pub fn new(room: Room) -> Self {
        Self { room }
    }
}

#[async_trait]
impl ChatProvider for MatrixService {
    async fn send_message(&self, content: &str) -> Result<String, String> {
        tracing::info!("Bot sending message to {}: {}", self.room_id(), content);
        self.room
            .send(RoomMessageEventContent::text_markdown(content))
            .await
            .map(|resp| resp.event_id.to_string())
            .map_err(|e| e.to_string())
    }

    async fn send_notification(&self, content: &str) -> Result<(), String> {
        // Notifications are also markdown messages for now
        self.send_message(content).await.map(|_| ())
    }

    fn room_id(&self) -> String {
        self.room.room_id().as_str().to_string()
    }
}

/// One logged-in Matrix client, addressable by connection name.
pub struct MatrixOutlet {
    client: Client,
}

impl MatrixOutlet {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ChatOutlet for MatrixOutlet {
    async fn deliver(&self, channel: &str, text: &str) -> Result<(), String> {
        let room_id = OwnedRoomId::try_from(channel).map_err(|e| e.to_string())?;
        let room = self
            .client
            .get_room(&room_id)
            .ok_or_else(|| format!("not joined to {channel}"))?;
        room.send(RoomMessageEventContent::text_markdown(text))
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    fn is_live(&self) -> bool {
        self.client.matrix_auth().logged_in()
    }
}
