//! Support chat
//!
//! Socket-backed messaging between customers and staff. Outbound actions
//! emit named socket events; inbound events mutate a [`ChatRoom`], which
//! keeps its messages strictly in receipt order. The chat list attaches
//! each room's latest message client-side, one sequential fetch per room.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::{
    api::{
        models::{ChatMessage, ChatSummary},
        ApiClient,
    },
    errors::{DashboardError, DashboardResult},
};

/// Outbound event: a user sends a message.
pub const EVENT_SEND_MESSAGE: &str = "send_message";
/// Inbound event: a message arrived in a joined room.
pub const EVENT_RECEIVE_MESSAGE: &str = "receive_message";
/// Outbound event: a user deletes their message.
pub const EVENT_DELETE_MESSAGE: &str = "delete_message";
/// Inbound event: a message was deleted in a joined room.
pub const EVENT_MESSAGE_DELETED: &str = "message_deleted";
/// Outbound event: subscribe to a room.
pub const EVENT_JOIN_CHAT: &str = "join_chat";
/// Both directions: a viewer read a room's messages. The only event name
/// with a hyphen; the others use underscores.
pub const EVENT_SEEN_MESSAGES: &str = "seen-messages";

/// Socket connection seam, backed by a socket.io client in production.
#[async_trait]
pub trait SocketTransport: Send + Sync {
    /// Emits one named event with a JSON payload.
    async fn emit(&self, event: &str, payload: serde_json::Value) -> DashboardResult<()>;
}

/// Typed emitter over a socket connection.
#[derive(Clone)]
pub struct ChatSocket<T: SocketTransport> {
    transport: T,
}

impl<T: SocketTransport> ChatSocket<T> {
    /// Wraps a connected socket.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Subscribes to a room; inbound events only arrive for joined rooms.
    pub async fn join_chat(&self, chat_id: &str) -> DashboardResult<()> {
        debug!(chat_id, "joining chat room");
        self.transport
            .emit(EVENT_JOIN_CHAT, serde_json::json!({ "chatId": chat_id }))
            .await
    }

    /// Sends a message to a room.
    ///
    /// Returns the client-generated message ID, which the echoed
    /// `receive_message` event carries back so an optimistic render can
    /// be reconciled.
    pub async fn send_message(
        &self, chat_id: &str, sender_id: &str, body: &str,
    ) -> DashboardResult<String> {
        let client_id = Uuid::new_v4().to_string();
        self.transport
            .emit(
                EVENT_SEND_MESSAGE,
                serde_json::json!({
                    "chatId": chat_id,
                    "senderId": sender_id,
                    "body": body,
                    "clientId": client_id,
                }),
            )
            .await?;
        Ok(client_id)
    }

    /// Deletes a message from a room.
    pub async fn delete_message(&self, chat_id: &str, message_id: &str) -> DashboardResult<()> {
        self.transport
            .emit(
                EVENT_DELETE_MESSAGE,
                serde_json::json!({ "chatId": chat_id, "messageId": message_id }),
            )
            .await
    }

    /// Reports that the viewer has read a room's messages.
    pub async fn mark_seen(&self, chat_id: &str, viewer_id: &str) -> DashboardResult<()> {
        self.transport
            .emit(
                EVENT_SEEN_MESSAGES,
                serde_json::json!({ "chatId": chat_id, "viewerId": viewer_id }),
            )
            .await
    }
}

/// Inbound socket event, already parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// A message arrived.
    MessageReceived(ChatMessage),
    /// A message was deleted.
    MessageDeleted {
        /// Room the message belonged to.
        chat_id:    String,
        /// Deleted message.
        message_id: String,
    },
    /// A viewer read a room's messages.
    MessagesSeen {
        /// Room that was read.
        chat_id:   String,
        /// Reading user.
        viewer_id: String,
    },
}

impl InboundEvent {
    /// Parses a named socket event into a typed one.
    ///
    /// Unknown event names yield `Ok(None)`; a known name with a
    /// malformed payload is an error.
    pub fn parse(event: &str, payload: &serde_json::Value) -> DashboardResult<Option<Self>> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Deleted {
            chat_id:    String,
            message_id: String,
        }
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Seen {
            chat_id:   String,
            viewer_id: String,
        }

        let decode_err = |e: serde_json::Error| DashboardError::Decode(e.to_string());
        match event {
            EVENT_RECEIVE_MESSAGE => {
                let message: ChatMessage =
                    serde_json::from_value(payload.clone()).map_err(decode_err)?;
                Ok(Some(Self::MessageReceived(message)))
            },
            EVENT_MESSAGE_DELETED => {
                let deleted: Deleted =
                    serde_json::from_value(payload.clone()).map_err(decode_err)?;
                Ok(Some(Self::MessageDeleted {
                    chat_id:    deleted.chat_id,
                    message_id: deleted.message_id,
                }))
            },
            EVENT_SEEN_MESSAGES => {
                let seen: Seen = serde_json::from_value(payload.clone()).map_err(decode_err)?;
                Ok(Some(Self::MessagesSeen {
                    chat_id:   seen.chat_id,
                    viewer_id: seen.viewer_id,
                }))
            },
            _ => Ok(None),
        }
    }
}

/// One joined chat room, messages in receipt order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRoom {
    chat_id:  String,
    messages: Vec<ChatMessage>,
}

impl ChatRoom {
    /// An empty room.
    #[must_use]
    pub fn new(chat_id: impl Into<String>) -> Self {
        Self { chat_id: chat_id.into(), messages: Vec::new() }
    }

    /// A room seeded from fetched history.
    #[must_use]
    pub fn from_history(chat_id: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self { chat_id: chat_id.into(), messages }
    }

    /// Room ID.
    #[must_use]
    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    /// Messages in the order they were received, not re-sorted.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Applies one inbound event. Events for other rooms are ignored.
    pub fn apply(&mut self, event: &InboundEvent) {
        match event {
            InboundEvent::MessageReceived(message) => {
                if message.chat_id == self.chat_id {
                    self.messages.push(message.clone());
                }
            },
            InboundEvent::MessageDeleted { chat_id, message_id } => {
                if *chat_id == self.chat_id {
                    self.messages.retain(|m| m.id != *message_id);
                }
            },
            InboundEvent::MessagesSeen { chat_id, viewer_id } => {
                if *chat_id == self.chat_id {
                    // The viewer read everyone else's messages.
                    for message in &mut self.messages {
                        if message.sender_id != *viewer_id {
                            message.seen = true;
                        }
                    }
                }
            },
        }
    }
}

/// Fetches the chat list and attaches each room's latest message.
///
/// Message fetches run sequentially, one per room; the result is sorted
/// by latest activity, newest first. Rooms with no messages sort last.
pub async fn assemble_chat_list(client: &ApiClient) -> DashboardResult<Vec<ChatSummary>> {
    let mut chats = client.get_chats().await?;
    for chat in &mut chats {
        let messages = client.get_chat_messages(&chat.id).await?;
        chat.latest_message = messages.into_iter().last();
    }
    chats.sort_by_key(|chat| {
        std::cmp::Reverse(chat.latest_message.as_ref().map_or(0, |m| m.created_at))
    });
    Ok(chats)
}
