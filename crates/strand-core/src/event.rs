//! Resolved chat events.
//!
//! An [`EventRecord`] is what a room data source hands back once an event is
//! present in its local cache. Only [`EventRecord::event_id`] and
//! [`EventRecord::room_id`] carry meaning for thread resolution; the remaining
//! fields are payload for the rendering surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::{EventId, RoomId};

/// A fully-loaded chat event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    /// Identity of the event.
    pub event_id: EventId,
    /// Room the event was sent in.
    pub room_id: RoomId,
    /// Sender user ID.
    pub sender: String,
    /// Server-side origin timestamp.
    pub origin_server_ts: DateTime<Utc>,
    /// Event type, e.g. `m.room.message`.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Raw event content.
    pub content: Value,
}

impl EventRecord {
    /// Build an `m.room.message` text event stamped with the current time.
    pub fn text(
        event_id: impl Into<EventId>,
        room_id: impl Into<RoomId>,
        sender: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            room_id: room_id.into(),
            sender: sender.into(),
            origin_server_ts: Utc::now(),
            event_type: "m.room.message".to_string(),
            content: serde_json::json!({ "msgtype": "m.text", "body": body.into() }),
        }
    }

    /// Plain-text body, if the content carries one.
    pub fn body(&self) -> Option<&str> {
        self.content.get("body").and_then(Value::as_str)
    }
}
