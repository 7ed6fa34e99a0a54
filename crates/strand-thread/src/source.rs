//! The room data source consumed by thread resolution.
//!
//! The data source owns the client's room cache and knows how to page a
//! server timeline into it. Thread resolution only ever reads from the cache
//! and asks for additive loads; it never evicts.

use async_trait::async_trait;
use strand_core::{EventId, EventRecord, FetchError, RoomId};

/// Handle to a room known to the data source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Room {
    /// Room identifier.
    pub room_id: RoomId,
    /// Human-readable room name, if one is set.
    pub name: Option<String>,
}

impl Room {
    /// Create a room handle.
    pub fn new(room_id: impl Into<RoomId>, name: Option<String>) -> Self {
        Self {
            room_id: room_id.into(),
            name,
        }
    }

    /// Name to show in a thread subheader; falls back to the room ID.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.room_id.as_str())
    }
}

/// Access to cached room events and remote timeline pagination.
///
/// Implementations are shared across concurrently active thread views and
/// must tolerate concurrent calls.
#[async_trait]
pub trait RoomDataSource: Send + Sync {
    /// Resolve a room reference to a room handle.
    fn get_room(&self, room_id: &RoomId) -> Option<Room>;

    /// Look up an event in the local cache. Never suspends, never fails.
    fn find_event_by_id(&self, room: &Room, event_id: &EventId) -> Option<EventRecord>;

    /// Load the timeline window containing `event_id` into the local cache.
    ///
    /// On `Ok`, a following [`find_event_by_id`](Self::find_event_by_id) for
    /// that ID reflects the loaded window if the event exists and is visible.
    /// On `Err` there is no such guarantee.
    async fn page_in_timeline_containing(
        &self,
        room: &Room,
        event_id: &EventId,
    ) -> Result<(), FetchError>;
}
