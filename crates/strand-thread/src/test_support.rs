//! In-memory room data source for resolver and view tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use strand_core::{EventId, EventRecord, FetchError, RoomId};
use tokio::sync::Notify;

use crate::source::{Room, RoomDataSource};

pub(crate) const ROOM: &str = "!thread:hs";

/// Holds page-ins open until released.
#[derive(Default)]
pub(crate) struct Gate {
    entered: Notify,
    release: Notify,
}

impl Gate {
    /// Wait until a page-in is parked on the gate.
    pub(crate) async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Let one parked (or the next) page-in continue.
    pub(crate) fn release(&self) {
        self.release.notify_one();
    }
}

/// What the server knows about an event that is not cached yet.
enum Remote {
    /// Page-in succeeds and loads the event.
    Loads(EventRecord),
    /// Page-in succeeds but the event stays invisible.
    Hidden,
    /// Page-in fails.
    Fails(FetchError),
}

#[derive(Default)]
pub(crate) struct MockRoomSource {
    rooms: HashMap<RoomId, Room>,
    cache: Mutex<HashMap<EventId, EventRecord>>,
    remote: HashMap<EventId, Remote>,
    gate: Option<Arc<Gate>>,
    find_calls: Mutex<Vec<EventId>>,
    page_in_calls: Mutex<Vec<EventId>>,
}

pub(crate) fn ev(id: &str) -> EventRecord {
    EventRecord::text(id, ROOM, "@alice:hs", format!("body of {id}"))
}

pub(crate) fn ids(ids: &[&str]) -> Vec<EventId> {
    ids.iter().map(|id| EventId::from(*id)).collect()
}

impl MockRoomSource {
    pub(crate) fn new() -> Self {
        let mut rooms = HashMap::new();
        let _ = rooms.insert(
            RoomId::from(ROOM),
            Room::new(ROOM, Some("Thread Room".into())),
        );
        Self {
            rooms,
            ..Self::default()
        }
    }

    pub(crate) fn cached(self, ids: &[&str]) -> Self {
        {
            let mut cache = self.cache.lock();
            for id in ids {
                let _ = cache.insert(EventId::from(*id), ev(id));
            }
        }
        self
    }

    pub(crate) fn remote(mut self, ids: &[&str]) -> Self {
        for id in ids {
            let _ = self.remote.insert(EventId::from(*id), Remote::Loads(ev(id)));
        }
        self
    }

    pub(crate) fn hidden(mut self, id: &str) -> Self {
        let _ = self.remote.insert(EventId::from(id), Remote::Hidden);
        self
    }

    pub(crate) fn failing(mut self, id: &str, err: FetchError) -> Self {
        let _ = self.remote.insert(EventId::from(id), Remote::Fails(err));
        self
    }

    pub(crate) fn gated(mut self) -> (Self, Arc<Gate>) {
        let gate = Arc::new(Gate::default());
        self.gate = Some(gate.clone());
        (self, gate)
    }

    pub(crate) fn room(&self) -> Room {
        self.rooms[&RoomId::from(ROOM)].clone()
    }

    pub(crate) fn page_in_count(&self, id: &str) -> usize {
        self.page_in_calls.lock().iter().filter(|e| e.as_str() == id).count()
    }

    pub(crate) fn total_page_ins(&self) -> usize {
        self.page_in_calls.lock().len()
    }

    pub(crate) fn find_count(&self, id: &str) -> usize {
        self.find_calls.lock().iter().filter(|e| e.as_str() == id).count()
    }

    pub(crate) fn cached_len(&self) -> usize {
        self.cache.lock().len()
    }
}

#[async_trait]
impl RoomDataSource for MockRoomSource {
    fn get_room(&self, room_id: &RoomId) -> Option<Room> {
        self.rooms.get(room_id).cloned()
    }

    fn find_event_by_id(&self, _room: &Room, event_id: &EventId) -> Option<EventRecord> {
        self.find_calls.lock().push(event_id.clone());
        self.cache.lock().get(event_id).cloned()
    }

    async fn page_in_timeline_containing(
        &self,
        _room: &Room,
        event_id: &EventId,
    ) -> Result<(), FetchError> {
        self.page_in_calls.lock().push(event_id.clone());

        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        match self.remote.get(event_id) {
            Some(Remote::Loads(record)) => {
                let _ = self
                    .cache
                    .lock()
                    .entry(event_id.clone())
                    .or_insert_with(|| record.clone());
                Ok(())
            }
            Some(Remote::Hidden) => Ok(()),
            Some(Remote::Fails(err)) => Err(err.clone()),
            None => Err(FetchError::NotFound),
        }
    }
}
