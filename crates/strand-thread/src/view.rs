//! Thread view state machine.
//!
//! A [`ThreadView`] is created when a thread panel mounts. It resolves
//! `[root] ++ responses` once, in the background, and publishes its status
//! through a `watch` channel:
//!
//! ```text
//! Loading ──► Ready(events)
//!    │
//!    └──────► Errored(prefix)
//! ```
//!
//! Both outcomes are terminal. Tearing the view down (explicitly or by
//! dropping it) freezes the published status; a resolution that completes
//! afterwards is discarded.

use std::sync::Arc;

use strand_core::{EventId, EventRecord, Result, RoomId, ThreadError};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::resolver::{EventResolver, ResolutionRequest, ResolutionResult, ResolutionStatus};
use crate::source::{Room, RoomDataSource};

/// Shown under the resolved prefix when a thread has a gap, whether the
/// missing event does not exist or is not visible to the user.
pub const UNRESOLVABLE_EVENT_MESSAGE: &str = "Unable to load event that was replied to, \
     it either does not exist or you do not have permission to view it.";

/// Externally observable status of a thread view.
#[derive(Clone, Debug, PartialEq)]
pub enum ThreadStatus {
    /// Resolution has not finished.
    Loading,
    /// Every event in the thread resolved, in thread order.
    Ready(Vec<EventRecord>),
    /// Resolution hit a gap; holds the events before it.
    Errored(Vec<EventRecord>),
}

impl ThreadStatus {
    /// Whether no further transition can happen.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Loading)
    }

    /// Events to render, in thread order.
    pub fn events(&self) -> &[EventRecord] {
        match self {
            Self::Loading => &[],
            Self::Ready(events) | Self::Errored(events) => events,
        }
    }

    /// Map a finished resolution to a terminal status. Cancelled
    /// resolutions map to `None`.
    pub fn from_resolution(result: ResolutionResult) -> Option<Self> {
        match result.status {
            ResolutionStatus::Complete => Some(Self::Ready(result.events)),
            ResolutionStatus::FailedAt(_) => Some(Self::Errored(result.events)),
            ResolutionStatus::InProgress => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Ready(_) => "ready",
            Self::Errored(_) => "errored",
        }
    }
}

/// A mounted thread panel.
pub struct ThreadView {
    room: Room,
    request: ResolutionRequest,
    status: Arc<watch::Sender<ThreadStatus>>,
    liveness: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl ThreadView {
    /// Activate a thread view and start resolving in the background.
    ///
    /// Empty event IDs, unknown rooms and a missing Tokio runtime are caller
    /// defects and are rejected before anything is spawned.
    pub fn activate(
        source: Arc<dyn RoomDataSource>,
        thread_room: &RoomId,
        root: EventId,
        responses: Vec<EventId>,
    ) -> Result<Self> {
        if root.is_empty() {
            return Err(ThreadError::InvalidInput("root event id is empty".into()));
        }
        if let Some(index) = responses.iter().position(EventId::is_empty) {
            return Err(ThreadError::InvalidInput(format!(
                "response event id at index {index} is empty"
            )));
        }
        let room = source
            .get_room(thread_room)
            .ok_or_else(|| ThreadError::RoomNotFound(thread_room.clone()))?;
        let runtime = Handle::try_current().map_err(|_| ThreadError::NoRuntime)?;

        let request = ResolutionRequest::for_thread(root, responses);
        let (status_tx, _) = watch::channel(ThreadStatus::Loading);
        let status = Arc::new(status_tx);
        let liveness = CancellationToken::new();

        info!(
            room_id = %room.room_id,
            positions = request.len(),
            "thread view activated"
        );

        let task = runtime.spawn(run_resolution(
            EventResolver::new(source),
            room.clone(),
            request.clone(),
            status.clone(),
            liveness.clone(),
        ));

        Ok(Self {
            room,
            request,
            status,
            liveness,
            task: Some(task),
        })
    }

    /// Current status snapshot.
    pub fn status(&self) -> ThreadStatus {
        self.status.borrow().clone()
    }

    /// Receiver that is notified on every status transition.
    pub fn subscribe(&self) -> watch::Receiver<ThreadStatus> {
        self.status.subscribe()
    }

    /// Room the thread lives in.
    pub fn room(&self) -> &Room {
        &self.room
    }

    /// Room name for the thread subheader.
    pub fn room_name(&self) -> &str {
        self.room.display_name()
    }

    /// The IDs this activation resolves, root first.
    pub fn request(&self) -> &ResolutionRequest {
        &self.request
    }

    /// Message to show alongside an errored thread.
    pub fn error_message(&self) -> Option<&'static str> {
        matches!(*self.status.borrow(), ThreadStatus::Errored(_))
            .then_some(UNRESOLVABLE_EVENT_MESSAGE)
    }

    /// Whether [`teardown`](Self::teardown) has run.
    pub fn is_torn_down(&self) -> bool {
        self.liveness.is_cancelled()
    }

    /// Unmount the view. The published status stays as it is now; an
    /// in-flight resolution finishes its current page-in and is discarded.
    pub fn teardown(&self) {
        // Flip liveness under the channel's write lock so no publish can
        // straddle it.
        let _ = self.status.send_if_modified(|_| {
            self.liveness.cancel();
            false
        });
        debug!(room_id = %self.room.room_id, "thread view torn down");
    }

    /// Wait for the background resolution to finish.
    pub async fn settled(&mut self) {
        if let Some(task) = self.task.take() {
            if let Err(error) = task.await {
                warn!(room_id = %self.room.room_id, %error, "thread resolution task failed");
            }
        }
    }
}

impl Drop for ThreadView {
    fn drop(&mut self) {
        if !self.liveness.is_cancelled() {
            self.teardown();
        }
    }
}

async fn run_resolution(
    resolver: EventResolver,
    room: Room,
    request: ResolutionRequest,
    status: Arc<watch::Sender<ThreadStatus>>,
    liveness: CancellationToken,
) {
    let result = resolver.resolve(&room, &request, &liveness).await;
    let failed_at = result.failed_at();

    let Some(next) = ThreadStatus::from_resolution(result) else {
        debug!(room_id = %room.room_id, "resolution abandoned after teardown");
        return;
    };

    let label = next.label();
    let resolved = next.events().len();
    if publish(&status, &liveness, next) {
        info!(
            room_id = %room.room_id,
            status = label,
            resolved,
            failed_at,
            "thread status changed"
        );
    } else {
        debug!(room_id = %room.room_id, status = label, "status update suppressed");
    }
}

/// Write `next` unless the view is torn down or already terminal.
fn publish(
    status: &watch::Sender<ThreadStatus>,
    liveness: &CancellationToken,
    next: ThreadStatus,
) -> bool {
    status.send_if_modified(|current| {
        if liveness.is_cancelled() || current.is_terminal() {
            return false;
        }
        *current = next;
        true
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
