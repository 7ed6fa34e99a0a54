//! Ordered, gap-aware resolution of a reply chain.
//!
//! [`EventResolver::resolve`] walks a [`ResolutionRequest`] strictly in order.
//! Each position is looked up in the local cache first; on a miss the data
//! source pages in the timeline around the event and the cache is queried
//! again. The first position that cannot be resolved ends the walk, so the
//! result is always a contiguous prefix of the request.
//!
//! Only one page-in is in flight per request. Cancellation is cooperative:
//! the token is checked before each position and again once a page-in
//! returns, never while it is pending.

use std::sync::Arc;

use strand_core::{EventId, EventRecord};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use crate::source::{Room, RoomDataSource};

/// Ordered event IDs to resolve. The first is the thread root, the rest are
/// responses in reply order. Duplicates are kept and resolved independently.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolutionRequest {
    ids: Vec<EventId>,
}

impl ResolutionRequest {
    /// Request the given IDs in the given order.
    pub fn new(ids: Vec<EventId>) -> Self {
        Self { ids }
    }

    /// `[root] ++ responses`, order preserved exactly.
    pub fn for_thread(root: EventId, responses: impl IntoIterator<Item = EventId>) -> Self {
        let ids = std::iter::once(root).chain(responses).collect();
        Self { ids }
    }

    /// Requested IDs in position order.
    pub fn ids(&self) -> &[EventId] {
        &self.ids
    }

    /// Number of positions.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether there is nothing to resolve.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// How a resolution ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolutionStatus {
    /// Every position resolved.
    Complete,
    /// The position at this index could not be resolved; nothing after it
    /// was attempted.
    FailedAt(usize),
    /// Resolution was cancelled before reaching either outcome.
    InProgress,
}

/// Records resolved so far plus how resolution ended.
///
/// `events[i]` always corresponds to position `i` of the request.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolutionResult {
    /// Resolved prefix of the request.
    pub events: Vec<EventRecord>,
    /// Terminal status (or `InProgress` when cancelled).
    pub status: ResolutionStatus,
}

impl ResolutionResult {
    /// Whether every requested position resolved.
    pub fn is_complete(&self) -> bool {
        self.status == ResolutionStatus::Complete
    }

    /// Index of the first unresolvable position, if resolution hit a gap.
    pub fn failed_at(&self) -> Option<usize> {
        match self.status {
            ResolutionStatus::FailedAt(index) => Some(index),
            _ => None,
        }
    }
}

/// Outcome of looking up a single position.
enum Step {
    Resolved(EventRecord),
    Gap,
    Cancelled,
}

/// Resolves reply chains against a shared [`RoomDataSource`].
///
/// Cheap to clone; concurrent resolvers may share one data source.
#[derive(Clone)]
pub struct EventResolver {
    source: Arc<dyn RoomDataSource>,
}

impl EventResolver {
    /// Create a resolver over `source`.
    pub fn new(source: Arc<dyn RoomDataSource>) -> Self {
        Self { source }
    }

    /// Resolve `request` in `room`, halting at the first gap.
    ///
    /// Missing, forbidden and unreachable events are reported through
    /// [`ResolutionStatus::FailedAt`], never as an error. If `cancel` fires,
    /// the prefix resolved so far is returned with
    /// [`ResolutionStatus::InProgress`].
    #[instrument(skip_all, fields(room_id = %room.room_id, positions = request.len()))]
    pub async fn resolve(
        &self,
        room: &Room,
        request: &ResolutionRequest,
        cancel: &CancellationToken,
    ) -> ResolutionResult {
        let mut events = Vec::with_capacity(request.len());

        for (position, event_id) in request.ids().iter().enumerate() {
            if cancel.is_cancelled() {
                debug!(position, "resolution cancelled before lookup");
                return in_progress(events);
            }

            match self.lookup(room, event_id, position, cancel).await {
                Step::Resolved(record) => events.push(record),
                Step::Gap => {
                    return ResolutionResult {
                        events,
                        status: ResolutionStatus::FailedAt(position),
                    };
                }
                Step::Cancelled => return in_progress(events),
            }
        }

        debug!(resolved = events.len(), "resolution complete");
        ResolutionResult {
            events,
            status: ResolutionStatus::Complete,
        }
    }

    async fn lookup(
        &self,
        room: &Room,
        event_id: &EventId,
        position: usize,
        cancel: &CancellationToken,
    ) -> Step {
        if let Some(record) = self.source.find_event_by_id(room, event_id) {
            debug!(%event_id, position, "cache hit");
            return Step::Resolved(record);
        }

        debug!(%event_id, position, "cache miss, paging in timeline");
        let paged = self
            .source
            .page_in_timeline_containing(room, event_id)
            .await;

        if cancel.is_cancelled() {
            debug!(%event_id, position, "resolution cancelled during page-in");
            return Step::Cancelled;
        }

        if let Err(error) = paged {
            warn!(%event_id, position, %error, "timeline page-in failed");
            return Step::Gap;
        }

        // A successful page-in says nothing about visibility; ask the cache.
        match self.source.find_event_by_id(room, event_id) {
            Some(record) => Step::Resolved(record),
            None => {
                warn!(%event_id, position, "event still missing after page-in");
                Step::Gap
            }
        }
    }
}

fn in_progress(events: Vec<EventRecord>) -> ResolutionResult {
    ResolutionResult {
        events,
        status: ResolutionStatus::InProgress,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockRoomSource, ids};
    use assert_matches::assert_matches;
    use strand_core::FetchError;
    use strand_core::logging::capture_logs;
    use tracing::Level;

    async fn run(source: &Arc<MockRoomSource>, request: &[&str]) -> ResolutionResult {
        let resolver = EventResolver::new(source.clone());
        let request = ResolutionRequest::new(ids(request));
        resolver
            .resolve(&source.room(), &request, &CancellationToken::new())
            .await
    }

    fn event_ids(result: &ResolutionResult) -> Vec<&str> {
        result.events.iter().map(|e| e.event_id.as_str()).collect()
    }

    // -- request construction --

    #[test]
    fn for_thread_puts_root_first_and_keeps_duplicates() {
        let req = ResolutionRequest::for_thread(EventId::from("$root"), ids(&["$a", "$b", "$a"]));
        let got: Vec<&str> = req.ids().iter().map(EventId::as_str).collect();
        assert_eq!(got, vec!["$root", "$a", "$b", "$a"]);
        assert_eq!(req.len(), 4);
        assert!(!req.is_empty());
    }

    // -- resolution --

    #[tokio::test]
    async fn empty_request_is_trivially_complete() {
        let source = Arc::new(MockRoomSource::new());
        let result = run(&source, &[]).await;
        assert!(result.is_complete());
        assert!(result.events.is_empty());
        assert_eq!(source.total_page_ins(), 0);
    }

    #[tokio::test]
    async fn cached_ids_never_page_in() {
        let source = Arc::new(MockRoomSource::new().cached(&["$root", "$r1", "$r2"]));
        let result = run(&source, &["$root", "$r1", "$r2"]).await;
        assert!(result.is_complete());
        assert_eq!(event_ids(&result), vec!["$root", "$r1", "$r2"]);
        assert_eq!(source.total_page_ins(), 0);
    }

    #[tokio::test]
    async fn cache_miss_pages_in_then_rechecks_cache() {
        let source = Arc::new(MockRoomSource::new().cached(&["$root"]).remote(&["$r1"]));
        let result = run(&source, &["$root", "$r1"]).await;
        assert!(result.is_complete());
        assert_eq!(event_ids(&result), vec!["$root", "$r1"]);
        assert_eq!(source.page_in_count("$r1"), 1);
        assert_eq!(source.find_count("$r1"), 2);
        assert_eq!(source.page_in_count("$root"), 0);
    }

    #[tokio::test]
    async fn page_in_failure_halts_at_that_position() {
        let source = Arc::new(
            MockRoomSource::new()
                .cached(&["$root", "$r2"])
                .failing("$r1", FetchError::Forbidden("not joined".into())),
        );
        let result = run(&source, &["$root", "$r1", "$r2"]).await;
        assert_eq!(result.status, ResolutionStatus::FailedAt(1));
        assert_eq!(result.failed_at(), Some(1));
        assert_eq!(event_ids(&result), vec!["$root"]);
        assert_eq!(source.find_count("$r2"), 0);
        assert_eq!(source.page_in_count("$r2"), 0);
    }

    #[tokio::test]
    async fn successful_page_in_without_event_is_a_gap() {
        let source = Arc::new(MockRoomSource::new().cached(&["$root"]).hidden("$r1"));
        let result = run(&source, &["$root", "$r1", "$r2"]).await;
        assert_eq!(result.status, ResolutionStatus::FailedAt(1));
        assert_eq!(event_ids(&result), vec!["$root"]);
        assert_eq!(source.page_in_count("$r1"), 1);
        assert_eq!(source.find_count("$r2"), 0);
    }

    #[tokio::test]
    async fn root_gap_yields_empty_prefix() {
        let source = Arc::new(MockRoomSource::new().cached(&["$r1"]));
        let result = run(&source, &["$root", "$r1"]).await;
        assert_eq!(result.status, ResolutionStatus::FailedAt(0));
        assert!(result.events.is_empty());
        assert_eq!(source.find_count("$r1"), 0);
    }

    #[tokio::test]
    async fn duplicate_id_is_served_from_warmed_cache() {
        let source = Arc::new(MockRoomSource::new().cached(&["$root"]).remote(&["$r1"]));
        let result = run(&source, &["$root", "$r1", "$r1"]).await;
        assert!(result.is_complete());
        assert_eq!(event_ids(&result), vec!["$root", "$r1", "$r1"]);
        assert_eq!(source.page_in_count("$r1"), 1);
        assert_eq!(source.cached_len(), 2);
    }

    #[tokio::test]
    async fn duplicate_hidden_id_is_paged_in_once_then_halts() {
        let source = Arc::new(MockRoomSource::new().hidden("$r1"));
        let result = run(&source, &["$r1", "$r1"]).await;
        assert_eq!(result.status, ResolutionStatus::FailedAt(0));
        assert_eq!(source.page_in_count("$r1"), 1);
    }

    #[tokio::test]
    async fn cancelled_token_stops_before_first_lookup() {
        let source = Arc::new(MockRoomSource::new().cached(&["$root"]));
        let resolver = EventResolver::new(source.clone());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let request = ResolutionRequest::new(ids(&["$root"]));
        let result = resolver.resolve(&source.room(), &request, &cancel).await;
        assert_eq!(result.status, ResolutionStatus::InProgress);
        assert!(result.events.is_empty());
        assert_eq!(source.find_count("$root"), 0);
    }

    #[tokio::test]
    async fn cancellation_during_page_in_is_observed_on_resume() {
        let (source, gate) = MockRoomSource::new()
            .cached(&["$root"])
            .remote(&["$r1", "$r2"])
            .gated();
        let source = Arc::new(source);
        let resolver = EventResolver::new(source.clone());
        let cancel = CancellationToken::new();
        let room = source.room();
        let request = ResolutionRequest::new(ids(&["$root", "$r1", "$r2"]));

        let task = {
            let cancel = cancel.clone();
            tokio::spawn(async move { resolver.resolve(&room, &request, &cancel).await })
        };

        gate.entered().await;
        cancel.cancel();
        gate.release();

        let result = task.await.unwrap();
        assert_eq!(result.status, ResolutionStatus::InProgress);
        assert_eq!(event_ids(&result), vec!["$root"]);
        // The pending page-in ran to completion; nothing after it started.
        assert_eq!(source.page_in_count("$r1"), 1);
        assert_eq!(source.page_in_count("$r2"), 0);
    }

    #[tokio::test]
    async fn page_in_failure_is_logged_with_position() {
        let (logs, _guard) = capture_logs();
        let source = Arc::new(MockRoomSource::new().failing("$root", FetchError::NotFound));
        let result = run(&source, &["$root"]).await;
        assert_matches!(result.status, ResolutionStatus::FailedAt(0));

        assert!(logs.has_event(Level::WARN, "timeline page-in failed"));
        let warn = logs
            .events()
            .into_iter()
            .find(|e| e.level == Level::WARN)
            .unwrap();
        assert_eq!(warn.field("position"), Some("0"));
        assert!(logs.has_span("resolve"));
    }

    // -- properties --

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        /// 0 = cached, 1 = pages in, 2 = hidden after page-in, 3 = page-in fails
        fn build(kinds: &[u8]) -> (MockRoomSource, Vec<String>) {
            let names: Vec<String> = (0..kinds.len()).map(|i| format!("$e{i}")).collect();
            let mut source = MockRoomSource::new();
            for (name, kind) in names.iter().zip(kinds) {
                source = match kind {
                    0 => source.cached(&[name.as_str()]),
                    1 => source.remote(&[name.as_str()]),
                    2 => source.hidden(name),
                    _ => source.failing(name, FetchError::Network("reset".into())),
                };
            }
            (source, names)
        }

        proptest! {
            #[test]
            fn result_is_prefix_halting_at_first_gap(kinds in proptest::collection::vec(0u8..4, 0..12)) {
                let (source, names) = build(&kinds);
                let source = Arc::new(source);
                let request: Vec<&str> = names.iter().map(String::as_str).collect();

                let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
                let result = rt.block_on(run(&source, &request));

                let first_gap = kinds.iter().position(|k| *k >= 2);
                let resolved = event_ids(&result);
                prop_assert_eq!(&resolved[..], &request[..resolved.len()]);

                match first_gap {
                    None => {
                        prop_assert!(result.is_complete());
                        prop_assert_eq!(resolved.len(), request.len());
                    }
                    Some(k) => {
                        prop_assert_eq!(result.status, ResolutionStatus::FailedAt(k));
                        prop_assert_eq!(resolved.len(), k);
                        for later in &request[k + 1..] {
                            prop_assert_eq!(source.find_count(later), 0);
                            prop_assert_eq!(source.page_in_count(later), 0);
                        }
                    }
                }

                for (name, kind) in request.iter().zip(&kinds) {
                    if *kind == 0 {
                        prop_assert_eq!(source.page_in_count(name), 0);
                    }
                }
            }
        }
    }
}
