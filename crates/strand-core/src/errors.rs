//! Error types shared across strand crates.
//!
//! - [`FetchError`]: a timeline page-in failed. Resolution treats this as a
//!   gap at one position, never as a fault.
//! - [`ThreadError`]: a caller handed a thread view inputs it cannot work
//!   with. These signal a defect in the caller and are not recoverable.

use thiserror::Error;

use crate::ids::RoomId;

/// Failure reported by a room data source while paging in a timeline.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The server has no such event (never existed or purged).
    #[error("event not found")]
    NotFound,

    /// The user is not allowed to see the event.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Transport-level failure talking to the homeserver.
    #[error("network error: {0}")]
    Network(String),

    /// Anything else the data source could not classify.
    #[error("fetch failed: {0}")]
    Other(String),
}

/// Programmer errors raised when activating a thread view.
#[derive(Debug, Error)]
pub enum ThreadError {
    /// The thread room reference does not name a known room.
    #[error("room not found: {0}")]
    RoomNotFound(RoomId),

    /// A required input was empty.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Activation happened outside an async runtime, so there is nothing to
    /// run the resolution on.
    #[error("no async runtime available to run thread resolution")]
    NoRuntime,
}

/// Convenience type alias for thread activation results.
pub type Result<T> = std::result::Result<T, ThreadError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn not_found_display() {
        assert_eq!(FetchError::NotFound.to_string(), "event not found");
    }

    #[test]
    fn forbidden_display() {
        let err = FetchError::Forbidden("not in room".into());
        assert_eq!(err.to_string(), "forbidden: not in room");
    }

    #[test]
    fn network_display() {
        let err = FetchError::Network("connection reset".into());
        assert_eq!(err.to_string(), "network error: connection reset");
    }

    #[test]
    fn other_display() {
        let err = FetchError::Other("bad gateway".into());
        assert_eq!(err.to_string(), "fetch failed: bad gateway");
    }

    #[test]
    fn room_not_found_display() {
        let err = ThreadError::RoomNotFound(RoomId::from("!gone:hs"));
        assert_eq!(err.to_string(), "room not found: !gone:hs");
    }

    #[test]
    fn invalid_input_display() {
        let err = ThreadError::InvalidInput("root event id is empty".into());
        assert_eq!(err.to_string(), "invalid input: root event id is empty");
    }

    #[test]
    fn no_runtime_display() {
        assert_eq!(
            ThreadError::NoRuntime.to_string(),
            "no async runtime available to run thread resolution"
        );
    }

    #[test]
    fn result_alias() {
        fn example() -> Result<u8> {
            Err(ThreadError::InvalidInput("x".into()))
        }
        assert_matches!(example(), Err(ThreadError::InvalidInput(_)));
    }
}
