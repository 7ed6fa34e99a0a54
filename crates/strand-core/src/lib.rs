//! # strand-core
//!
//! Foundation types, errors, branded IDs, and logging for strand.
//!
//! This crate provides the shared vocabulary that the other strand crates depend on:
//!
//! - **Branded IDs**: `EventId`, `RoomId` as newtypes for type safety
//! - **Event records**: [`EventRecord`], a resolved chat event with an opaque payload
//! - **Errors**: [`FetchError`] for timeline page-in failures, [`ThreadError`] for caller defects
//! - **Logging**: `tracing` subscriber setup and an in-memory capture layer for tests

#![deny(unsafe_code)]

pub mod errors;
pub mod event;
pub mod ids;
pub mod logging;

pub use errors::{FetchError, Result, ThreadError};
pub use event::EventRecord;
pub use ids::{EventId, RoomId};
