//! # strand-thread
//!
//! Reply-chain event resolution for thread views.
//!
//! - **Room data source**: [`RoomDataSource`], the async trait a client
//!   implements over its room cache and timeline pagination
//! - **Event resolver**: [`EventResolver`] turns an ordered list of event IDs
//!   into the longest resolvable prefix of event records, halting at the
//!   first gap
//! - **Thread view**: [`ThreadView`] runs one resolution per activation and
//!   publishes `Loading` → `Ready` | `Errored` to the rendering surface,
//!   going silent once torn down

#![deny(unsafe_code)]

pub mod resolver;
pub mod source;
pub mod view;

#[cfg(test)]
mod test_support;

pub use resolver::{EventResolver, ResolutionRequest, ResolutionResult, ResolutionStatus};
pub use source::{Room, RoomDataSource};
pub use view::{ThreadStatus, ThreadView, UNRESOLVABLE_EVENT_MESSAGE};
