//! # strand-autocomplete
//!
//! Autocomplete providers for the message composer.
//!
//! - **Provider contract**: [`AutocompleteProvider`], [`Completion`], [`SelectionRange`]
//! - **Trigger matching**: [`find_command`] locates the trigger token under the cursor
//! - **Emoji**: [`EmojiProvider`] completes `:shortcodes:` and ASCII emoticons
//!   against an [`EmojiIndex`]; [`StaticEmojiIndex`] is a small built-in index
//!
//! Settings are passed to each call; providers never look them up globally.

#![deny(unsafe_code)]

pub mod emoji;
pub mod index;
pub mod provider;

pub use emoji::EmojiProvider;
pub use index::{EmojiEntry, EmojiIndex, StaticEmojiIndex};
pub use provider::{AutocompleteProvider, Command, Completion, SelectionRange, find_command};
