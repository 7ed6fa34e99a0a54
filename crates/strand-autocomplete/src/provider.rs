//! Provider contract and trigger matching.
//!
//! Offsets are byte offsets into the composer text.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use strand_settings::AutocompleteSettings;

/// Matches any run of non-whitespace; used when completion is forced.
static FORCE_TRIGGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+").expect("force trigger pattern is valid"));

/// Cursor selection in the composer, `start..end`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelectionRange {
    /// Selection start.
    pub start: usize,
    /// Selection end.
    pub end: usize,
}

impl SelectionRange {
    /// A selection from `start` to `end`.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A collapsed selection (plain cursor) at `at`.
    pub fn caret(at: usize) -> Self {
        Self { start: at, end: at }
    }
}

/// A trigger token found in the composer text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command {
    /// The matched trigger text.
    pub text: String,
    /// Where the trigger sits; a completion replaces this range.
    pub range: SelectionRange,
}

/// A single suggestion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Completion {
    /// Text inserted when the suggestion is picked.
    pub completion: String,
    /// Label shown next to the suggestion.
    pub title: String,
    /// Range of composer text the completion replaces.
    pub range: SelectionRange,
}

/// Find the trigger under the selection.
///
/// Scans every match of `trigger` in `query` and returns the first one whose
/// range touches the selection. If the pattern has a capture group, group 1
/// is the trigger; otherwise the whole match is.
pub fn find_command(trigger: &Regex, query: &str, selection: SelectionRange) -> Option<Command> {
    trigger.captures_iter(query).find_map(|caps| {
        let m = caps.get(1).or_else(|| caps.get(0))?;
        (selection.start <= m.end() && selection.end >= m.start()).then(|| Command {
            text: m.as_str().to_string(),
            range: SelectionRange::new(m.start(), m.end()),
        })
    })
}

/// A source of composer completions.
#[async_trait]
pub trait AutocompleteProvider: Send + Sync {
    /// Display name of the provider's section in the completion list.
    fn name(&self) -> &str;

    /// Pattern recognising this provider's trigger.
    fn trigger(&self) -> &Regex;

    /// Whether a forced completion should fall back to the word under the cursor.
    fn should_force_complete(&self) -> bool {
        false
    }

    /// Locate this provider's trigger under the selection.
    fn current_command(&self, query: &str, selection: SelectionRange, force: bool) -> Option<Command> {
        let trigger = if force && self.should_force_complete() {
            &*FORCE_TRIGGER
        } else {
            self.trigger()
        };
        find_command(trigger, query, selection)
    }

    /// Suggestions for `query` at `selection`.
    async fn get_completions(
        &self,
        query: &str,
        selection: SelectionRange,
        force: bool,
        settings: &AutocompleteSettings,
    ) -> Vec<Completion>;
}
