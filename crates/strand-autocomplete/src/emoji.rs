//! Emoji completion for `:shortcodes:` and ASCII emoticons.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use strand_settings::AutocompleteSettings;
use tracing::debug;

use crate::index::{EmojiIndex, StaticEmojiIndex};
use crate::provider::{AutocompleteProvider, Completion, SelectionRange};

/// A whole emoji right before the trigger: a pictograph with any variation
/// selector or skin tone after it, or a regional-indicator flag pair. ZWJ
/// sequences end in a pictograph and need no extra case.
const EMOJI_GUARD: &str =
    r"\p{Extended_Pictographic}[\x{FE0F}\x{1F3FB}-\x{1F3FF}]*|[\x{1F1E6}-\x{1F1FF}]{2}";

/// A shortcode or emoticon at the end of the input, after the start of the
/// input, whitespace, or another emoji.
static EMOJI_TRIGGER: LazyLock<Regex> = LazyLock::new(|| {
    let index = StaticEmojiIndex::new();
    let mut emoticons: Vec<&str> = index.emoticons().collect();
    emoticons.sort_by_key(|e| std::cmp::Reverse(e.len()));
    let ascii = emoticons
        .into_iter()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(
        r"(?:^|\s|{EMOJI_GUARD})({ascii}|:[+\-0-9A-Za-z_]*:?)$"
    ))
    .expect("emoji trigger pattern is valid")
});

/// Completes emoji from an [`EmojiIndex`].
pub struct EmojiProvider {
    index: Arc<dyn EmojiIndex>,
}

impl Default for EmojiProvider {
    fn default() -> Self {
        Self::new(Arc::new(StaticEmojiIndex::new()))
    }
}

impl EmojiProvider {
    /// Provider searching `index`.
    pub fn new(index: Arc<dyn EmojiIndex>) -> Self {
        Self { index }
    }
}

#[async_trait]
impl AutocompleteProvider for EmojiProvider {
    fn name(&self) -> &str {
        "😃 Emoji"
    }

    fn trigger(&self) -> &Regex {
        &EMOJI_TRIGGER
    }

    async fn get_completions(
        &self,
        query: &str,
        selection: SelectionRange,
        force: bool,
        settings: &AutocompleteSettings,
    ) -> Vec<Completion> {
        if !settings.suggest_emoji {
            return Vec::new();
        }
        let Some(command) = self.current_command(query, selection, force) else {
            return Vec::new();
        };

        let needle = command.text.replace(':', "");
        let completions: Vec<Completion> = self
            .index
            .search(&needle)
            .into_iter()
            .take(settings.emoji_limit)
            .map(|entry| Completion {
                title: entry.colons(),
                completion: entry.native,
                range: command.range,
            })
            .collect();

        debug!(
            trigger = %command.text,
            count = completions.len(),
            "emoji completions"
        );
        completions
    }
}
