//! Emoji search index.

/// One searchable emoji.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmojiEntry {
    /// The native glyph inserted on completion.
    pub native: String,
    /// Shortcodes without colons; the first is canonical.
    pub short_names: Vec<String>,
    /// ASCII emoticons that stand for this emoji.
    pub emoticons: Vec<String>,
}

impl EmojiEntry {
    /// Build an entry from borrowed parts.
    pub fn new(native: &str, short_names: &[&str], emoticons: &[&str]) -> Self {
        Self {
            native: native.to_string(),
            short_names: short_names.iter().map(|s| (*s).to_string()).collect(),
            emoticons: emoticons.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Canonical shortcode wrapped in colons, e.g. `:smile:`.
    pub fn colons(&self) -> String {
        match self.short_names.first() {
            Some(name) => format!(":{name}:"),
            None => self.native.clone(),
        }
    }
}

/// Ranked emoji search.
pub trait EmojiIndex: Send + Sync {
    /// Entries matching `query`, best first. `query` has no colons.
    fn search(&self, query: &str) -> Vec<EmojiEntry>;
}

/// `(native, short names, emoticons)`
const TABLE: &[(&str, &[&str], &[&str])] = &[
    ("😀", &["grinning"], &[]),
    ("😃", &["smiley"], &[":D", ":-D", "=D"]),
    ("😄", &["smile"], &[]),
    ("😁", &["grin"], &[]),
    ("😆", &["laughing", "satisfied"], &[]),
    ("😅", &["sweat_smile"], &[]),
    ("😂", &["joy"], &[]),
    ("🙂", &["slightly_smiling_face"], &[":)", ":-)", "(:", "=)"]),
    ("😉", &["wink"], &[";)", ";-)"]),
    ("😊", &["blush"], &[]),
    ("😇", &["innocent"], &["O:)", "O:-)"]),
    ("😍", &["heart_eyes"], &[]),
    ("😘", &["kissing_heart"], &[":*", ":-*"]),
    ("😋", &["yum"], &[]),
    ("😛", &["stuck_out_tongue"], &[":P", ":-P", ":p", ":-p"]),
    ("😜", &["stuck_out_tongue_winking_eye"], &[";P", ";-P", ";p", ";-p"]),
    ("😎", &["sunglasses"], &["B)", "B-)", "8)"]),
    ("😐", &["neutral_face"], &[":|", ":-|"]),
    ("😕", &["confused"], &[":/", ":-/"]),
    ("😞", &["disappointed"], &[":(", ":-("]),
    ("😢", &["cry"], &[":'("]),
    ("😭", &["sob"], &[]),
    ("😮", &["open_mouth"], &[":O", ":-O", ":o", ":-o"]),
    ("😱", &["scream"], &[]),
    ("😠", &["angry"], &[">:(", ">:-("]),
    ("😴", &["sleeping"], &[]),
    ("🤔", &["thinking_face", "thinking"], &[]),
    ("🙃", &["upside_down_face"], &[]),
    ("🙄", &["face_with_rolling_eyes", "roll_eyes"], &[]),
    ("❤️", &["heart"], &["<3"]),
    ("💔", &["broken_heart"], &["</3"]),
    ("💯", &["100"], &[]),
    ("👍", &["+1", "thumbsup"], &[]),
    ("👎", &["-1", "thumbsdown"], &[]),
    ("👋", &["wave"], &[]),
    ("👏", &["clap"], &[]),
    ("🙏", &["pray"], &[]),
    ("🎉", &["tada"], &[]),
    ("🔥", &["fire"], &[]),
    ("✨", &["sparkles"], &[]),
    ("🚀", &["rocket"], &[]),
    ("👀", &["eyes"], &[]),
];

/// Match quality, lower is better.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Rank {
    Exact,
    Prefix,
    Substring,
    Emoticon,
}

/// In-memory index over a fixed emoji table.
#[derive(Clone, Debug)]
pub struct StaticEmojiIndex {
    entries: Vec<EmojiEntry>,
}

impl Default for StaticEmojiIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl StaticEmojiIndex {
    /// Index over the built-in table.
    pub fn new() -> Self {
        Self::from_entries(
            TABLE
                .iter()
                .map(|(native, names, emoticons)| EmojiEntry::new(native, names, emoticons))
                .collect(),
        )
    }

    /// Index over caller-supplied entries; table order breaks ties.
    pub fn from_entries(entries: Vec<EmojiEntry>) -> Self {
        Self { entries }
    }

    /// Every emoticon in the index.
    pub fn emoticons(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .flat_map(|e| e.emoticons.iter().map(String::as_str))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn rank(entry: &EmojiEntry, query: &str) -> Option<Rank> {
        let by_name = entry
            .short_names
            .iter()
            .filter_map(|name| {
                let name = name.to_lowercase();
                if name == query {
                    Some(Rank::Exact)
                } else if name.starts_with(query) {
                    Some(Rank::Prefix)
                } else if name.contains(query) {
                    Some(Rank::Substring)
                } else {
                    None
                }
            })
            .min();

        by_name.or_else(|| {
            entry
                .emoticons
                .iter()
                .any(|e| e.replace(':', "").to_lowercase() == query)
                .then_some(Rank::Emoticon)
        })
    }
}

impl EmojiIndex for StaticEmojiIndex {
    fn search(&self, query: &str) -> Vec<EmojiEntry> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<(Rank, &EmojiEntry)> = self
            .entries
            .iter()
            .filter_map(|entry| Self::rank(entry, &query).map(|rank| (rank, entry)))
            .collect();
        hits.sort_by_key(|(rank, _)| *rank);
        hits.into_iter().map(|(_, entry)| entry.clone()).collect()
    }
}
