//! Topical tags from a fixed vocabulary.

pub const TAG_VOCABULARY: &[&str] = &[
    "trade",
    "injury",
    "mvp",
    "playoff",
    "draft",
    "contract",
    "rookie",
    "championship",
];

/// Vocabulary words occurring (case-insensitive substring) in `text`, in vocabulary order.
pub fn extract_tags(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TAG_VOCABULARY
        .iter()
        .filter(|kw| lower.contains(*kw))
        .map(|kw| kw.to_string())
        .collect()
}
