/// Character budget used when the caller does not supply one.
pub const DEFAULT_SUMMARY_MAX_CHARS: usize = 500;

/// Returned when no sentence survives filtering.
pub const INSUFFICIENT_TEXT_SUMMARY: &str =
    "Document summary not available - insufficient text content.";

/// Candidates this short (after trimming) are treated as fragments.
const MIN_SENTENCE_CHARS: usize = 10;
const MAX_SENTENCES: usize = 5;

/// Build an extractive summary from the leading sentences of `text`.
///
/// Sentences are split on `.`, `!` and `?`. Up to five of them are appended
/// in order, each followed by `". "`, stopping at the first one that would
/// push the summary past `max_chars`. If not even the first sentence fits,
/// it is returned on its own regardless of the budget.
pub fn summarize(text: &str, max_chars: usize) -> String {
    let sentences: Vec<&str> = text
        .split(['.', '!', '?'])
        .filter(|s| s.trim().chars().count() > MIN_SENTENCE_CHARS)
        .collect();

    let Some(first) = sentences.first() else {
        return INSUFFICIENT_TEXT_SUMMARY.to_string();
    };

    let mut summary = String::new();
    let mut summary_chars = 0;
    for sentence in sentences.iter().take(MAX_SENTENCES) {
        // Budget is checked against the raw candidate, before trimming.
        if summary_chars + sentence.chars().count() > max_chars {
            break;
        }
        let trimmed = sentence.trim();
        summary.push_str(trimmed);
        summary.push_str(". ");
        summary_chars += trimmed.chars().count() + 2;
    }

    let summary = summary.trim_end();
    if summary.is_empty() {
        format!("{}.", first.trim())
    } else {
        summary.to_string()
    }
}
