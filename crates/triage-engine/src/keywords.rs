use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

const MAX_KEYWORDS: usize = 10;
/// Tokens this short or shorter are ignored.
const MIN_TOKEN_CHARS: usize = 4;

/// Anything but ASCII word characters and whitespace. Accented and
/// non-Latin letters are stripped like punctuation.
static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\s]").expect("valid punctuation pattern"));

/// Return up to ten tokens ordered by descending frequency.
///
/// Tokens are lower-cased words longer than four characters, counted by
/// exact match. Ties keep the order in which the tokens first appear.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let cleaned = NON_WORD.replace_all(&lowered, " ");

    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for token in cleaned
        .split_whitespace()
        .filter(|t| t.chars().count() > MIN_TOKEN_CHARS)
    {
        let i = *index.entry(token).or_insert_with(|| {
            counts.push((token, 0));
            counts.len() - 1
        });
        counts[i].1 += 1;
    }

    // Stable: equal counts stay in first-seen order.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(MAX_KEYWORDS)
        .map(|(token, _)| token.to_string())
        .collect()
}
