use crate::vocabulary::CRITICAL_KEYWORDS;

/// A single urgent phrase is treated as incidental usage.
const MIN_CRITICAL_MATCHES: usize = 2;

/// Outcome of scanning a document for urgent vocabulary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Criticality {
    pub is_critical: bool,
    /// Empty when not critical.
    pub reason: String,
    /// Every phrase found, in vocabulary order, critical or not.
    pub matched: Vec<&'static str>,
}

/// Flag a document as critical when it contains two or more urgent phrases.
pub fn detect_criticality(text: &str) -> Criticality {
    let lowered = text.to_lowercase();
    let matched: Vec<&'static str> = CRITICAL_KEYWORDS
        .iter()
        .copied()
        .filter(|phrase| lowered.contains(phrase))
        .collect();

    if matched.len() >= MIN_CRITICAL_MATCHES {
        Criticality {
            is_critical: true,
            reason: format!(
                "Document contains critical keywords: {}",
                matched.join(", ")
            ),
            matched,
        }
    } else {
        Criticality {
            is_critical: false,
            reason: String::new(),
            matched,
        }
    }
}
