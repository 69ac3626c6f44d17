use triage_core::DepartmentRoute;

use crate::vocabulary::DEPARTMENTS;

/// Confidence reported when the declared department is kept.
pub const DEFERRED_CONFIDENCE: f64 = 0.8;
/// Computed confidence must exceed this to override the uploader.
pub const OVERRIDE_THRESHOLD: f64 = 0.7;
/// Confidence when no department vocabulary appears at all.
pub const NO_SIGNAL_CONFIDENCE: f64 = 0.5;
/// Number of matched terms that saturates confidence at 1.0.
const SATURATION_HITS: f64 = 5.0;

/// Number of `vocabulary` terms contained in `lowered`.
fn score(lowered: &str, vocabulary: &[&str]) -> usize {
    vocabulary.iter().filter(|term| lowered.contains(*term)).count()
}

/// Confirm the declared department or suggest a better-matching one.
///
/// The declared department is only overridden when the text carries strong
/// signal (confidence above [`OVERRIDE_THRESHOLD`]) for a different one.
/// Among equally scoring departments, the last in table order wins.
pub fn route_department(text: &str, declared: &str) -> DepartmentRoute {
    let lowered = text.to_lowercase();

    let mut best = DEPARTMENTS[0].0;
    let mut best_score = 0;
    for (department, vocabulary) in DEPARTMENTS {
        let s = score(&lowered, vocabulary);
        if s >= best_score {
            best = *department;
            best_score = s;
        }
    }

    let confidence = if best_score > 0 {
        (best_score as f64 / SATURATION_HITS).min(1.0)
    } else {
        NO_SIGNAL_CONFIDENCE
    };

    if confidence > OVERRIDE_THRESHOLD && best != declared {
        tracing::debug!(
            declared,
            suggested = best,
            score = best_score,
            "overriding declared department"
        );
        return DepartmentRoute {
            department: best.to_string(),
            confidence,
        };
    }

    DepartmentRoute {
        department: declared.to_string(),
        confidence: DEFERRED_CONFIDENCE,
    }
}
