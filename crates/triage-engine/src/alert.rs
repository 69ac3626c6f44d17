use triage_core::{AlertDraft, AlertKind, AlertPriority, DocumentMetadata};

use crate::criticality::Criticality;
use crate::vocabulary::DEADLINE_KEYWORDS;

/// Draft the alert that accompanies an escalated document.
pub fn draft_alert(
    metadata: &DocumentMetadata,
    criticality: &Criticality,
    department: &str,
) -> AlertDraft {
    let kind = if criticality
        .matched
        .iter()
        .any(|phrase| DEADLINE_KEYWORDS.contains(phrase))
    {
        AlertKind::Deadline
    } else {
        AlertKind::Compliance
    };

    AlertDraft {
        kind,
        title: format!("Critical document: {}", metadata.display_name()),
        message: criticality.reason.clone(),
        priority: AlertPriority::Critical,
        department: department.to_string(),
    }
}
