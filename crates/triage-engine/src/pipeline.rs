use std::sync::Arc;

use triage_core::{
    Clock, DocumentMetadata, ProcessingResult, SystemClock, TriageError, AI_CONFIDENCE,
};

use crate::alert::draft_alert;
use crate::criticality::detect_criticality;
use crate::escalation::{should_send_immediate_alert, WorkingHours};
use crate::keywords::extract_keywords;
use crate::routing::route_department;
use crate::summarize::{summarize, DEFAULT_SUMMARY_MAX_CHARS};

/// Tunables for the pipeline. Vocabularies are fixed and not configurable.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub summary_max_chars: usize,
    pub working_hours: WorkingHours,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            summary_max_chars: DEFAULT_SUMMARY_MAX_CHARS,
            working_hours: WorkingHours::default(),
        }
    }
}

/// Stateless triage pipeline. Safe to share across request handlers.
#[derive(Clone)]
pub struct TriageEngine {
    config: EngineConfig,
    clock: Arc<dyn Clock>,
}

impl Default for TriageEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl TriageEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    /// Run every component over the document's text and merge the outputs.
    ///
    /// Blank text is rejected before anything runs. The clock is read once;
    /// the same instant drives the escalation decision and `processed_at`.
    pub fn process(&self, metadata: &DocumentMetadata) -> Result<ProcessingResult, TriageError> {
        if metadata.is_blank() {
            return Err(TriageError::no_text());
        }
        let text = metadata.extracted_text.as_str();

        let summary = summarize(text, self.config.summary_max_chars);
        let keywords = extract_keywords(text);
        let criticality = detect_criticality(text);
        let department_route = route_department(text, &metadata.department);

        let now = self.clock.now();
        let is_working_hours = self.config.working_hours.contains(now);
        let escalate = should_send_immediate_alert(criticality.is_critical, is_working_hours);
        let alert = escalate
            .then(|| draft_alert(metadata, &criticality, &department_route.department));

        tracing::debug!(
            department = %department_route.department,
            confidence = department_route.confidence,
            critical = criticality.is_critical,
            working_hours = is_working_hours,
            keywords = keywords.len(),
            "document triaged"
        );

        Ok(ProcessingResult {
            summary,
            keywords,
            is_critical: criticality.is_critical,
            criticality_reason: criticality.reason,
            department_route,
            ai_confidence: AI_CONFIDENCE,
            should_send_immediate_alert: escalate,
            processed_at: now,
            alert,
        })
    }
}
