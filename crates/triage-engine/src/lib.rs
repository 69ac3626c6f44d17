//! Rule-based document triage: summary, keywords, criticality, department
//! routing and the out-of-hours escalation rule.

pub mod alert;
pub mod criticality;
pub mod escalation;
pub mod keywords;
pub mod pipeline;
pub mod routing;
pub mod summarize;
pub mod vocabulary;

pub use alert::draft_alert;
pub use criticality::{detect_criticality, Criticality};
pub use escalation::{should_send_immediate_alert, EscalationError, WorkingHours};
pub use keywords::extract_keywords;
pub use pipeline::{EngineConfig, TriageEngine};
pub use routing::route_department;
pub use summarize::{summarize, DEFAULT_SUMMARY_MAX_CHARS};
