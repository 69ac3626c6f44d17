pub mod clock;
pub mod document;
pub mod errors;

pub use clock::{Clock, FixedClock, SystemClock};
pub use document::{
    AlertDraft, AlertKind, AlertPriority, DepartmentRoute, DocumentMetadata, ProcessingResult,
    AI_CONFIDENCE,
};
pub use errors::TriageError;
