/// Failures surfaced by the triage pipeline.
///
/// Either the result is fully populated or one of these is returned; there
/// is no partial output. Neither variant is retryable since the pipeline is
/// deterministic.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TriageError {
    /// Input rejected before any component ran.
    #[error("{0}")]
    InvalidInput(String),

    /// Unexpected failure, including a payload of the wrong shape.
    #[error("{0}")]
    Internal(String),
}

impl TriageError {
    pub fn no_text() -> Self {
        Self::InvalidInput("No text content to process".into())
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Short classification string for logging/metrics.
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<serde_json::Error> for TriageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(err.to_string())
    }
}
