//! Settings type definitions.
//!
//! Field names are camelCase on the wire. Every group is `#[serde(default)]`
//! so a settings file only needs the keys it changes.

use serde::{Deserialize, Serialize};

/// Root settings type for the triage service.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TriageSettings {
    pub server: ServerSettings,
    pub pipeline: PipelineSettings,
    pub escalation: EscalationSettings,
    pub logging: LoggingSettings,
}

/// HTTP listener settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// Bind address.
    pub host: String,
    pub port: u16,
    /// Requests running longer than this are dropped with 408.
    pub request_timeout_secs: u64,
    /// Upper bound on the JSON request body.
    pub max_body_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8787,
            request_timeout_secs: 30,
            max_body_bytes: 16 * 1024 * 1024, // 16 MB
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PipelineSettings {
    /// Character budget for the extractive summary.
    pub summary_max_chars: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            summary_max_chars: 500,
        }
    }
}

/// Working-hours window used by the escalation rule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EscalationSettings {
    /// Local offset from UTC, in minutes.
    pub utc_offset_minutes: i32,
    /// First working hour (inclusive).
    pub work_start_hour: u32,
    /// End of the working day (exclusive).
    pub work_end_hour: u32,
}

impl Default for EscalationSettings {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 330,
            work_start_hour: 9,
            work_end_hour: 18,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Default level; `RUST_LOG` takes precedence.
    pub level: String,
    /// JSON lines on stdout when true, human-readable otherwise.
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}
