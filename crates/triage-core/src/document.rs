use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Placeholder confidence reported with every result.
///
/// Fixed value surfaced for observability; it is not derived from the text.
pub const AI_CONFIDENCE: f64 = 0.85;

/// Document payload submitted by the upload service.
///
/// Only `extracted_text` drives the pipeline; the remaining fields travel
/// along for routing and alert drafting. Missing or `null` fields decode to
/// their empty value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentMetadata {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    /// Department declared by the uploader.
    #[serde(deserialize_with = "null_as_default")]
    pub department: String,
    #[serde(deserialize_with = "null_as_default")]
    pub document_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub language: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    /// Full text extracted upstream. Blank text is rejected.
    #[serde(deserialize_with = "null_as_default")]
    pub extracted_text: String,
    #[serde(deserialize_with = "null_as_default")]
    pub file_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub file_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub file_size: u64,
}

impl DocumentMetadata {
    /// True when there is no text worth processing.
    pub fn is_blank(&self) -> bool {
        self.extracted_text.trim().is_empty()
    }

    /// Human-facing label: the title, or the file name when untitled.
    pub fn display_name(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.file_name
        } else {
            &self.title
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Suggested owning department.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DepartmentRoute {
    pub department: String,
    /// In `[0, 1]`. Exactly 0.8 means the declared department was kept.
    pub confidence: f64,
}

/// Alert category, matching the notification store's vocabulary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Compliance,
    Deadline,
    NewDocument,
    System,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertPriority {
    Low,
    Medium,
    High,
    Critical,
}

/// Alert record ready for the notification path to persist.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertDraft {
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
    pub priority: AlertPriority,
    pub department: String,
}

/// Triage output for one document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingResult {
    pub summary: String,
    /// Most frequent first, at most ten.
    pub keywords: Vec<String>,
    pub is_critical: bool,
    /// Empty unless `is_critical`.
    pub criticality_reason: String,
    pub department_route: DepartmentRoute,
    pub ai_confidence: f64,
    pub should_send_immediate_alert: bool,
    pub processed_at: DateTime<Utc>,
    /// Present only when the document is escalated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert: Option<AlertDraft>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn metadata_decodes_camel_case() {
        let json = serde_json::json!({
            "title": "Track inspection",
            "department": "Operations",
            "documentType": "report",
            "language": "english",
            "tags": ["rail", "inspection"],
            "description": "weekly",
            "extractedText": "Some text.",
            "fileName": "inspection.pdf",
            "fileType": "application/pdf",
            "fileSize": 2048
        });
        let meta: DocumentMetadata = serde_json::from_value(json).unwrap();
        assert_eq!(meta.document_type, "report");
        assert_eq!(meta.tags, vec!["rail", "inspection"]);
        assert_eq!(meta.extracted_text, "Some text.");
        assert_eq!(meta.file_size, 2048);
    }

    #[test]
    fn missing_and_null_fields_default() {
        let json = serde_json::json!({
            "department": "IT",
            "extractedText": null,
            "tags": null
        });
        let meta: DocumentMetadata = serde_json::from_value(json).unwrap();
        assert_eq!(meta.department, "IT");
        assert!(meta.extracted_text.is_empty());
        assert!(meta.tags.is_empty());
        assert!(meta.is_blank());
    }

    #[test]
    fn wrong_shape_is_rejected() {
        let json = serde_json::json!({ "extractedText": 42 });
        assert!(serde_json::from_value::<DocumentMetadata>(json).is_err());
    }

    #[test]
    fn whitespace_text_is_blank() {
        let meta = DocumentMetadata {
            extracted_text: " \n\t ".into(),
            ..Default::default()
        };
        assert!(meta.is_blank());
    }

    #[test]
    fn display_name_falls_back_to_file_name() {
        let mut meta = DocumentMetadata {
            file_name: "scan.pdf".into(),
            ..Default::default()
        };
        assert_eq!(meta.display_name(), "scan.pdf");
        meta.title = "Audit".into();
        assert_eq!(meta.display_name(), "Audit");
    }

    #[test]
    fn result_wire_format() {
        let result = ProcessingResult {
            summary: "s.".into(),
            keywords: vec!["budget".into()],
            is_critical: false,
            criticality_reason: String::new(),
            department_route: DepartmentRoute {
                department: "Finance".into(),
                confidence: 0.8,
            },
            ai_confidence: AI_CONFIDENCE,
            should_send_immediate_alert: false,
            processed_at: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
            alert: None,
        };
        let v = serde_json::to_value(&result).unwrap();
        assert_eq!(v["isCritical"], false);
        assert_eq!(v["criticalityReason"], "");
        assert_eq!(v["departmentRoute"]["department"], "Finance");
        assert_eq!(v["aiConfidence"], 0.85);
        assert_eq!(v["shouldSendImmediateAlert"], false);
        assert!(v["processedAt"].as_str().unwrap().starts_with("2024-01-02T03:04:05"));
        assert!(v.get("alert").is_none());
    }

    #[test]
    fn alert_kind_serializes_as_type() {
        let alert = AlertDraft {
            kind: AlertKind::Deadline,
            title: "t".into(),
            message: "m".into(),
            priority: AlertPriority::Critical,
            department: "Safety".into(),
        };
        let v = serde_json::to_value(&alert).unwrap();
        assert_eq!(v["type"], "deadline");
        assert_eq!(v["priority"], "critical");
        assert_eq!(
            serde_json::to_value(AlertKind::NewDocument).unwrap(),
            "new_document"
        );
    }
}
