use fintable_core::{ExportedTable, TableType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CollectStatus {
    Collecting,
    Complete,
    Cancelled,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    pub progress_percent: u8,
    pub rows_collected: usize,
    pub status: CollectStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

impl ProgressEvent {
    pub fn collecting(progress_percent: u8, rows_collected: usize) -> Self {
        Self {
            progress_percent: progress_percent.min(99),
            rows_collected,
            status: CollectStatus::Collecting,
            payload: None,
            error_detail: None,
        }
    }

    pub fn complete(rows_collected: usize, payload: String) -> Self {
        Self {
            progress_percent: 100,
            rows_collected,
            status: CollectStatus::Complete,
            payload: Some(payload),
            error_detail: None,
        }
    }

    pub fn cancelled(progress_percent: u8, rows_collected: usize) -> Self {
        Self {
            progress_percent,
            rows_collected,
            status: CollectStatus::Cancelled,
            payload: None,
            error_detail: None,
        }
    }

    pub fn error(progress_percent: u8, rows_collected: usize, detail: impl Into<String>) -> Self {
        Self {
            progress_percent,
            rows_collected,
            status: CollectStatus::Error,
            payload: None,
            error_detail: Some(detail.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TableSummary {
    pub index: usize,
    pub table_type: TableType,
    pub row_count: usize,
    pub column_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ContentRequest {
    ScanTables,
    ExportTable { index: usize },
    CollectAll { index: usize },
    CancelCollection,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ContentResponse {
    Tables { tables: Vec<TableSummary> },
    Export { table: ExportedTable },
    Cancelled { cancelled: bool },
    Error(ErrorResponse),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{ContentRequest, ProgressEvent};

    #[test]
    fn progress_event_uses_camel_case_and_omits_empty_fields() {
        let json = serde_json::to_string(&ProgressEvent::collecting(42, 120))
            .expect("event should serialize");
        assert_eq!(
            json,
            r#"{"progressPercent":42,"rowsCollected":120,"status":"collecting"}"#
        );
    }

    #[test]
    fn collecting_never_claims_completion() {
        assert_eq!(ProgressEvent::collecting(100, 1).progress_percent, 99);
    }

    #[test]
    fn requests_are_tagged_by_action() {
        let request: ContentRequest =
            serde_json::from_str(r#"{"action":"collectAll","index":2}"#).expect("valid request");
        assert_eq!(request, ContentRequest::CollectAll { index: 2 });

        let request: ContentRequest =
            serde_json::from_str(r#"{"action":"cancelCollection"}"#).expect("valid request");
        assert_eq!(request, ContentRequest::CancelCollection);
    }
}
