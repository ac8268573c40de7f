//! Progress/result objects returned to the host

use crate::model::PasswordPolicy;
use serde::{Deserialize, Serialize};

/// Operation status reported back to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    InProgress,
    Success,
    Failed,
}

/// Result of a single handler invocation
///
/// Every handler starts from an in-progress event and overwrites it with
/// `Success` once its single remote call completes; there is no multi-step
/// progress chaining.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    pub status: OperationStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_model: Option<PasswordPolicy>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_models: Option<Vec<PasswordPolicy>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ProgressEvent {
    /// In-progress event carrying the model parsed so far
    pub fn progress(model: PasswordPolicy) -> Self {
        ProgressEvent {
            status: OperationStatus::InProgress,
            resource_model: Some(model),
            resource_models: None,
            message: None,
        }
    }

    pub fn success(model: PasswordPolicy) -> Self {
        ProgressEvent {
            status: OperationStatus::Success,
            resource_model: Some(model),
            resource_models: None,
            message: None,
        }
    }

    pub fn success_list(models: Vec<PasswordPolicy>) -> Self {
        ProgressEvent {
            status: OperationStatus::Success,
            resource_model: None,
            resource_models: Some(models),
            message: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_form() {
        assert_eq!(
            serde_json::to_string(&OperationStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        assert_eq!(
            serde_json::to_string(&OperationStatus::Success).unwrap(),
            "\"SUCCESS\""
        );
    }

    #[test]
    fn test_event_omits_absent_members() {
        let event = ProgressEvent::success_list(Vec::new());
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "status": "SUCCESS", "resourceModels": [] })
        );
    }
}
