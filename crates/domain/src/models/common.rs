//! Response envelopes shared by several endpoints.

use serde::Serialize;

/// `{ "success": true }` with an optional message.
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// Deserializes a present field (even `null`) as `Some(..)`.
///
/// Combined with `#[serde(default)]` on an `Option<Option<T>>` field this
/// separates "absent" (`None`) from "explicitly null" (`Some(None)`).
pub fn deserialize_present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "deserialize_present")]
        value: Option<Option<i32>>,
    }

    #[test]
    fn test_success_response_omits_empty_message() {
        let json = serde_json::to_string(&SuccessResponse::ok()).unwrap();
        assert_eq!(json, r#"{"success":true}"#);
    }

    #[test]
    fn test_failed_response() {
        let json = serde_json::to_value(SuccessResponse::failed("Application not found")).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Application not found");
    }

    #[test]
    fn test_deserialize_present_distinguishes_null() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        let null: Patch = serde_json::from_str(r#"{"value":null}"#).unwrap();
        let set: Patch = serde_json::from_str(r#"{"value":3}"#).unwrap();

        assert_eq!(absent.value, None);
        assert_eq!(null.value, Some(None));
        assert_eq!(set.value, Some(Some(3)));
    }
}
