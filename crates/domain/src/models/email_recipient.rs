//! Notification recipient lists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Which notifications a recipient receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipientType {
    /// Membership application alerts
    Membership,
    /// Contact form and general correspondence
    General,
}

impl RecipientType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecipientType::Membership => "membership",
            RecipientType::General => "general",
        }
    }
}

impl FromStr for RecipientType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "membership" => Ok(RecipientType::Membership),
            "general" => Ok(RecipientType::General),
            _ => Err(format!("Unknown recipient type: {}", s)),
        }
    }
}

impl std::fmt::Display for RecipientType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EmailRecipient {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub recipient_type: RecipientType,
    pub is_active: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_is_active() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmailRecipientRequest {
    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: String,

    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: Option<String>,

    #[serde(rename = "type")]
    pub recipient_type: RecipientType,

    #[serde(default = "default_is_active")]
    pub is_active: bool,

    #[serde(default)]
    #[validate(range(min = 0, message = "Display order must be non-negative"))]
    pub display_order: i32,
}

/// Partial update. Absent fields keep their stored value.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmailRecipientRequest {
    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: Option<String>,

    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: Option<String>,

    #[serde(rename = "type")]
    pub recipient_type: Option<RecipientType>,

    pub is_active: Option<bool>,

    #[validate(range(min = 0, message = "Display order must be non-negative"))]
    pub display_order: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipientListResponse {
    pub success: bool,
    pub recipients: Vec<EmailRecipient>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipientResponse {
    pub success: bool,
    pub recipient: EmailRecipient,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipientEmailsResponse {
    pub success: bool,
    pub emails: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_defaults() {
        let request: CreateEmailRecipientRequest =
            serde_json::from_str(r#"{"email":"board@apeck.org","type":"membership"}"#).unwrap();
        assert!(request.is_active);
        assert_eq!(request.display_order, 0);
        assert_eq!(request.recipient_type, RecipientType::Membership);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_unknown_type_rejected_at_deserialization() {
        let result: Result<CreateEmailRecipientRequest, _> =
            serde_json::from_str(r#"{"email":"x@apeck.org","type":"billing"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_recipient_serializes_type_field() {
        let recipient = EmailRecipient {
            id: Uuid::new_v4(),
            email: "info@apeck.org".to_string(),
            name: None,
            recipient_type: RecipientType::General,
            is_active: true,
            display_order: 2,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&recipient).unwrap();
        assert_eq!(json["type"], "general");
        assert_eq!(json["is_active"], true);
        assert_eq!(json["display_order"], 2);
    }

    #[test]
    fn test_recipient_type_from_str() {
        assert_eq!("General".parse::<RecipientType>().unwrap(), RecipientType::General);
        assert!("other".parse::<RecipientType>().is_err());
    }
}
