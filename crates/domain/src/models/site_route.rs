//! Public route table consumed by the site router.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize)]
pub struct SiteRoute {
    pub id: Uuid,
    pub slug: String,
    pub target: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_is_active() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRouteRequest {
    #[validate(length(min = 1, max = 255, message = "Slug must be 1-255 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub slug: String,

    #[validate(length(min = 1, max = 255, message = "Target must be 1-255 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub target: String,

    #[serde(default = "default_is_active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRouteRequest {
    #[validate(length(min = 1, max = 255, message = "Slug must be 1-255 characters"))]
    pub slug: Option<String>,

    #[validate(length(min = 1, max = 255, message = "Target must be 1-255 characters"))]
    pub target: Option<String>,

    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_route_defaults_active() {
        let request: CreateRouteRequest =
            serde_json::from_str(r#"{"slug":"about","target":"pages/about"}"#).unwrap();
        assert!(request.is_active);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_blank_target_rejected() {
        let request = CreateRouteRequest {
            slug: "about".to_string(),
            target: "  ".to_string(),
            is_active: true,
        };
        assert!(request.validate().is_err());
    }
}
