//! Admin console user model and user-management payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Console roles. Hierarchy: Admin > Editor > Viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Editor,
    Viewer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Editor => "editor",
            UserRole::Viewer => "viewer",
        }
    }

    /// Check if this role has at least the specified role level.
    pub fn has_at_least(&self, required: UserRole) -> bool {
        self.priority() >= required.priority()
    }

    fn priority(&self) -> u8 {
        match self {
            UserRole::Admin => 100,
            UserRole::Editor => 60,
            UserRole::Viewer => 20,
        }
    }
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::Viewer
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "editor" => Ok(UserRole::Editor),
            "viewer" => Ok(UserRole::Viewer),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A console user.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// User as returned by the management and profile endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: UserRole,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            role: user.role,
            is_active: user.is_active,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

fn default_send_invite() -> bool {
    true
}

/// Request payload for creating a console user.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 120, message = "First name must be 1-120 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 120, message = "Last name must be 1-120 characters"))]
    pub last_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[serde(default)]
    pub role: Option<UserRole>,

    #[serde(default = "default_send_invite")]
    pub send_invite: bool,
}

/// Request payload for updating a console user (partial update).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 120, message = "First name must be 1-120 characters"))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 120, message = "Last name must be 1-120 characters"))]
    pub last_name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    pub role: Option<UserRole>,

    pub is_active: Option<bool>,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
}

impl UpdateUserRequest {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.role.is_none()
            && self.is_active.is_none()
            && self.password.is_none()
    }

    /// True when applying this update would take away an active admin:
    /// demoting an admin, or deactivating an active admin.
    pub fn removes_admin(&self, current: &User) -> bool {
        if current.role != UserRole::Admin {
            return false;
        }
        let demoted = matches!(self.role, Some(role) if role != UserRole::Admin);
        let deactivated = current.is_active && self.is_active == Some(false);
        demoted || deactivated
    }
}

/// Request payload for updating the caller's own profile.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 120, message = "First name must be 1-120 characters"))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 120, message = "Last name must be 1-120 characters"))]
    pub last_name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

/// Request payload for changing the caller's own password.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

/// Normalizes an email address for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: UserRole, is_active: bool) -> User {
        User {
            id: Uuid::new_v4(),
            first_name: "Grace".to_string(),
            last_name: "Wanjiru".to_string(),
            email: "grace@apeck.org".to_string(),
            password_hash: "$argon2id$...".to_string(),
            role,
            is_active,
            last_login_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_role_hierarchy() {
        assert!(UserRole::Admin.has_at_least(UserRole::Editor));
        assert!(UserRole::Editor.has_at_least(UserRole::Editor));
        assert!(!UserRole::Viewer.has_at_least(UserRole::Editor));
        assert!(!UserRole::Editor.has_at_least(UserRole::Admin));
    }

    #[test]
    fn test_role_parse_and_display() {
        assert_eq!("ADMIN".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!(" editor ".parse::<UserRole>().unwrap(), UserRole::Editor);
        assert!("owner".parse::<UserRole>().is_err());
        assert_eq!(UserRole::Viewer.to_string(), "viewer");
    }

    #[test]
    fn test_user_response_hides_hash_and_uses_camel_case() {
        let json = serde_json::to_value(UserResponse::from(user(UserRole::Editor, true))).unwrap();
        assert_eq!(json["firstName"], "Grace");
        assert_eq!(json["role"], "editor");
        assert_eq!(json["isActive"], true);
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_create_user_defaults() {
        let request: CreateUserRequest = serde_json::from_str(
            r#"{"firstName":"A","lastName":"B","email":"a@b.org","password":"longenough"}"#,
        )
        .unwrap();
        assert!(request.send_invite);
        assert!(request.role.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_user_short_password_rejected() {
        let request: CreateUserRequest = serde_json::from_str(
            r#"{"firstName":"A","lastName":"B","email":"a@b.org","password":"short"}"#,
        )
        .unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_removes_admin() {
        let admin = user(UserRole::Admin, true);
        let demote = UpdateUserRequest {
            role: Some(UserRole::Editor),
            ..Default::default()
        };
        let deactivate = UpdateUserRequest {
            is_active: Some(false),
            ..Default::default()
        };
        let rename = UpdateUserRequest {
            first_name: Some("New".to_string()),
            ..Default::default()
        };
        let keep_admin = UpdateUserRequest {
            role: Some(UserRole::Admin),
            ..Default::default()
        };

        assert!(demote.removes_admin(&admin));
        assert!(deactivate.removes_admin(&admin));
        assert!(!rename.removes_admin(&admin));
        assert!(!keep_admin.removes_admin(&admin));
        assert!(!demote.removes_admin(&user(UserRole::Editor, true)));
        assert!(!deactivate.removes_admin(&user(UserRole::Admin, false)));
    }

    #[test]
    fn test_update_is_empty() {
        assert!(UpdateUserRequest::default().is_empty());
        let request: UpdateUserRequest = serde_json::from_str(r#"{"isActive":true}"#).unwrap();
        assert!(!request.is_empty());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Admin@APECK.org "), "admin@apeck.org");
    }
}
