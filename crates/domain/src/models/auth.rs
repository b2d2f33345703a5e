//! Authentication payloads: login, token refresh, password reset.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::user::{User, UserRole};

/// Request payload for password login.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// The user block embedded in a login response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: UserRole,
}

impl From<&User> for AuthUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Response for a successful login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    pub user: AuthUser,
}

/// Response for a successful refresh.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Request payload for completing a password reset with an emailed code.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 4, max = 10, message = "Code must be 4-10 characters"))]
    pub code: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_login_response_shape() {
        let user = User {
            id: Uuid::new_v4(),
            first_name: "Peter".to_string(),
            last_name: "Otieno".to_string(),
            email: "peter@apeck.org".to_string(),
            password_hash: String::new(),
            role: UserRole::Admin,
            is_active: true,
            last_login_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let response = LoginResponse {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            expires_in: 900,
            user: AuthUser::from(&user),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["accessToken"], "a");
        assert_eq!(json["refreshToken"], "r");
        assert_eq!(json["expiresIn"], 900);
        assert_eq!(json["user"]["firstName"], "Peter");
        assert_eq!(json["user"]["role"], "admin");
    }

    #[test]
    fn test_reset_password_validation() {
        let valid: ResetPasswordRequest = serde_json::from_str(
            r#"{"email":"a@b.org","code":"123456","newPassword":"new-password"}"#,
        )
        .unwrap();
        assert!(valid.validate().is_ok());

        let bad_code: ResetPasswordRequest = serde_json::from_str(
            r#"{"email":"a@b.org","code":"12","newPassword":"new-password"}"#,
        )
        .unwrap();
        assert!(bad_code.validate().unwrap_err().field_errors().contains_key("code"));
    }

    #[test]
    fn test_login_rejects_bad_email() {
        let request = LoginRequest {
            email: "not-an-email".to_string(),
            password: "x".to_string(),
        };
        assert!(request.validate().is_err());
    }
}
