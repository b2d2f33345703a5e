//! Public contact form.

use serde::Deserialize;
use validator::Validate;

/// Reply for an accepted contact message.
pub const CONTACT_RECEIVED_MESSAGE: &str = "Thank you! Your message has been received.";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ContactMessageRequest {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: String,

    #[validate(
        email(message = "Invalid email format"),
        length(max = 150, message = "Email must be at most 150 characters")
    )]
    pub email: String,

    #[validate(length(max = 40, message = "Phone must be at most 40 characters"))]
    pub phone: Option<String>,

    #[validate(length(min = 3, max = 120, message = "Subject must be 3-120 characters"))]
    pub subject: String,

    #[validate(length(min = 10, max = 5000, message = "Message must be 10-5000 characters"))]
    pub message: String,
}

/// Admin request to verify the outgoing email setup.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendTestEmailRequest {
    #[validate(email(message = "Invalid email format"))]
    pub to: String,

    #[validate(length(min = 1, max = 200, message = "Subject must be 1-200 characters"))]
    pub subject: Option<String>,
}

impl SendTestEmailRequest {
    pub fn subject_or_default(&self) -> &str {
        self.subject
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_TEST_EMAIL_SUBJECT)
    }
}

pub const DEFAULT_TEST_EMAIL_SUBJECT: &str = "APECK Email Configuration Test";

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ContactMessageRequest {
        ContactMessageRequest {
            name: "Jane Doe".to_string(),
            email: "jane@example.org".to_string(),
            phone: Some("+254700000000".to_string()),
            subject: "Partnership".to_string(),
            message: "We would like to partner on an outreach.".to_string(),
        }
    }

    #[test]
    fn test_valid_message() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_short_message_rejected() {
        let mut r = request();
        r.message = "Hi".to_string();
        assert!(r.validate().unwrap_err().field_errors().contains_key("message"));
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut r = request();
        r.name = "   ".to_string();
        assert!(r.validate().unwrap_err().field_errors().contains_key("name"));
    }

    #[test]
    fn test_long_phone_rejected() {
        let mut r = request();
        r.phone = Some("1".repeat(41));
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_test_email_subject_default() {
        let request = SendTestEmailRequest {
            to: "admin@apeck.org".to_string(),
            subject: Some("   ".to_string()),
        };
        assert_eq!(request.subject_or_default(), DEFAULT_TEST_EMAIL_SUBJECT);

        let request = SendTestEmailRequest {
            to: "admin@apeck.org".to_string(),
            subject: Some("SMTP check".to_string()),
        };
        assert_eq!(request.subject_or_default(), "SMTP check");
        assert!(request.validate().is_ok());
    }
}
