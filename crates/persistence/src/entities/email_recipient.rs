//! Email recipient entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{EmailRecipient, RecipientType};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

/// Database row mapping for the email_recipients table.
#[derive(Debug, Clone, FromRow)]
pub struct EmailRecipientEntity {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    #[sqlx(rename = "type")]
    pub recipient_type: String,
    pub is_active: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EmailRecipientEntity> for EmailRecipient {
    fn from(entity: EmailRecipientEntity) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            name: entity.name,
            recipient_type: RecipientType::from_str(&entity.recipient_type)
                .unwrap_or(RecipientType::General),
            is_active: entity.is_active,
            display_order: entity.display_order,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipient_type_mapping() {
        let now = Utc::now();
        let entity = EmailRecipientEntity {
            id: Uuid::new_v4(),
            email: "board@apeck.org".to_string(),
            name: Some("Board".to_string()),
            recipient_type: "membership".to_string(),
            is_active: true,
            display_order: 2,
            created_at: now,
            updated_at: now,
        };
        let recipient: EmailRecipient = entity.into();
        assert_eq!(recipient.recipient_type, RecipientType::Membership);
        assert_eq!(recipient.display_order, 2);
    }
}
