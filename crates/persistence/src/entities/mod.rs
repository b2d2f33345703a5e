//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod content_setting;
pub mod email_recipient;
pub mod event;
pub mod media_asset;
pub mod membership_application;
pub mod news_post;
pub mod page;
pub mod password_reset;
pub mod site_route;
pub mod user;

pub use content_setting::ContentSettingEntity;
pub use email_recipient::EmailRecipientEntity;
pub use event::EventEntity;
pub use media_asset::MediaAssetEntity;
pub use membership_application::{MembershipApplicationEntity, MEMBERSHIP_COLUMNS};
pub use news_post::{NewsPostEntity, NewsSummaryEntity};
pub use page::{PageEntity, PageSectionEntity};
pub use password_reset::PasswordResetTokenEntity;
pub use site_route::SiteRouteEntity;
pub use user::{UserEntity, UserSessionEntity};
