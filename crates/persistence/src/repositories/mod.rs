//! Repository implementations for database operations.

pub mod content_setting;
pub mod email_recipient;
pub mod event;
pub mod media_asset;
pub mod membership;
pub mod news_post;
pub mod page;
pub mod password_reset;
pub mod site_route;
pub mod user;

pub use content_setting::ContentSettingRepository;
pub use email_recipient::EmailRecipientRepository;
pub use event::{EventChanges, EventRepository, NewEvent};
pub use media_asset::{MediaAssetRepository, NewMediaAsset};
pub use membership::MembershipRepository;
pub use news_post::{NewNewsPost, NewsChanges, NewsFilter, NewsRepository};
pub use page::{NewPage, PageChanges, PageRepository, SectionChanges};
pub use password_reset::PasswordResetRepository;
pub use site_route::SiteRouteRepository;
pub use user::{NewSession, UserChanges, UserRepository};
