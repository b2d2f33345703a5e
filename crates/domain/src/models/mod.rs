//! Domain models for the CMS.

pub mod auth;
pub mod common;
pub mod contact;
pub mod content_setting;
pub mod email_recipient;
pub mod event;
pub mod media_asset;
pub mod membership_application;
pub mod news_post;
pub mod page;
pub mod password_reset;
pub mod payment;
pub mod site_route;
pub mod user;

pub use common::SuccessResponse;
pub use email_recipient::{EmailRecipient, RecipientType};
pub use event::{Event, EventStatus};
pub use media_asset::MediaAsset;
pub use membership_application::{MembershipApplication, MembershipStatus};
pub use news_post::{NewsPost, NewsStatus};
pub use page::{Page, PageSection, PageStatus};
pub use site_route::SiteRoute;
pub use user::{User, UserRole};
