//! Application services: authentication, outgoing email, notifications and
//! payments.

pub mod auth;
pub mod email;
pub mod notifications;
pub mod pesapal;
pub mod retention;

pub use auth::{AuthError, AuthService};
pub use email::{EmailError, EmailMessage, EmailService};
pub use pesapal::{PesapalError, PesapalService};
