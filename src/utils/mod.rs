//! Shared utilities.
//!
//! - [`email`]: outbound mail delivery ([`email::Mailer`] and its SMTP implementation)

pub mod email;
