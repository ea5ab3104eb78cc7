//! Notification module.
//!
//! Sends an email about every new registration to a small set of recipient
//! classes. Each recipient is tried against an ordered chain of email
//! providers (Mailgun first, SendGrid as fallback) and gets its own
//! [`NotificationOutcome`]. Delivery problems are reported as data and never
//! abort the registration.
//!
//! # Example
//!
//! ```ignore
//! use rust_regmail::notification::NotificationDispatcher;
//!
//! let dispatcher = NotificationDispatcher::from_config(
//!     config.mailgun.clone(),
//!     config.sendgrid.clone(),
//!     &config.recipients,
//! );
//! let outcomes = dispatcher.dispatch(&registration).await;
//! ```

pub mod dispatcher;
pub mod message;
pub mod providers;
pub mod recipients;

#[cfg(test)]
pub(crate) mod test_support;

pub use dispatcher::{NotificationDispatcher, NotificationOutcome, NotificationOutcomes};
pub use message::NotificationMessage;
pub use providers::{DeliveryReport, EmailProvider};
pub use recipients::{Inclusion, RecipientClass, RecipientPolicy};
