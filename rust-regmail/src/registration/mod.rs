//! Registration intake.
//!
//! A submission goes through `Received -> Validated -> Persisted -> Notified
//! -> Reported`, or ends in `Rejected` when validation fails. Only
//! validation and persistence failures abort; notification problems are
//! folded into the report.

pub mod service;
pub mod submission;

pub use service::{RegistrationReport, RegistrationService, SubmissionStage};
pub use submission::RegistrationSubmission;
