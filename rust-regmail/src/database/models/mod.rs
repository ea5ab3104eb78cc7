//! Database models for rust-regmail.
//!
//! These models map directly to the database schema.

pub mod registration;

pub use registration::*;
