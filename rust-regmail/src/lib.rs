//! rust-regmail library crate.
//!
//! Registration intake: validate a submitted form, persist it, and notify the
//! configured recipients through an email provider fallback chain.

pub mod api;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod notification;
pub mod registration;
pub mod services;
pub mod utils;

pub use error::{Error, Result};
