//! Repository layer for database access.
//!
//! Repositories hide SQL behind traits so services can be tested against
//! in-memory databases or hand-written fakes.

pub mod registration;

pub use registration::*;
