//! Domain rules for Cheddit that carry no I/O.
//!
//! - [`error`] -- the shared error taxonomy.
//! - [`types`] -- id and timestamp aliases.
//! - [`documents`] -- PDF acceptance and storage path generation.
//! - [`queries`] -- question/answer validation and answer authorization.
//! - [`push`] -- push subscription validation and the notification payload.

pub mod documents;
pub mod error;
pub mod push;
pub mod queries;
pub mod types;
