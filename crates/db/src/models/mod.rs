//! Row structs and DTOs.
//!
//! Each submodule contains a `FromRow` entity struct matching the table and a
//! create DTO for inserts. Rows are immutable after creation except where a
//! repository says otherwise (query answers, push subscriptions).

pub mod document;
pub mod push_subscription;
pub mod query;
pub mod user;
