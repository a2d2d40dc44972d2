pub mod auth;
pub mod documents;
pub mod push;
pub mod queries;
