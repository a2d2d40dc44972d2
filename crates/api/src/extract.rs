//! Request extractors whose rejections render as [`AppError`] JSON.
//!
//! axum's own `Json` and `Query` reject with plain-text bodies; handlers use
//! these wrappers so a malformed body or query string still yields
//! `{ "error": ..., "code": "BAD_REQUEST" }`.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// Deserialized query string.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct QueryParams<T>(pub T);
