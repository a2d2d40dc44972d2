//! Session extractors.
//!
//! Every protected handler takes identity through one of these, so there is a
//! single place where tokens are read and verified.
//!
//! - [`auth::AuthUser`] -- requires a valid session (401 otherwise).
//! - [`auth::MaybeAuthUser`] -- never fails; `None` without a valid session.
//! - [`rbac::RequireFaculty`] -- requires a valid faculty session (403 for students).

pub mod auth;
pub mod rbac;
