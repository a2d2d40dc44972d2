//! Question/answer rules for the per-document Q&A thread.

use crate::error::CoreError;
use crate::types::DbId;

/// Identity of the user attempting to answer a query.
#[derive(Debug, Clone, Copy)]
pub struct Answerer {
    pub user_id: DbId,
    pub is_faculty: bool,
}

/// Reject empty (or whitespace-only) question text.
pub fn validate_question(question: &str, document_path: &str) -> Result<(), CoreError> {
    if question.trim().is_empty() || document_path.trim().is_empty() {
        return Err(CoreError::Validation("Missing data".into()));
    }
    Ok(())
}

/// Reject empty (or whitespace-only) answer text.
pub fn validate_answer(answer: &str) -> Result<(), CoreError> {
    if answer.trim().is_empty() {
        return Err(CoreError::Validation("Missing data".into()));
    }
    Ok(())
}

/// Only the document owner may answer, and only from a faculty session.
///
/// `document_owner_id` is the owner copied onto the query when it was asked,
/// so no document lookup is needed here.
pub fn authorize_answer(answerer: Answerer, document_owner_id: DbId) -> Result<(), CoreError> {
    if answerer.user_id != document_owner_id {
        return Err(CoreError::Forbidden(
            "Only the document owner may answer this query".into(),
        ));
    }
    if !answerer.is_faculty {
        return Err(CoreError::Forbidden(
            "Only faculty may answer queries".into(),
        ));
    }
    Ok(())
}
