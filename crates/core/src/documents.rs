//! Document (PDF) acceptance rules and storage path generation.
//!
//! Uploaded files are stored under `pdf/<millis>_<name>`. The millisecond
//! prefix makes paths collision-resistant for the upload rates this system
//! sees; the storage path is also the join key between object storage,
//! the `documents` table, and the `queries` table.

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// The only content type accepted for uploads.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Folder (key prefix) inside the bucket that holds documents.
pub const DOCUMENT_PREFIX: &str = "pdf";

/// File suffix used to filter bucket listings.
pub const PDF_SUFFIX: &str = ".pdf";

/// Name used when the client sends a file part without a usable name.
const FALLBACK_FILE_NAME: &str = "document.pdf";

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Reject anything that is not declared as `application/pdf`.
///
/// Parameters such as `; charset=binary` are ignored.
pub fn validate_pdf_content_type(content_type: Option<&str>) -> Result<(), CoreError> {
    let essence = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase());

    match essence.as_deref() {
        Some(PDF_CONTENT_TYPE) => Ok(()),
        Some(other) => Err(CoreError::UnsupportedMediaType(format!(
            "Only PDF allowed, got '{other}'"
        ))),
        None => Err(CoreError::UnsupportedMediaType(
            "Only PDF allowed, no content type given".into(),
        )),
    }
}

/// Validate a client-supplied object path before it reaches a storage backend.
///
/// Paths must be relative, non-empty and free of `.`/`..` segments.
pub fn validate_object_path(path: &str) -> Result<(), CoreError> {
    if path.is_empty() || path.starts_with('/') || path.contains('\\') {
        return Err(CoreError::Validation(format!("Invalid document path '{path}'")));
    }
    if path
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(CoreError::Validation(format!("Invalid document path '{path}'")));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Naming
// ---------------------------------------------------------------------------

/// Reduce a client file name to a safe final path segment.
///
/// Directory components are dropped and characters outside
/// `[A-Za-z0-9._-]` become `_`.
pub fn sanitize_file_name(file_name: &str) -> String {
    let last = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let cleaned: String = last
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.trim_matches('.').is_empty() {
        FALLBACK_FILE_NAME.to_string()
    } else {
        cleaned
    }
}

/// Build the storage path for an upload: `pdf/<millis>_<sanitized name>`.
pub fn storage_path_for(file_name: &str, uploaded_at: Timestamp) -> String {
    format!(
        "{DOCUMENT_PREFIX}/{}_{}",
        uploaded_at.timestamp_millis(),
        sanitize_file_name(file_name)
    )
}

/// Whether a bucket entry name should appear in the document listing.
pub fn is_listed_document(name: &str) -> bool {
    name.ends_with(PDF_SUFFIX)
}

/// API path a client follows to obtain a signed URL for `key`.
pub fn display_url_for(key: &str) -> String {
    format!("/api/pdf/{key}")
}

/// Display name of a stored object: its final path segment.
pub fn display_name_for(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn pdf_content_type_accepted() {
        assert!(validate_pdf_content_type(Some("application/pdf")).is_ok());
        assert!(validate_pdf_content_type(Some("Application/PDF; charset=binary")).is_ok());
    }

    #[test]
    fn non_pdf_content_type_rejected() {
        assert_matches!(
            validate_pdf_content_type(Some("image/png")),
            Err(CoreError::UnsupportedMediaType(_))
        );
        assert_matches!(
            validate_pdf_content_type(None),
            Err(CoreError::UnsupportedMediaType(_))
        );
    }

    #[test]
    fn sanitize_strips_directories_and_odd_characters() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\me\\notes 1.pdf"), "notes_1.pdf");
        assert_eq!(sanitize_file_name("report.pdf"), "report.pdf");
        assert_eq!(sanitize_file_name(".."), "document.pdf");
        assert_eq!(sanitize_file_name(""), "document.pdf");
    }

    #[test]
    fn storage_path_is_timestamp_prefixed() {
        let at = chrono::Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(
            storage_path_for("report.pdf", at),
            "pdf/1700000000123_report.pdf"
        );
    }

    #[test]
    fn listing_filters_on_pdf_suffix() {
        assert!(is_listed_document("1_report.pdf"));
        assert!(!is_listed_document("1_report.docx"));
        assert!(!is_listed_document(".emptyFolderPlaceholder"));
    }

    #[test]
    fn object_path_validation() {
        assert!(validate_object_path("pdf/1_report.pdf").is_ok());
        assert!(validate_object_path("").is_err());
        assert!(validate_object_path("/pdf/x.pdf").is_err());
        assert!(validate_object_path("pdf/../secret").is_err());
        assert!(validate_object_path("pdf//x.pdf").is_err());
    }

    #[test]
    fn display_helpers() {
        assert_eq!(display_url_for("pdf/1_a.pdf"), "/api/pdf/pdf/1_a.pdf");
        assert_eq!(display_name_for("pdf/1_a.pdf"), "1_a.pdf");
        assert_eq!(display_name_for("plain.pdf"), "plain.pdf");
    }
}
