//! Producer document classification
//!
//! Producers are identified by a tax document. The check is length based:
//! 11 characters is a short-form (individual) identifier, 14 characters is a
//! long-form (organization) identifier. Checksums are not verified.

use crate::error::DomainError;

/// Length of a short-form (individual) identifier
pub const SHORT_FORM_LEN: usize = 11;

/// Length of a long-form (organization) identifier
pub const LONG_FORM_LEN: usize = 14;

/// Message returned whenever a document fails classification
pub const INVALID_DOCUMENT_MESSAGE: &str =
    "invalid document: must be a valid short-form or long-form identifier";

/// Kind of a valid producer document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// 11-character individual identifier
    ShortForm,
    /// 14-character organization identifier
    LongForm,
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKind::ShortForm => write!(f, "short-form"),
            DocumentKind::LongForm => write!(f, "long-form"),
        }
    }
}

/// Classify a document, returning `None` when it is invalid
pub fn classify(document: &str) -> Option<DocumentKind> {
    match document.chars().count() {
        SHORT_FORM_LEN => Some(DocumentKind::ShortForm),
        LONG_FORM_LEN => Some(DocumentKind::LongForm),
        _ => None,
    }
}

/// Classify a document, failing with a validation error when it is invalid
pub fn validate_document(document: &str) -> Result<DocumentKind, DomainError> {
    classify(document).ok_or_else(|| DomainError::Validation(INVALID_DOCUMENT_MESSAGE.to_string()))
}
