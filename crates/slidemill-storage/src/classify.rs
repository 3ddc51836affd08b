//! Upload-error classification.
//!
//! The retry controller needs to distinguish size rejections, name
//! collisions, and everything else from opaque backend error text. The
//! matching rules below are load-bearing: the recompression loop only runs
//! for messages classified as [`UploadErrorKind::TooLarge`].

use slidemill_core::UploadErrorKind;

const TOO_LARGE_PHRASES: &[&str] = &[
    "file too large",
    "payload too large",
    "entity too large",
    "exceeds maximum",
    "file size limit",
    "request entity too large",
    "413",
];

const TRANSIENT_PHRASES: &[&str] = &[
    "server disconnected",
    "connection",
    "timeout",
    "network",
    "broken pipe",
];

/// Classify a raw backend error message.
///
/// Duplicate takes precedence: a message mentioning both `409` and
/// `duplicate` is a name collision even if it also matches a size phrase.
/// A bare `409` without `duplicate` is neither a collision nor a size
/// rejection.
pub fn classify(message: &str) -> UploadErrorKind {
    let message = message.to_lowercase();
    if message.contains("duplicate") && message.contains("409") {
        return UploadErrorKind::Duplicate;
    }
    if message.contains("duplicate") || message.contains("409") {
        return UploadErrorKind::Other;
    }
    if TOO_LARGE_PHRASES
        .iter()
        .any(|phrase| message.contains(phrase))
    {
        return UploadErrorKind::TooLarge;
    }
    UploadErrorKind::Other
}

/// Whether an error message indicates a transient network-class failure
/// worth retrying at the upload-primitive level.
pub fn is_transient(message: &str) -> bool {
    let message = message.to_lowercase();
    TRANSIENT_PHRASES
        .iter()
        .any(|phrase| message.contains(phrase))
}
