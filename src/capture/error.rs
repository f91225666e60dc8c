//! Errors raised while reconciling a capture log.
//!
//! Every variant means the capture cannot be trusted to describe a single
//! reading session, so the run stops before any store is probed.

use thiserror::Error;

use super::DocumentId;

/// Errors produced by [`CaptureReconciler`](super::CaptureReconciler) and the
/// HAR adapter.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The capture holds zero or several page loads.
    #[error("expected exactly one page load in the capture, found {found}")]
    PageLoads {
        /// Number of page-load contexts present.
        found: usize,
    },
    /// The single page load does not belong to the expected host.
    #[error("captured page `{title}` does not match expected host `{expected}`")]
    UnexpectedPage {
        /// Title of the captured page.
        title: String,
        /// Host pattern the title had to contain.
        expected: String,
    },
    /// Two requests carry different document identifiers.
    #[error("capture mixes documents `{first}` and `{second}`")]
    ConflictingDocumentId {
        /// Identifier seen first.
        first: DocumentId,
        /// Conflicting identifier seen later.
        second: DocumentId,
    },
    /// No request carries the document identifier tag.
    #[error("no captured request carries the `{tag}` parameter")]
    MissingDocumentId {
        /// Query parameter that was searched for.
        tag: String,
    },
    /// The capture log is not valid HAR JSON.
    #[error("malformed capture log: {0}")]
    Malformed(#[from] serde_json::Error),
}
