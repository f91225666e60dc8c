//! Canonical error and result types for the crate.
//!
//! Each pipeline stage has its own error enum; [`Error`] is the single surface
//! returned by the engine and the command-line front end. Every variant is
//! fatal for the run.

use thiserror::Error;

use crate::{
    capability::CapabilityError,
    capture::{CaptureError, DocumentId},
    document::{AssemblyError, ResolveError},
    fragment::DecodeError,
    store::StoreError,
};

/// Top-level error type exposed by `folio`.
#[derive(Debug, Error)]
pub enum Error {
    /// The capture is ambiguous or malformed.
    #[error(transparent)]
    Capture(#[from] CaptureError),
    /// The decode capabilities could not be resolved.
    #[error(transparent)]
    Capability(#[from] CapabilityError),
    /// The record store catalog could not be listed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// No record store holds document info for the document.
    #[error("no record store holds document info for {asin}")]
    DocumentInfoNotFound {
        /// Document being reassembled.
        asin: DocumentId,
    },
    /// The compression dictionary could not be built.
    #[error("failed to build the compression dictionary: {0}")]
    Dictionary(#[source] crate::capability::CapabilityFault),
    /// A fragment failed to decode.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// A fragment references an unknown asset.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    /// The fragment set has a gap.
    #[error(transparent)]
    Assembly(#[from] AssemblyError),
    /// Reading the capture or writing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Canonical result alias used by `folio` public APIs.
pub type Result<T> = std::result::Result<T, Error>;
