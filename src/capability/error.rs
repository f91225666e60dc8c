//! Capability resolution errors and runtime faults.

use derive_more::Display;
use thiserror::Error;

/// The two vendor capability families extracted from the capture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum CapabilityKind {
    /// Dictionary construction and decompression.
    #[display("compression")]
    Compression,
    /// Payload decryption.
    #[display("decryption")]
    Decryption,
}

/// Failure raised by a capability while processing a payload.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct CapabilityFault(String);

impl CapabilityFault {
    /// Construct a fault from a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self { Self(message.into()) }

    /// Borrow the fault message.
    #[must_use]
    pub fn message(&self) -> &str { &self.0 }
}

/// Errors that prevent the decode capabilities from being resolved.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CapabilityError {
    /// No captured script contains the bracketed vendor region.
    #[error("no captured script contains the {capability} routine")]
    MissingSource {
        /// Capability whose source region was not found.
        capability: CapabilityKind,
    },
    /// The vendor region was found but could not be loaded.
    #[error("{capability} routine unavailable: {reason}")]
    Unavailable {
        /// Capability that failed to load.
        capability: CapabilityKind,
        /// Loader diagnostic.
        reason: String,
    },
}
