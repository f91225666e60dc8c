//! Error types emitted while decoding fragments.
//!
//! Any decode failure aborts the run: a document with a garbled fragment is
//! worse than no document.

use derive_more::Display;
use thiserror::Error;

use super::FragmentId;
use crate::capability::CapabilityFault;

/// Decode step that failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum DecodeStep {
    /// Payload decryption.
    #[display("decrypt")]
    Decrypt,
    /// Payload decompression.
    #[display("decompress")]
    Decompress,
}

/// Errors produced by [`FragmentDecoder`](crate::fragment::FragmentDecoder).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The fragment is encrypted but the capture carried no key.
    #[error("fragment {id} is encrypted but no decryption key was captured")]
    MissingKey {
        /// Fragment that could not be decrypted.
        id: FragmentId,
    },
    /// The fragment is compressed but the metadata carried no dictionary seed.
    #[error("fragment {id} is compressed but the document has no compression dictionary")]
    MissingDictionary {
        /// Fragment that could not be decompressed.
        id: FragmentId,
    },
    /// A capability failed on the fragment payload.
    #[error("failed to {step} fragment {id}: {fault}")]
    Capability {
        /// Fragment being decoded.
        id: FragmentId,
        /// Step that failed.
        step: DecodeStep,
        /// Fault reported by the capability.
        #[source]
        fault: CapabilityFault,
    },
}

impl DecodeError {
    /// Identifier of the fragment that failed to decode.
    #[must_use]
    pub const fn fragment_id(&self) -> FragmentId {
        match self {
            Self::MissingKey { id } | Self::MissingDictionary { id } | Self::Capability { id, .. } => {
                *id
            }
        }
    }
}
