//! Errors raised while resolving references and assembling the document.

use thiserror::Error;

use crate::fragment::FragmentId;

/// Errors produced by [`ReferenceResolver`](super::ReferenceResolver).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// A fragment references an asset that no source supplied.
    #[error("fragment {fragment} references unknown asset `{asset}`")]
    UnresolvedAsset {
        /// Fragment containing the placeholder.
        fragment: FragmentId,
        /// Asset name in the placeholder.
        asset: String,
    },
}

/// Errors produced by [`DocumentAssembler`](super::DocumentAssembler).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AssemblyError {
    /// A fragment inside the effective range is absent.
    #[error("fragment {id} is missing from the document")]
    MissingFragment {
        /// Lowest missing fragment identifier.
        id: FragmentId,
    },
    /// A fragment reached assembly without being resolved.
    #[error("fragment {id} was not resolved before assembly")]
    Unresolved {
        /// Fragment lacking resolved text.
        id: FragmentId,
    },
}
