//! Orders resolved fragments into the final document body.

use std::collections::BTreeMap;

use super::{AssemblyError, DocumentMetadata, FragmentMap};
use crate::{
    capture::DocumentId,
    fragment::{DecodedFragment, FragmentId},
};

/// Reassembled document ready for rendering.
#[derive(Clone, Debug, PartialEq)]
pub struct AssembledDocument {
    asin: DocumentId,
    metadata: DocumentMetadata,
    body: Vec<String>,
    skeletons: Vec<String>,
}

impl AssembledDocument {
    /// Document identifier.
    #[must_use]
    pub fn asin(&self) -> &DocumentId { &self.asin }

    /// Title, authors and cover.
    #[must_use]
    pub fn metadata(&self) -> &DocumentMetadata { &self.metadata }

    /// Resolved fragment texts in document order.
    #[must_use]
    pub fn body(&self) -> &[String] { &self.body }

    /// Decoded layout skeletons in identifier order.
    #[must_use]
    pub fn skeletons(&self) -> &[String] { &self.skeletons }
}

/// Applies the fragment map to the set of resolved fragments.
#[derive(Clone, Copy, Debug)]
pub struct DocumentAssembler {
    map: FragmentMap,
}

impl DocumentAssembler {
    /// Create an assembler for the declared fragment map.
    #[must_use]
    pub const fn new(map: FragmentMap) -> Self { Self { map } }

    /// Number of fragments the body will contain.
    ///
    /// The declared count is trusted except for its last slot: when the
    /// fragment at `N - 1` is absent the count drops by exactly one.
    #[must_use]
    pub fn effective_count(&self, fragments: &BTreeMap<FragmentId, DecodedFragment>) -> u32 {
        let declared = self.map.total_fragment_count;
        match declared.checked_sub(1) {
            Some(last) if !fragments.contains_key(&FragmentId::new(last)) => last,
            _ => declared,
        }
    }

    /// Build the document body.
    ///
    /// Fragments beyond the effective count are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::MissingFragment`] naming the lowest absent id
    /// within the effective range, or [`AssemblyError::Unresolved`] if a
    /// fragment was never resolved.
    pub fn assemble(
        &self,
        asin: DocumentId,
        metadata: DocumentMetadata,
        fragments: &BTreeMap<FragmentId, DecodedFragment>,
        skeletons: Vec<String>,
    ) -> Result<AssembledDocument, AssemblyError> {
        let effective = self.effective_count(fragments);
        let body = (0..effective)
            .map(FragmentId::new)
            .map(|id| {
                let fragment = fragments.get(&id).ok_or(AssemblyError::MissingFragment { id })?;
                fragment
                    .resolved()
                    .map(str::to_owned)
                    .ok_or(AssemblyError::Unresolved { id })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(AssembledDocument {
            asin,
            metadata,
            body,
            skeletons,
        })
    }
}
