//! Duplicate-aware reconciliation of captured exchanges.
//!
//! The browser may record the same resource several times. Identical copies
//! collapse into one entry; copies that disagree are dropped entirely since
//! either one may belong to a different session.

use std::collections::{BTreeMap, BTreeSet, btree_map::Entry};

use log::debug;

use super::{CaptureError, CaptureIndex, CaptureLog, DocumentId, Observation};
use crate::config::ReassemblyConfig;

/// Builds a [`CaptureIndex`] from a raw [`CaptureLog`].
#[derive(Clone, Copy, Debug)]
pub struct CaptureReconciler<'a> {
    config: &'a ReassemblyConfig,
}

impl<'a> CaptureReconciler<'a> {
    /// Create a reconciler using the host and tag conventions in `config`.
    #[must_use]
    pub const fn new(config: &'a ReassemblyConfig) -> Self { Self { config } }

    /// Validate the capture and reconcile its observations.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::PageLoads`] unless exactly one page load is
    /// present, [`CaptureError::UnexpectedPage`] when that page is not on the
    /// expected host, and [`CaptureError::ConflictingDocumentId`] or
    /// [`CaptureError::MissingDocumentId`] when the document identifier is
    /// ambiguous or absent.
    pub fn reconcile(&self, log: &CaptureLog) -> Result<CaptureIndex, CaptureError> {
        let [page] = log.pages.as_slice() else {
            return Err(CaptureError::PageLoads {
                found: log.pages.len(),
            });
        };
        if !page.title.contains(&self.config.expected_host) {
            return Err(CaptureError::UnexpectedPage {
                title: page.title.clone(),
                expected: self.config.expected_host.clone(),
            });
        }

        let document_id = self.document_id(&log.observations)?;
        let entries = reconcile_entries(&log.observations);
        Ok(CaptureIndex::new(document_id, entries))
    }

    fn document_id(&self, observations: &[Observation]) -> Result<DocumentId, CaptureError> {
        let tag = self.config.document_tag.as_str();
        let mut found: Option<DocumentId> = None;
        for value in observations.iter().filter_map(|obs| obs.tag(tag)) {
            match &found {
                None => found = Some(DocumentId::from(value)),
                Some(first) if first.as_str() == value => {}
                Some(first) => {
                    return Err(CaptureError::ConflictingDocumentId {
                        first: first.clone(),
                        second: DocumentId::from(value),
                    });
                }
            }
        }
        found.ok_or_else(|| CaptureError::MissingDocumentId {
            tag: tag.to_owned(),
        })
    }
}

/// Collapse observations into a conflict-free identifier → content mapping.
///
/// Observations with an empty identifier or without content are skipped.
#[must_use]
pub fn reconcile_entries(observations: &[Observation]) -> BTreeMap<String, String> {
    let mut entries = BTreeMap::new();
    let mut conflicting = BTreeSet::new();

    for obs in observations {
        let Some(content) = obs.content().filter(|c| !c.is_empty()) else {
            continue;
        };
        if obs.identifier().is_empty() {
            continue;
        }
        match entries.entry(obs.identifier().to_owned()) {
            Entry::Vacant(vacant) => {
                vacant.insert(content.to_owned());
            }
            Entry::Occupied(occupied) => {
                if occupied.get() != content {
                    conflicting.insert(occupied.key().clone());
                }
            }
        }
    }

    for identifier in &conflicting {
        debug!("dropping `{identifier}`: captured with divergent content");
        entries.remove(identifier);
    }
    entries
}
