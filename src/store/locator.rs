//! Concurrent, order-stable probing of candidate record stores.

use futures::future::join_all;
use log::{debug, warn};
use tracing::info;

use super::{
    FragmentSource,
    FragmentsTableSource,
    LegacyInfoSource,
    RecordStore,
    StoreCatalog,
    StoreError,
};
use crate::{
    capture::DocumentId,
    config::ReassemblyConfig,
    document::DocumentInfo,
    error::{Error, Result},
    fragment::RawFragment,
    metrics::{self, ProbeOutcome},
};

/// Per-variant probe results.
#[derive(Clone, Debug, PartialEq)]
pub struct LocatedStores {
    /// Name of the store supplying document info, and the info itself.
    pub info: (String, DocumentInfo),
    /// Name of the store supplying fragment rows, if any did.
    pub fragments: Option<(String, Vec<RawFragment>)>,
}

/// Finds the stores holding a document.
#[derive(Clone, Debug)]
pub struct FragmentStoreLocator {
    info: LegacyInfoSource,
    fragments: FragmentsTableSource,
}

impl FragmentStoreLocator {
    /// Create a locator probing the tables named in `config`.
    #[must_use]
    pub fn new(config: &ReassemblyConfig) -> Self {
        Self {
            info: LegacyInfoSource::new(config),
            fragments: FragmentsTableSource::new(config),
        }
    }

    /// Probe every candidate in `catalog` for both schema variants.
    ///
    /// Candidates are opened and queried concurrently; for each variant the
    /// earliest candidate in catalog order that matches wins, however the
    /// probes interleave. A candidate that fails to open or answer counts as
    /// no match.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if the catalog cannot list its candidates and
    /// [`Error::DocumentInfoNotFound`] if no candidate holds document info.
    pub async fn locate(
        &self,
        catalog: &dyn StoreCatalog,
        asin: &DocumentId,
    ) -> Result<LocatedStores> {
        let names = catalog.candidates().await?;
        let opened = join_all(names.iter().map(|name| catalog.open(name))).await;
        let stores: Vec<Box<dyn RecordStore>> = names
            .iter()
            .zip(opened)
            .filter_map(|(name, store)| match store {
                Ok(store) => Some(store),
                Err(err) => {
                    warn!("skipping record store `{name}`: {err}");
                    metrics::inc_store_probes(ProbeOutcome::Failed);
                    None
                }
            })
            .collect();
        info!(candidates = names.len(), opened = stores.len(), "probing record stores");

        let (info, fragments) = futures::join!(
            probe(&stores, &self.info, asin),
            probe(&stores, &self.fragments, asin),
        );
        let info = info.ok_or_else(|| Error::DocumentInfoNotFound { asin: asin.clone() })?;
        if fragments.is_none() {
            debug!("no record store holds fragment rows for {asin}");
        }
        Ok(LocatedStores { info, fragments })
    }
}

/// First match for `source` in candidate order.
async fn probe<S: FragmentSource>(
    stores: &[Box<dyn RecordStore>],
    source: &S,
    asin: &DocumentId,
) -> Option<(String, S::Output)> {
    let results = join_all(stores.iter().map(|store| probe_one(store.as_ref(), source, asin))).await;
    stores
        .iter()
        .zip(results)
        .find_map(|(store, found)| found.map(|output| (store.name().to_owned(), output)))
}

async fn probe_one<S: FragmentSource>(
    store: &dyn RecordStore,
    source: &S,
    asin: &DocumentId,
) -> Option<S::Output> {
    let outcome: std::result::Result<Option<S::Output>, StoreError> = async {
        if !store.has_table(source.table()).await? {
            return Ok(None);
        }
        source.fetch(store, asin).await
    }
    .await;
    match outcome {
        Ok(Some(output)) => {
            debug!("record store `{}` holds {} for {asin}", store.name(), source.label());
            metrics::inc_store_probes(ProbeOutcome::Matched);
            Some(output)
        }
        Ok(None) => {
            metrics::inc_store_probes(ProbeOutcome::Empty);
            None
        }
        Err(err) => {
            warn!(
                "probing record store `{}` for {} failed: {err}",
                store.name(),
                source.label()
            );
            metrics::inc_store_probes(ProbeOutcome::Failed);
            None
        }
    }
}
