//! End-to-end reassembly pipeline.
//!
//! [`ReassemblyEngine::prepare`] runs every capture-only check eagerly:
//! reconciliation, vendor source extraction and capability resolution. Only a
//! prepared engine touches the record stores, so an ambiguous capture never
//! reaches store probing.

use std::collections::BTreeMap;

use tracing::{Instrument, debug, info, info_span};

use crate::{
    capability::{
        Capabilities,
        CapabilityResolver,
        CompressionDictionary,
        DecryptionKey,
        VendorSource,
    },
    capture::{CaptureIndex, CaptureLog, CaptureReconciler, DocumentId},
    config::ReassemblyConfig,
    document::{AssembledDocument, DocumentAssembler, DocumentMetadata, ReferenceResolver},
    error::{Error, Result},
    fragment::{AssetMap, CaptureRecords, DecodedFragment, FragmentDecoder, FragmentId, RawFragment},
    store::{FragmentStoreLocator, StoreCatalog},
};

/// Output of a successful run.
#[derive(Clone, Debug, PartialEq)]
pub struct Reassembly {
    /// The assembled document.
    pub document: AssembledDocument,
    /// Every asset collected while decoding.
    pub assets: AssetMap,
    /// Store that supplied the document info.
    pub info_store: String,
    /// Store that supplied fragment rows, if any.
    pub fragment_store: Option<String>,
}

/// Reassembles one captured document.
#[derive(Debug)]
pub struct ReassemblyEngine {
    config: ReassemblyConfig,
    capture: CaptureIndex,
    capabilities: Capabilities,
    key: Option<DecryptionKey>,
}

impl ReassemblyEngine {
    /// Validate `log` and resolve the decode capabilities it carries.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Capture`] for an ambiguous capture and
    /// [`Error::Capability`] when a capability cannot be extracted or loaded.
    pub fn prepare(
        config: ReassemblyConfig,
        log: &CaptureLog,
        resolver: &dyn CapabilityResolver,
    ) -> Result<Self> {
        let capture = CaptureReconciler::new(&config).reconcile(log)?;
        info!(asin = %capture.document_id(), entries = capture.len(), "capture reconciled");
        let source = VendorSource::extract(&capture, &config)?;
        let capabilities = resolver.resolve(&source)?;
        debug!("decode capabilities resolved");
        Ok(Self::new(config, capture, capabilities))
    }

    /// Build an engine from an already reconciled capture.
    #[must_use]
    pub fn new(config: ReassemblyConfig, capture: CaptureIndex, capabilities: Capabilities) -> Self {
        let key = DecryptionKey::from_capture(&capture, &config);
        if key.is_none() {
            debug!("capture carries no decryption key");
        }
        Self {
            config,
            capture,
            capabilities,
            key,
        }
    }

    /// Identifier of the captured document.
    #[must_use]
    pub fn document_id(&self) -> &DocumentId { self.capture.document_id() }

    /// Decryption key found in the capture.
    #[must_use]
    pub fn key(&self) -> Option<&DecryptionKey> { self.key.as_ref() }

    /// Locate, decode, resolve and assemble the document.
    ///
    /// Store fragments replace capture fragments with the same id. Every
    /// fragment is decoded before any is resolved, so asset references may
    /// point at assets carried by later fragments.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error of any stage.
    pub async fn reassemble(&self, catalog: &dyn StoreCatalog) -> Result<Reassembly> {
        let span = info_span!("reassemble", asin = %self.document_id());
        self.run(catalog).instrument(span).await
    }

    async fn run(&self, catalog: &dyn StoreCatalog) -> Result<Reassembly> {
        let asin = self.document_id();
        let located = FragmentStoreLocator::new(&self.config)
            .locate(catalog, asin)
            .await?;
        let (info_store, info) = located.info;
        let dictionary = self.dictionary(&info.metadata)?;

        let records = CaptureRecords::from_capture(&self.capture, &self.config);
        let mut raw: BTreeMap<FragmentId, RawFragment> = records.fragments;
        let captured = raw.len();
        let fragment_store = located.fragments.map(|(name, fragments)| {
            raw.extend(fragments.into_iter().map(|fragment| (fragment.id(), fragment)));
            name
        });
        info!(
            captured,
            total = raw.len(),
            store = fragment_store.as_deref().unwrap_or("-"),
            "fragments collected"
        );

        let decoder = FragmentDecoder::new(&self.capabilities, self.key.as_ref(), dictionary.as_ref());
        let mut assets = AssetMap::new();
        let mut decoded = raw
            .values()
            .map(|fragment| Ok((fragment.id(), decoder.decode(fragment, &mut assets)?)))
            .collect::<Result<BTreeMap<FragmentId, DecodedFragment>>>()?;
        let skeletons = records
            .skeletons
            .values()
            .map(|skeleton| decoder.decode_skeleton(skeleton))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        info!(fragments = decoded.len(), assets = assets.len(), "fragments decoded");

        let resolver = ReferenceResolver::new(&self.config);
        for fragment in decoded.values_mut() {
            resolver.resolve_fragment(fragment, &assets)?;
        }

        let document = DocumentAssembler::new(info.fragment_map).assemble(
            asin.clone(),
            info.metadata,
            &decoded,
            skeletons,
        )?;
        info!(fragments = document.body().len(), "document assembled");
        Ok(Reassembly {
            document,
            assets,
            info_store,
            fragment_store,
        })
    }

    fn dictionary(&self, metadata: &DocumentMetadata) -> Result<Option<CompressionDictionary>> {
        metadata
            .seed
            .as_ref()
            .map(|seed| self.capabilities.dictionary_builder().build_dictionary(seed))
            .transpose()
            .map_err(Error::Dictionary)
    }
}
