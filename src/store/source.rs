//! Schema variants a record store may expose.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;

use super::{FragmentRow, RecordStore, StoreError};
use crate::{
    capture::DocumentId,
    config::ReassemblyConfig,
    document::{DocumentInfo, DocumentMetadata, FragmentMap},
    fragment::{FragmentId, RawFragment, record::MetadataJson},
};

/// One schema variant, probed independently on every candidate store.
#[async_trait]
pub trait FragmentSource: Send + Sync {
    /// Data produced by a matching store.
    type Output: Send;

    /// Short label used in logs.
    fn label(&self) -> &'static str;

    /// Schema object the store must contain.
    fn table(&self) -> &str;

    /// Read the record for `asin`; `Ok(None)` when the store has none.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the query fails or the record is
    /// malformed.
    async fn fetch(
        &self,
        store: &dyn RecordStore,
        asin: &DocumentId,
    ) -> Result<Option<Self::Output>, StoreError>;
}

/// The `bookinfo(asin, metadata, fragmap)` variant.
#[derive(Clone, Debug)]
pub struct LegacyInfoSource {
    table: String,
}

impl LegacyInfoSource {
    /// Probe the configured info table.
    #[must_use]
    pub fn new(config: &ReassemblyConfig) -> Self {
        Self {
            table: config.info_table.clone(),
        }
    }
}

#[async_trait]
impl FragmentSource for LegacyInfoSource {
    type Output = DocumentInfo;

    fn label(&self) -> &'static str { "document info" }

    fn table(&self) -> &str { &self.table }

    async fn fetch(
        &self,
        store: &dyn RecordStore,
        asin: &DocumentId,
    ) -> Result<Option<DocumentInfo>, StoreError> {
        let Some(row) = store.info_row(&self.table, asin).await? else {
            return Ok(None);
        };
        let metadata = DocumentMetadata::from_json(&row.metadata)
            .map_err(StoreError::malformed(store.name(), "metadata"))?;
        let fragment_map = FragmentMap::from_json(&row.fragment_map)
            .map_err(StoreError::malformed(store.name(), "fragmap"))?;
        Ok(Some(DocumentInfo {
            metadata,
            fragment_map,
        }))
    }
}

/// The `fragments(asin, id, data, metadata, auxiliary)` variant.
#[derive(Clone, Debug)]
pub struct FragmentsTableSource {
    table: String,
}

impl FragmentsTableSource {
    /// Probe the configured fragments table.
    #[must_use]
    pub fn new(config: &ReassemblyConfig) -> Self {
        Self {
            table: config.fragments_table.clone(),
        }
    }
}

#[derive(Default, Deserialize)]
struct Auxiliary {
    #[serde(default, rename = "imageData")]
    image_data: Option<BTreeMap<String, Option<String>>>,
}

fn parse_row(store: &str, row: FragmentRow) -> Result<RawFragment, StoreError> {
    let id = FragmentId::try_from(row.id).map_err(|_| StoreError::InvalidFragmentId {
        store: store.to_owned(),
        id: row.id,
    })?;
    let metadata = match row.metadata.as_deref() {
        Some(text) => serde_json::from_str::<MetadataJson>(text)
            .map_err(StoreError::malformed(store, "metadata"))?,
        None => MetadataJson::default(),
    };
    let auxiliary = match row.auxiliary.as_deref() {
        Some(text) => serde_json::from_str::<Auxiliary>(text)
            .map_err(StoreError::malformed(store, "auxiliary"))?,
        None => Auxiliary::default(),
    };
    Ok(RawFragment {
        metadata: metadata.with_id(id),
        payload: row.data,
        assets: auxiliary.image_data.unwrap_or_default(),
    })
}

#[async_trait]
impl FragmentSource for FragmentsTableSource {
    type Output = Vec<RawFragment>;

    fn label(&self) -> &'static str { "fragments" }

    fn table(&self) -> &str { &self.table }

    async fn fetch(
        &self,
        store: &dyn RecordStore,
        asin: &DocumentId,
    ) -> Result<Option<Vec<RawFragment>>, StoreError> {
        let rows = store.fragment_rows(&self.table, asin).await?;
        if rows.is_empty() {
            return Ok(None);
        }
        rows.into_iter()
            .map(|row| parse_row(store.name(), row))
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }
}
