//! Structured record stores and the fragment store locator.
//!
//! A [`StoreCatalog`] lists candidate stores and opens them as
//! [`RecordStore`]s. Each [`FragmentSource`] knows one schema variant; the
//! [`FragmentStoreLocator`] probes every candidate for every variant and keeps
//! the first match in catalog order.

pub mod error;
pub mod locator;
pub mod source;
pub mod sqlite;

use async_trait::async_trait;

pub use error::StoreError;
pub use locator::{FragmentStoreLocator, LocatedStores};
pub use source::{FragmentSource, FragmentsTableSource, LegacyInfoSource};
pub use sqlite::{SqliteCatalog, SqliteStore};

use crate::capture::DocumentId;

/// Row of the document info table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InfoRow {
    /// Metadata JSON.
    pub metadata: String,
    /// Fragment map JSON.
    pub fragment_map: String,
}

/// Row of the fragments table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FragmentRow {
    /// Fragment identifier column.
    pub id: i64,
    /// Encoded payload.
    pub data: String,
    /// Fragment metadata JSON.
    pub metadata: Option<String>,
    /// Auxiliary JSON carrying `imageData`.
    pub auxiliary: Option<String>,
}

/// A single structured record store.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Name used in diagnostics.
    fn name(&self) -> &str;

    /// Whether the store contains `table`.
    async fn has_table(&self, table: &str) -> Result<bool, StoreError>;

    /// Info row for `asin` in `table`.
    async fn info_row(&self, table: &str, asin: &DocumentId) -> Result<Option<InfoRow>, StoreError>;

    /// Fragment rows for `asin` in `table`, ordered by id.
    async fn fragment_rows(
        &self,
        table: &str,
        asin: &DocumentId,
    ) -> Result<Vec<FragmentRow>, StoreError>;
}

/// Lists and opens candidate record stores.
#[async_trait]
pub trait StoreCatalog: Send + Sync {
    /// Candidate store names in probe order.
    async fn candidates(&self) -> Result<Vec<String>, StoreError>;

    /// Open the store called `name`.
    async fn open(&self, name: &str) -> Result<Box<dyn RecordStore>, StoreError>;
}
