//! In-memory record stores with scripted latency and failures.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use folio::{
    DocumentId,
    RecordStore,
    StoreCatalog,
    StoreError,
    store::{FragmentRow, InfoRow},
};

/// A record store held in memory.
///
/// Every query sleeps for the configured delay first, which lets tests with a
/// paused clock control the order in which probes complete.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    name: String,
    tables: BTreeSet<String>,
    info: BTreeMap<String, InfoRow>,
    fragments: BTreeMap<String, Vec<FragmentRow>>,
    delay: Duration,
    broken: bool,
}

impl MemoryStore {
    /// Empty store called `name`.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            ..Self::default()
        }
    }

    /// Add a `bookinfo` row.
    #[must_use]
    pub fn with_info(mut self, asin: &str, metadata: &str, fragment_map: &str) -> Self {
        self.tables.insert("bookinfo".to_owned());
        self.info.insert(
            asin.to_owned(),
            InfoRow {
                metadata: metadata.to_owned(),
                fragment_map: fragment_map.to_owned(),
            },
        );
        self
    }

    /// Add a `fragments` row.
    #[must_use]
    pub fn with_fragment(
        mut self,
        asin: &str,
        id: i64,
        data: &str,
        metadata: Option<&str>,
        auxiliary: Option<&str>,
    ) -> Self {
        self.tables.insert("fragments".to_owned());
        let rows = self.fragments.entry(asin.to_owned()).or_default();
        rows.push(FragmentRow {
            id,
            data: data.to_owned(),
            metadata: metadata.map(str::to_owned),
            auxiliary: auxiliary.map(str::to_owned),
        });
        rows.sort_by_key(|row| row.id);
        self
    }

    /// Delay every query by `delay`.
    #[must_use]
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Fail every query.
    #[must_use]
    pub fn broken(mut self) -> Self {
        self.broken = true;
        self
    }

    async fn pause(&self) -> Result<(), StoreError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.broken {
            return Err(StoreError::Task(format!("{} is corrupt", self.name)));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn name(&self) -> &str { &self.name }

    async fn has_table(&self, table: &str) -> Result<bool, StoreError> {
        self.pause().await?;
        Ok(self.tables.contains(table))
    }

    async fn info_row(&self, _table: &str, asin: &DocumentId) -> Result<Option<InfoRow>, StoreError> {
        self.pause().await?;
        Ok(self.info.get(asin.as_str()).cloned())
    }

    async fn fragment_rows(
        &self,
        _table: &str,
        asin: &DocumentId,
    ) -> Result<Vec<FragmentRow>, StoreError> {
        self.pause().await?;
        Ok(self.fragments.get(asin.as_str()).cloned().unwrap_or_default())
    }
}

/// Catalog over [`MemoryStore`]s in insertion order.
#[derive(Clone, Debug, Default)]
pub struct MemoryCatalog {
    stores: Vec<MemoryStore>,
    unopenable: BTreeSet<String>,
    opened: Arc<AtomicUsize>,
}

impl MemoryCatalog {
    /// Catalog listing `stores` in order.
    #[must_use]
    pub fn new(stores: Vec<MemoryStore>) -> Self {
        Self {
            stores,
            ..Self::default()
        }
    }

    /// List a candidate that fails to open.
    #[must_use]
    pub fn with_unopenable(mut self, name: &str) -> Self {
        self.unopenable.insert(name.to_owned());
        self.stores.push(MemoryStore::new(name));
        self
    }

    /// Number of successful or failed open attempts so far.
    #[must_use]
    pub fn open_attempts(&self) -> usize { self.opened.load(Ordering::SeqCst) }
}

#[async_trait]
impl StoreCatalog for MemoryCatalog {
    async fn candidates(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.stores.iter().map(|store| store.name().to_owned()).collect())
    }

    async fn open(&self, name: &str) -> Result<Box<dyn RecordStore>, StoreError> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        if self.unopenable.contains(name) {
            return Err(StoreError::Task(format!("{name} is locked")));
        }
        self.stores
            .iter()
            .find(|store| store.name() == name)
            .cloned()
            .map(|store| Box::new(store) as Box<dyn RecordStore>)
            .ok_or_else(|| StoreError::UnknownStore(name.to_owned()))
    }
}
