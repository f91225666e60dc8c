//! SQLite-backed record stores.
//!
//! Browser databases are plain SQLite files in one directory. Connections are
//! opened read-only and every call runs on the blocking pool.

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};

use super::{FragmentRow, InfoRow, RecordStore, StoreCatalog, StoreError};
use crate::capture::DocumentId;

/// Catalog over the regular files of a directory, in file-name order.
#[derive(Clone, Debug)]
pub struct SqliteCatalog {
    directory: PathBuf,
}

impl SqliteCatalog {
    /// Catalog the files in `directory`.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Directory being catalogued.
    #[must_use]
    pub fn directory(&self) -> &Path { &self.directory }
}

#[async_trait]
impl StoreCatalog for SqliteCatalog {
    async fn candidates(&self) -> Result<Vec<String>, StoreError> {
        let listing_error = |source| StoreError::Listing {
            path: self.directory.clone(),
            source,
        };
        let mut entries = tokio::fs::read_dir(&self.directory)
            .await
            .map_err(listing_error)?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(listing_error)? {
            let is_file = entry.file_type().await.is_ok_and(|kind| kind.is_file());
            if let (true, Some(name)) = (is_file, entry.file_name().to_str()) {
                names.push(name.to_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    async fn open(&self, name: &str) -> Result<Box<dyn RecordStore>, StoreError> {
        let store = SqliteStore::open(self.directory.join(name), name).await?;
        Ok(Box::new(store))
    }
}

/// One read-only SQLite database.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    name: String,
    connection: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open `path` read-only, naming the store `name` in diagnostics.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Sqlite`] if the file cannot be opened.
    pub async fn open(path: PathBuf, name: &str) -> Result<Self, StoreError> {
        let connection = tokio::task::spawn_blocking(move || {
            Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
        })
        .await
        .map_err(|err| StoreError::Task(err.to_string()))??;
        Ok(Self {
            name: name.to_owned(),
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Run `query` against the connection on the blocking pool.
    async fn with_connection<T, F>(&self, query: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let connection = Arc::clone(&self.connection);
        let name = self.name.clone();
        tokio::task::spawn_blocking(move || {
            let guard = connection
                .lock()
                .map_err(|_| StoreError::Poisoned(name))?;
            query(&guard).map_err(StoreError::from)
        })
        .await
        .map_err(|err| StoreError::Task(err.to_string()))?
    }
}

/// Quote `table` as an SQL identifier.
fn quote_identifier(table: &str) -> String { format!("\"{}\"", table.replace('"', "\"\"")) }

#[async_trait]
impl RecordStore for SqliteStore {
    fn name(&self) -> &str { &self.name }

    async fn has_table(&self, table: &str) -> Result<bool, StoreError> {
        let table = table.to_owned();
        self.with_connection(move |conn| {
            conn.query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
                params![table],
                |_| Ok(()),
            )
            .optional()
            .map(|found| found.is_some())
        })
        .await
    }

    async fn info_row(&self, table: &str, asin: &DocumentId) -> Result<Option<InfoRow>, StoreError> {
        let sql = format!(
            "SELECT metadata, fragmap FROM {} WHERE asin = ?1",
            quote_identifier(table)
        );
        let asin = asin.as_str().to_owned();
        self.with_connection(move |conn| {
            conn.query_row(&sql, params![asin], |row| {
                Ok(InfoRow {
                    metadata: row.get(0)?,
                    fragment_map: row.get(1)?,
                })
            })
            .optional()
        })
        .await
    }

    async fn fragment_rows(
        &self,
        table: &str,
        asin: &DocumentId,
    ) -> Result<Vec<FragmentRow>, StoreError> {
        let sql = format!(
            "SELECT id, data, metadata, auxiliary FROM {} WHERE asin = ?1 ORDER BY id",
            quote_identifier(table)
        );
        let asin = asin.as_str().to_owned();
        self.with_connection(move |conn| {
            let mut statement = conn.prepare(&sql)?;
            let rows = statement.query_map(params![asin], |row| {
                Ok(FragmentRow {
                    id: row.get(0)?,
                    data: row.get(1)?,
                    metadata: row.get(2)?,
                    auxiliary: row.get(3)?,
                })
            })?;
            rows.collect::<rusqlite::Result<Vec<_>>>()
        })
        .await
    }
}
