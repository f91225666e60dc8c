//! Errors raised while listing, opening or querying record stores.
//!
//! The locator treats every [`StoreError`] from an individual candidate as
//! "no match". Only a failure to list the candidates reaches the caller.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors produced by record stores and catalogs.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The catalog directory could not be listed.
    #[error("failed to list record stores in {}: {source}", path.display())]
    Listing {
        /// Directory being listed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The catalog has no store with this name.
    #[error("unknown record store `{0}`")]
    UnknownStore(String),
    /// A SQLite call failed.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A column held text that is not the expected JSON document.
    #[error("store `{store}` holds malformed {column} JSON: {source}")]
    Json {
        /// Store name.
        store: String,
        /// Column holding the text.
        column: &'static str,
        /// Parser error.
        #[source]
        source: serde_json::Error,
    },
    /// A fragment row carries an identifier outside the valid range.
    #[error("store `{store}` holds invalid fragment id {id}")]
    InvalidFragmentId {
        /// Store name.
        store: String,
        /// Offending identifier.
        id: i64,
    },
    /// The blocking task running a query did not complete.
    #[error("store task failed: {0}")]
    Task(String),
    /// A previous query panicked while holding the connection.
    #[error("store `{0}` connection is poisoned")]
    Poisoned(String),
}

impl StoreError {
    /// Adapter for `map_err` on JSON parsing of `column` in `store`.
    pub(crate) fn malformed(
        store: &str,
        column: &'static str,
    ) -> impl FnOnce(serde_json::Error) -> Self + use<> {
        let store = store.to_owned();
        move |source| Self::Json {
            store,
            column,
            source,
        }
    }
}
