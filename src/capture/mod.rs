//! Capture log model and reconciliation.
//!
//! A capture log is the browser's record of one reading session: the page
//! that was loaded and every request/response exchange observed while it was
//! open. [`CaptureReconciler`] turns it into a [`CaptureIndex`], the single
//! source of truth the later stages read from.

pub mod error;
pub mod har;
pub mod reconciler;

use std::{collections::BTreeMap, fmt};

use derive_more::{Display, From};

pub use error::CaptureError;
pub use har::parse_har;
pub use reconciler::CaptureReconciler;

/// Identifier of the document being reassembled (the `asin`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From)]
#[display("{_0}")]
pub struct DocumentId(String);

impl DocumentId {
    /// Construct an identifier from any string-like value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self { Self(value.into()) }

    /// Borrow the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str { &self.0 }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self { Self(value.to_owned()) }
}

/// A page-load context recorded by the browser.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageContext {
    /// Title the browser recorded for the page load.
    pub title: String,
}

/// One captured request/response exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Observation {
    identifier: String,
    content: Option<String>,
    tags: Vec<(String, String)>,
}

impl Observation {
    /// Build an observation from a request URL.
    ///
    /// The query string is stripped from `url` to form the identifier.
    ///
    /// ```
    /// use folio::capture::Observation;
    ///
    /// let obs = Observation::from_request("https://host/a.jsonp?x=1", Some("body".into()), vec![]);
    /// assert_eq!(obs.identifier(), "https://host/a.jsonp");
    /// ```
    #[must_use]
    pub fn from_request(url: &str, content: Option<String>, tags: Vec<(String, String)>) -> Self {
        let identifier = url.split('?').next().unwrap_or_default().to_owned();
        Self {
            identifier,
            content,
            tags,
        }
    }

    /// Identifier of the exchange (request URL without query string).
    #[must_use]
    pub fn identifier(&self) -> &str { &self.identifier }

    /// Response body, if the browser kept one.
    #[must_use]
    pub fn content(&self) -> Option<&str> { self.content.as_deref() }

    /// Value of the query parameter `name`, if present.
    #[must_use]
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Raw capture log: page loads plus observations in capture order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CaptureLog {
    /// Page-load contexts.
    pub pages: Vec<PageContext>,
    /// Observed exchanges, possibly repeated.
    pub observations: Vec<Observation>,
}

/// Reconciled view of a capture: one document and a conflict-free mapping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptureIndex {
    document_id: DocumentId,
    entries: BTreeMap<String, String>,
}

impl CaptureIndex {
    pub(crate) fn new(document_id: DocumentId, entries: BTreeMap<String, String>) -> Self {
        Self {
            document_id,
            entries,
        }
    }

    /// Identifier of the captured document.
    #[must_use]
    pub fn document_id(&self) -> &DocumentId { &self.document_id }

    /// Content recorded for `identifier`.
    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<&str> {
        self.entries.get(identifier).map(String::as_str)
    }

    /// Number of reconciled entries.
    #[must_use]
    pub fn len(&self) -> usize { self.entries.len() }

    /// Whether the reconciled mapping is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Iterate entries whose identifier ends with `suffix`, in identifier
    /// order.
    pub fn with_suffix<'a>(&'a self, suffix: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.entries
            .iter()
            .filter(move |(id, _)| id.ends_with(suffix))
            .map(|(id, content)| (id.as_str(), content.as_str()))
    }
}

impl fmt::Display for CaptureIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "capture of {} ({} entries)", self.document_id, self.entries.len())
    }
}
