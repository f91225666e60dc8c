//! Document metadata and the fragment map read from the info store.

use serde::Deserialize;
use serde_json::Value;

/// Seed for the compression dictionary.
///
/// The info record carries one of two alternate fields. The legacy form is
/// preferred when both are present.
#[derive(Clone, Debug, PartialEq)]
pub enum CompressionSeed {
    /// `cpr` field; the dictionary is built from offset 0.
    Legacy(Value),
    /// `cprJson` field; the dictionary is built from offset 256.
    Json(Value),
}

impl CompressionSeed {
    /// Seed form as passed to the dictionary builder.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Legacy(_) => "legacy",
            Self::Json(_) => "json",
        }
    }

    /// Dictionary offset the seed is added at.
    #[must_use]
    pub const fn offset(&self) -> u32 {
        match self {
            Self::Legacy(_) => 0,
            Self::Json(_) => 256,
        }
    }

    /// Raw seed value.
    #[must_use]
    pub const fn value(&self) -> &Value {
        match self {
            Self::Legacy(value) | Self::Json(value) => value,
        }
    }
}

#[derive(Deserialize)]
struct MetadataRecord {
    title: String,
    #[serde(default, rename = "authorList")]
    authors: Option<Vec<String>>,
    #[serde(default, alias = "coverImage")]
    cover: Option<String>,
    #[serde(default)]
    cpr: Option<Value>,
    #[serde(default, rename = "cprJson")]
    cpr_json: Option<Value>,
}

/// Title, authors, cover reference and dictionary seed of a document.
#[derive(Clone, Debug, PartialEq)]
pub struct DocumentMetadata {
    /// Document title.
    pub title: String,
    /// Author names in display order.
    pub authors: Vec<String>,
    /// Asset name of the cover image.
    pub cover: Option<String>,
    /// Compression dictionary seed, if the document uses compression.
    pub seed: Option<CompressionSeed>,
}

impl DocumentMetadata {
    /// Metadata with only a title.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            authors: Vec::new(),
            cover: None,
            seed: None,
        }
    }

    /// Parse the metadata JSON stored in the info record.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not JSON or has no string `title`.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        let record: MetadataRecord = serde_json::from_str(text)?;
        let seed = match (record.cpr, record.cpr_json) {
            (Some(value), _) => Some(CompressionSeed::Legacy(value)),
            (None, Some(value)) => Some(CompressionSeed::Json(value)),
            (None, None) => None,
        };
        Ok(Self {
            title: record.title,
            authors: record.authors.unwrap_or_default(),
            cover: record.cover,
            seed,
        })
    }
}

#[derive(Deserialize)]
struct FragmentMapRecord {
    #[serde(rename = "fragmentMetadata")]
    fragment_metadata: FragmentCount,
}

#[derive(Deserialize)]
struct FragmentCount {
    #[serde(rename = "numberOfFragments")]
    number_of_fragments: u32,
}

/// Fragment index of a document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FragmentMap {
    /// Declared fragment count; may overstate the real count by one.
    pub total_fragment_count: u32,
}

impl FragmentMap {
    /// Construct a map declaring `total_fragment_count` fragments.
    #[must_use]
    pub const fn new(total_fragment_count: u32) -> Self { Self { total_fragment_count } }

    /// Parse the fragment map JSON stored in the info record.
    ///
    /// # Errors
    ///
    /// Returns an error if `fragmentMetadata.numberOfFragments` is missing or
    /// not a non-negative integer.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        let record: FragmentMapRecord = serde_json::from_str(text)?;
        Ok(Self::new(record.fragment_metadata.number_of_fragments))
    }
}

/// Everything the info store knows about a document.
#[derive(Clone, Debug, PartialEq)]
pub struct DocumentInfo {
    /// Title, authors and dictionary seed.
    pub metadata: DocumentMetadata,
    /// Fragment index.
    pub fragment_map: FragmentMap,
}
