//! Run configuration for the reassembly pipeline.
//!
//! Every textual convention the pipeline depends on (host pattern, endpoint
//! suffixes, vendor markers, table names) lives here so the delivery system
//! can change shape without touching the core.

/// Pair of textual markers bracketing a region of vendor script text.
///
/// The region starts at `start` (inclusive) and ends right before `end`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkerPair {
    /// Marker opening the region.
    pub start: String,
    /// Marker closing the region.
    pub end: String,
}

impl MarkerPair {
    /// Construct a marker pair.
    #[must_use]
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

/// Configuration shared by every stage of a reassembly run.
///
/// # Examples
///
/// ```
/// use folio::ReassemblyConfig;
///
/// let config = ReassemblyConfig::default()
///     .expected_host("//reader.example.com/")
///     .fragments_table("chunks");
///
/// assert_eq!(config.expected_host, "//reader.example.com/");
/// assert_eq!(config.info_table, "bookinfo");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReassemblyConfig {
    /// Substring the single captured page title must contain.
    ///
    /// Default: `//read.amazon.com/`.
    pub expected_host: String,

    /// Query parameter tagging the document identifier.
    ///
    /// Default: `asin`.
    pub document_tag: String,

    /// Identifier suffix of the record carrying the decryption key.
    ///
    /// Default: `/startReading`.
    pub start_reading_suffix: String,

    /// JSON field of the start-reading record holding the key.
    ///
    /// Default: `contentChecksum`.
    pub key_field: String,

    /// Identifier suffix of captured vendor scripts.
    ///
    /// Default: `.js`.
    pub script_suffix: String,

    /// Identifier suffix of captured JSONP fragment records.
    ///
    /// Default: `.jsonp`.
    pub record_suffix: String,

    /// Markers bracketing the compression capability source.
    pub compression_markers: MarkerPair,

    /// Markers bracketing the decryption capability source.
    pub decryption_markers: MarkerPair,

    /// Table holding document metadata and the fragment map.
    ///
    /// Default: `bookinfo`.
    pub info_table: String,

    /// Table holding fragment rows.
    ///
    /// Default: `fragments`.
    pub fragments_table: String,

    /// Script function used by in-document navigation links.
    ///
    /// Default: `KindleContentInterface.gotoPosition`.
    pub navigation_function: String,
}

impl Default for ReassemblyConfig {
    fn default() -> Self {
        Self {
            expected_host: "//read.amazon.com/".to_owned(),
            document_tag: "asin".to_owned(),
            start_reading_suffix: "/startReading".to_owned(),
            key_field: "contentChecksum".to_owned(),
            script_suffix: ".js".to_owned(),
            record_suffix: ".jsonp".to_owned(),
            compression_markers: MarkerPair::new("KindleCompression=", "ContentMigration="),
            decryption_markers: MarkerPair::new("KindleO_Aaa=", "KindleAppDb="),
            info_table: "bookinfo".to_owned(),
            fragments_table: "fragments".to_owned(),
            navigation_function: "KindleContentInterface.gotoPosition".to_owned(),
        }
    }
}

impl ReassemblyConfig {
    /// Set the host pattern the captured page title must contain.
    #[must_use]
    pub fn expected_host(mut self, host: impl Into<String>) -> Self {
        self.expected_host = host.into();
        self
    }

    /// Set the query parameter carrying the document identifier.
    #[must_use]
    pub fn document_tag(mut self, tag: impl Into<String>) -> Self {
        self.document_tag = tag.into();
        self
    }

    /// Set the identifier suffix of the start-reading record.
    #[must_use]
    pub fn start_reading_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.start_reading_suffix = suffix.into();
        self
    }

    /// Set the JSON field holding the decryption key.
    #[must_use]
    pub fn key_field(mut self, field: impl Into<String>) -> Self {
        self.key_field = field.into();
        self
    }

    /// Set the markers bracketing the compression source.
    #[must_use]
    pub fn compression_markers(mut self, markers: MarkerPair) -> Self {
        self.compression_markers = markers;
        self
    }

    /// Set the markers bracketing the decryption source.
    #[must_use]
    pub fn decryption_markers(mut self, markers: MarkerPair) -> Self {
        self.decryption_markers = markers;
        self
    }

    /// Set the document info table name.
    #[must_use]
    pub fn info_table(mut self, table: impl Into<String>) -> Self {
        self.info_table = table.into();
        self
    }

    /// Set the fragments table name.
    #[must_use]
    pub fn fragments_table(mut self, table: impl Into<String>) -> Self {
        self.fragments_table = table.into();
        self
    }

    /// Set the navigation function rewritten into local anchors.
    #[must_use]
    pub fn navigation_function(mut self, function: impl Into<String>) -> Self {
        self.navigation_function = function.into();
        self
    }
}
