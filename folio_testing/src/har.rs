//! Builder for HAR captures shaped like a reader session.

use serde_json::{Map, Value, json};

/// Vendor script carrying both capability regions.
pub const VENDOR_SCRIPT: &str = "var a=1;KindleCompression={lz:function(){}},\n\
     ContentMigration={};KindleO_Aaa={decrypt:function(){}}, KindleAppDb={};";

/// A fragment record served as a JSONP response.
#[derive(Clone, Debug, Default)]
pub struct FragmentRecord {
    /// Fragment identifier.
    pub id: u32,
    /// Encoded payload.
    pub payload: String,
    /// Whether the payload is encrypted.
    pub encrypted: bool,
    /// Whether the payload is compressed.
    pub compressed: bool,
    /// Embedded asset payloads; `None` serialises as `null`.
    pub assets: Vec<(String, Option<String>)>,
}

impl FragmentRecord {
    /// Plain record for `payload`.
    #[must_use]
    pub fn new(id: u32, payload: impl Into<String>) -> Self {
        Self {
            id,
            payload: payload.into(),
            ..Self::default()
        }
    }

    /// Set the decode flags.
    #[must_use]
    pub fn flags(mut self, encrypted: bool, compressed: bool) -> Self {
        self.encrypted = encrypted;
        self.compressed = compressed;
        self
    }

    /// Attach an asset.
    #[must_use]
    pub fn asset(mut self, name: &str, payload: Option<&str>) -> Self {
        self.assets.push((name.to_owned(), payload.map(str::to_owned)));
        self
    }

    fn to_jsonp(&self) -> String {
        let images: Map<String, Value> = self
            .assets
            .iter()
            .map(|(name, payload)| (name.clone(), payload.clone().map_or(Value::Null, Value::String)))
            .collect();
        let body = json!({
            "fragmentData": self.payload,
            "fragmentMetadata": {
                "id": self.id,
                "encryption": self.encrypted,
                "compression": self.compressed,
            },
            "imageData": images,
        });
        format!("loadFragment({body});")
    }
}

/// Accumulates pages and entries, then renders HAR JSON.
#[derive(Clone, Debug)]
pub struct CaptureBuilder {
    asin: String,
    pages: Vec<String>,
    entries: Vec<Value>,
}

impl CaptureBuilder {
    /// Capture of one reader page load for document `asin`.
    #[must_use]
    pub fn new(asin: &str) -> Self {
        Self {
            asin: asin.to_owned(),
            pages: vec![format!("https://read.amazon.com/?asin={asin}")],
            entries: Vec::new(),
        }
    }

    /// Add another page load.
    #[must_use]
    pub fn page(mut self, title: &str) -> Self {
        self.pages.push(title.to_owned());
        self
    }

    /// Add an exchange whose request carries the document tag.
    #[must_use]
    pub fn entry(mut self, url: &str, text: &str) -> Self {
        let asin = self.asin.clone();
        self.entries.push(exchange(url, text, &[("asin", asin.as_str())]));
        self
    }

    /// Add an exchange without query parameters.
    #[must_use]
    pub fn untagged_entry(mut self, url: &str, text: &str) -> Self {
        self.entries.push(exchange(url, text, &[]));
        self
    }

    /// Add the vendor script holding both capability regions.
    #[must_use]
    pub fn vendor_scripts(self) -> Self {
        self.untagged_entry("https://read.amazon.com/static/reader.js", VENDOR_SCRIPT)
    }

    /// Add the start-reading response carrying the decryption key.
    #[must_use]
    pub fn start_reading(self, key: &str) -> Self {
        let body = json!({ "contentChecksum": key, "other": 1 }).to_string();
        self.entry("https://read.amazon.com/service/mobile/reader/startReading", &body)
    }

    /// Add a fragment response with plain flags.
    #[must_use]
    pub fn fragment(self, id: u32, payload: &str) -> Self {
        self.record(&FragmentRecord::new(id, payload))
    }

    /// Add a fragment response.
    #[must_use]
    pub fn record(self, record: &FragmentRecord) -> Self {
        let url = format!("https://read.amazon.com/fragments/{}.jsonp", record.id);
        let body = record.to_jsonp();
        self.entry(&url, &body)
    }

    /// Render the HAR document.
    #[must_use]
    pub fn build(&self) -> String {
        let pages: Vec<Value> = self
            .pages
            .iter()
            .enumerate()
            .map(|(index, title)| json!({ "id": format!("page_{index}"), "title": title }))
            .collect();
        json!({ "log": { "version": "1.2", "pages": pages, "entries": self.entries } }).to_string()
    }
}

fn exchange(url: &str, text: &str, query: &[(&str, &str)]) -> Value {
    let query: Vec<Value> = query
        .iter()
        .map(|(name, value)| json!({ "name": name, "value": value }))
        .collect();
    let full_url = if query.is_empty() {
        url.to_owned()
    } else {
        format!("{url}?v=1")
    };
    json!({
        "request": { "method": "GET", "url": full_url, "queryString": query },
        "response": { "status": 200, "content": { "mimeType": "text/plain", "text": text } },
    })
}
