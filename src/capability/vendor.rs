//! Extraction of vendor routine source from captured scripts.
//!
//! The routines sit inside large bundled scripts. Each one is bracketed by the
//! assignment that defines it and the assignment of the module that follows.

use std::sync::LazyLock;

use regex::Regex;

use super::{CapabilityError, CapabilityKind};
use crate::{
    capture::CaptureIndex,
    config::{MarkerPair, ReassemblyConfig},
};

static TRAILING_SEPARATORS: LazyLock<Regex> = LazyLock::new(trailing_separators);

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
fn trailing_separators() -> Regex { Regex::new(r"[,\s]+$").expect("valid separator pattern") }

/// Source text of the vendor routines, one slice per capability.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VendorSource {
    /// Compression routine source (`KindleCompression=...`).
    pub compression: String,
    /// Decryption routine source (`KindleO_Aaa=...`).
    pub decryption: String,
}

impl VendorSource {
    /// Locate both routine regions in the captured scripts.
    ///
    /// Scripts are scanned in identifier order and the first well-ordered
    /// region for each capability wins.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError::MissingSource`] naming the first capability
    /// whose region is absent from every script.
    pub fn extract(capture: &CaptureIndex, config: &ReassemblyConfig) -> Result<Self, CapabilityError> {
        let find = |markers: &MarkerPair, capability: CapabilityKind| {
            capture
                .with_suffix(&config.script_suffix)
                .find_map(|(_, body)| extract_region(body, markers))
                .map(str::to_owned)
                .ok_or(CapabilityError::MissingSource { capability })
        };
        Ok(Self {
            compression: find(&config.compression_markers, CapabilityKind::Compression)?,
            decryption: find(&config.decryption_markers, CapabilityKind::Decryption)?,
        })
    }

    /// Source slice for `capability`.
    #[must_use]
    pub fn source(&self, capability: CapabilityKind) -> &str {
        match capability {
            CapabilityKind::Compression => &self.compression,
            CapabilityKind::Decryption => &self.decryption,
        }
    }
}

/// Return the region of `text` bracketed by `markers`.
///
/// The slice starts at the opening marker, stops right before the closing
/// marker and has trailing commas and whitespace removed. `None` is returned
/// when either marker is missing or the closing marker precedes the opening.
///
/// ```
/// use folio::{MarkerPair, capability::vendor::extract_region};
///
/// let markers = MarkerPair::new("A=", "B=");
/// assert_eq!(extract_region("x,A={f:1},\n B={}", &markers), Some("A={f:1}"));
/// assert_eq!(extract_region("B={} A={}", &markers), None);
/// ```
#[must_use]
pub fn extract_region<'a>(text: &'a str, markers: &MarkerPair) -> Option<&'a str> {
    let start = text.find(&markers.start)?;
    let end = text.find(&markers.end)?;
    if start >= end {
        return None;
    }
    let region = &text[start..end];
    let trimmed_len = TRAILING_SEPARATORS
        .find(region)
        .map_or(region.len(), |m| m.start());
    Some(&region[..trimmed_len])
}
