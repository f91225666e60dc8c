//! Raw and decoded fragment records.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::FragmentId;

/// Per-fragment decode flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FragmentMetadata {
    /// Fragment identifier and document position.
    pub id: FragmentId,
    /// Whether the payload must be decrypted.
    pub encrypted: bool,
    /// Whether the payload must be decompressed (after decryption).
    pub compressed: bool,
}

/// Wire shape of fragment metadata: `{ "id", "encryption", "compression" }`.
///
/// The flags are JavaScript-style truthy values.
#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct MetadataJson {
    #[serde(default)]
    pub(crate) id: Option<FragmentId>,
    #[serde(default, deserialize_with = "truthy")]
    pub(crate) encryption: bool,
    #[serde(default, deserialize_with = "truthy")]
    pub(crate) compression: bool,
}

impl MetadataJson {
    pub(crate) fn with_id(&self, id: FragmentId) -> FragmentMetadata {
        FragmentMetadata {
            id,
            encrypted: self.encryption,
            compressed: self.compression,
        }
    }
}

fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => false,
        Value::Bool(flag) => flag,
        Value::Number(n) => n.as_f64().is_some_and(|v| v.abs() > f64::EPSILON),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

/// A fragment as found in the capture or a record store, still encoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawFragment {
    /// Decode flags and identifier.
    pub metadata: FragmentMetadata,
    /// Encoded payload.
    pub payload: String,
    /// Assets referenced by the fragment; `None` marks a name without payload.
    pub assets: BTreeMap<String, Option<String>>,
}

impl RawFragment {
    /// Construct a fragment without assets.
    #[must_use]
    pub fn new(metadata: FragmentMetadata, payload: impl Into<String>) -> Self {
        Self {
            metadata,
            payload: payload.into(),
            assets: BTreeMap::new(),
        }
    }

    /// Attach an asset reference.
    #[must_use]
    pub fn with_asset(mut self, name: impl Into<String>, payload: Option<String>) -> Self {
        self.assets.insert(name.into(), payload);
        self
    }

    /// Fragment identifier.
    #[must_use]
    pub const fn id(&self) -> FragmentId { self.metadata.id }
}

/// Layout skeleton captured alongside fragments, still encoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawSkeleton {
    /// Decode flags and identifier.
    pub metadata: FragmentMetadata,
    /// Encoded payload.
    pub payload: String,
}

/// A fragment after decryption and decompression.
///
/// The resolved text is computed once, after every asset is known, and is
/// immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedFragment {
    id: FragmentId,
    decoded: String,
    resolved: Option<String>,
}

impl DecodedFragment {
    /// Wrap decoded content.
    #[must_use]
    pub fn new(id: FragmentId, decoded: impl Into<String>) -> Self {
        Self {
            id,
            decoded: decoded.into(),
            resolved: None,
        }
    }

    /// Fragment identifier.
    #[must_use]
    pub const fn id(&self) -> FragmentId { self.id }

    /// Output of decrypt/decompress.
    #[must_use]
    pub fn decoded(&self) -> &str { &self.decoded }

    /// Text after reference resolution, if computed.
    #[must_use]
    pub fn resolved(&self) -> Option<&str> { self.resolved.as_deref() }

    /// Return the cached resolution, computing it with `resolve` on first use.
    ///
    /// # Errors
    ///
    /// Propagates the error from `resolve`; nothing is cached in that case.
    pub fn resolve_with<E>(
        &mut self,
        resolve: impl FnOnce(&str) -> Result<String, E>,
    ) -> Result<&str, E> {
        let text = match self.resolved.take() {
            Some(text) => text,
            None => resolve(&self.decoded)?,
        };
        Ok(self.resolved.insert(text).as_str())
    }
}
