//! Decode capabilities consumed by the fragment decoder.
//!
//! The decrypt, decompress and dictionary-construction primitives are vendor
//! code shipped to the browser and captured alongside the content. This crate
//! never reimplements them: they are injected as trait objects resolved once
//! per run from a [`VendorSource`]. Resolution must succeed for every
//! capability before the first fragment is decoded.

pub mod error;
pub mod process;
pub mod vendor;

use std::sync::Arc;

use log::debug;
use serde_json::Value;

pub use error::{CapabilityError, CapabilityFault, CapabilityKind};
pub use process::{ProcessCapabilities, ProcessResolver};
pub use vendor::VendorSource;

use crate::{capture::CaptureIndex, config::ReassemblyConfig, document::CompressionSeed};

/// Per-document decryption key (the content checksum of the session).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecryptionKey(String);

impl DecryptionKey {
    /// Wrap a key value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self { Self(value.into()) }

    /// Borrow the key text.
    #[must_use]
    pub fn as_str(&self) -> &str { &self.0 }

    /// Extract the key from the start-reading record of a capture.
    ///
    /// Records are visited in identifier order; the first one whose body is a
    /// JSON object with a string `config.key_field` supplies the key.
    #[must_use]
    pub fn from_capture(capture: &CaptureIndex, config: &ReassemblyConfig) -> Option<Self> {
        capture
            .with_suffix(&config.start_reading_suffix)
            .find_map(|(identifier, body)| {
                let parsed: Value = match serde_json::from_str(body) {
                    Ok(value) => value,
                    Err(err) => {
                        debug!("ignoring unparsable start-reading record `{identifier}`: {err}");
                        return None;
                    }
                };
                parsed
                    .get(&config.key_field)
                    .and_then(Value::as_str)
                    .map(Self::new)
            })
    }
}

/// Opaque dictionary produced by the dictionary builder.
///
/// The decoder never inspects it; it is handed back verbatim to
/// [`DecompressCapability::decompress`].
#[derive(Clone, Debug, PartialEq)]
pub struct CompressionDictionary(Value);

impl CompressionDictionary {
    /// Wrap a dictionary value.
    #[must_use]
    pub fn new(value: Value) -> Self { Self(value) }

    /// Borrow the dictionary value.
    #[must_use]
    pub fn as_value(&self) -> &Value { &self.0 }
}

/// Vendor decryption routine.
pub trait DecryptCapability: Send + Sync {
    /// Decrypt `payload` with the document key.
    ///
    /// # Errors
    ///
    /// Returns a [`CapabilityFault`] when the vendor routine fails.
    fn decrypt(&self, payload: &str, key: &DecryptionKey) -> Result<String, CapabilityFault>;
}

/// Vendor decompression routine.
pub trait DecompressCapability: Send + Sync {
    /// Expand `payload` using the document dictionary.
    ///
    /// # Errors
    ///
    /// Returns a [`CapabilityFault`] when the vendor routine fails.
    fn decompress(
        &self,
        payload: &str,
        dictionary: &CompressionDictionary,
    ) -> Result<String, CapabilityFault>;
}

/// Vendor dictionary construction routine.
pub trait DictionaryBuilderCapability: Send + Sync {
    /// Build the static decompression dictionary for a document.
    ///
    /// # Errors
    ///
    /// Returns a [`CapabilityFault`] when the vendor routine fails.
    fn build_dictionary(&self, seed: &CompressionSeed)
    -> Result<CompressionDictionary, CapabilityFault>;
}

/// Resolves vendor source text into callable capabilities.
///
/// Implementations evaluate untrusted text and must keep that evaluation
/// isolated from the process running the pipeline.
pub trait CapabilityResolver {
    /// Prove every capability loadable and return them.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError::Unavailable`] naming the capability that
    /// could not be loaded.
    fn resolve(&self, source: &VendorSource) -> Result<Capabilities, CapabilityError>;
}

/// Resolved capability bundle injected into the engine.
#[derive(Clone)]
pub struct Capabilities {
    decrypt: Arc<dyn DecryptCapability>,
    decompress: Arc<dyn DecompressCapability>,
    dictionary: Arc<dyn DictionaryBuilderCapability>,
}

impl Capabilities {
    /// Bundle independently supplied capabilities.
    #[must_use]
    pub fn new(
        decrypt: Arc<dyn DecryptCapability>,
        decompress: Arc<dyn DecompressCapability>,
        dictionary: Arc<dyn DictionaryBuilderCapability>,
    ) -> Self {
        Self {
            decrypt,
            decompress,
            dictionary,
        }
    }

    /// Bundle a single value implementing every capability.
    #[must_use]
    pub fn from_shared<T>(shared: Arc<T>) -> Self
    where
        T: DecryptCapability + DecompressCapability + DictionaryBuilderCapability + 'static,
    {
        Self {
            decrypt: shared.clone(),
            decompress: shared.clone(),
            dictionary: shared,
        }
    }

    /// Decryption capability.
    #[must_use]
    pub fn decryptor(&self) -> &dyn DecryptCapability { self.decrypt.as_ref() }

    /// Decompression capability.
    #[must_use]
    pub fn decompressor(&self) -> &dyn DecompressCapability { self.decompress.as_ref() }

    /// Dictionary builder capability.
    #[must_use]
    pub fn dictionary_builder(&self) -> &dyn DictionaryBuilderCapability {
        self.dictionary.as_ref()
    }
}

impl std::fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capabilities").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
