//! Deterministic stand-ins for the vendor decode routines.

use std::sync::{Arc, Mutex};

use folio::{
    Capabilities,
    CapabilityError,
    CapabilityFault,
    CapabilityResolver,
    CompressionDictionary,
    CompressionSeed,
    DecompressCapability,
    DecryptCapability,
    DecryptionKey,
    DictionaryBuilderCapability,
    VendorSource,
    capability::CapabilityKind,
};
use serde_json::json;

const COMPRESSED: &str = "lz:";

/// Codec whose encoding is a readable wrapper, so decoded output can be
/// predicted exactly.
///
/// Encryption wraps as `enc(KEY):PAYLOAD`; compression prefixes `lz:`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReversibleCodec;

impl ReversibleCodec {
    /// Encode `plain` the way the vendor would: compress, then encrypt.
    #[must_use]
    pub fn encode(plain: &str, key: Option<&str>, compress: bool) -> String {
        let compressed = if compress {
            format!("{COMPRESSED}{plain}")
        } else {
            plain.to_owned()
        };
        match key {
            Some(key) => format!("enc({key}):{compressed}"),
            None => compressed,
        }
    }

    /// Bundle the codec as resolved capabilities.
    #[must_use]
    pub fn capabilities() -> Capabilities { Capabilities::from_shared(Arc::new(Self)) }
}

impl DecryptCapability for ReversibleCodec {
    fn decrypt(&self, payload: &str, key: &DecryptionKey) -> Result<String, CapabilityFault> {
        payload
            .strip_prefix(&format!("enc({}):", key.as_str()))
            .map(str::to_owned)
            .ok_or_else(|| CapabilityFault::new("payload was not encrypted with this key"))
    }
}

impl DecompressCapability for ReversibleCodec {
    fn decompress(
        &self,
        payload: &str,
        dictionary: &CompressionDictionary,
    ) -> Result<String, CapabilityFault> {
        if dictionary.as_value().get("offset").is_none() {
            return Err(CapabilityFault::new("dictionary was not built by this codec"));
        }
        payload
            .strip_prefix(COMPRESSED)
            .map(str::to_owned)
            .ok_or_else(|| CapabilityFault::new("payload is not compressed"))
    }
}

impl DictionaryBuilderCapability for ReversibleCodec {
    fn build_dictionary(
        &self,
        seed: &CompressionSeed,
    ) -> Result<CompressionDictionary, CapabilityFault> {
        Ok(CompressionDictionary::new(json!({
            "kind": seed.kind(),
            "offset": seed.offset(),
        })))
    }
}

/// Resolver that always hands out [`ReversibleCodec`] and remembers the
/// vendor source it was given.
#[derive(Debug, Default)]
pub struct StaticResolver {
    seen: Mutex<Vec<VendorSource>>,
}

impl StaticResolver {
    /// Vendor sources passed to [`CapabilityResolver::resolve`] so far.
    ///
    /// # Panics
    ///
    /// Panics if a previous caller panicked while recording.
    #[expect(clippy::expect_used, reason = "test double; poisoning is a test bug")]
    #[must_use]
    pub fn seen(&self) -> Vec<VendorSource> { self.seen.lock().expect("resolver poisoned").clone() }
}

impl CapabilityResolver for StaticResolver {
    fn resolve(&self, source: &VendorSource) -> Result<Capabilities, CapabilityError> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(source.clone());
        }
        Ok(ReversibleCodec::capabilities())
    }
}

/// Resolver that cannot load one capability.
#[derive(Clone, Copy, Debug)]
pub struct FailingResolver(pub CapabilityKind);

impl CapabilityResolver for FailingResolver {
    fn resolve(&self, _source: &VendorSource) -> Result<Capabilities, CapabilityError> {
        Err(CapabilityError::Unavailable {
            capability: self.0,
            reason: "helper rejected the routine".to_owned(),
        })
    }
}
