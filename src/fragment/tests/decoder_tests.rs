//! Tests for the decrypt-then-decompress pipeline.

use std::sync::Arc;

use rstest::{fixture, rstest};
use serde_json::json;

use crate::{
    capability::{
        Capabilities,
        CapabilityFault,
        CompressionDictionary,
        DecompressCapability,
        DecryptCapability,
        DecryptionKey,
        DictionaryBuilderCapability,
    },
    document::CompressionSeed,
    fragment::{
        AssetMap,
        DecodeError,
        DecodeStep,
        FragmentDecoder,
        FragmentId,
        FragmentMetadata,
        RawFragment,
        RawSkeleton,
    },
};

/// Wraps payloads so the order of operations is visible in the output.
struct Wrapping;

impl DecryptCapability for Wrapping {
    fn decrypt(&self, payload: &str, key: &DecryptionKey) -> Result<String, CapabilityFault> {
        if payload.contains("corrupt") {
            return Err(CapabilityFault::new("bad block"));
        }
        Ok(format!("dec[{}]({payload})", key.as_str()))
    }
}

impl DecompressCapability for Wrapping {
    fn decompress(
        &self,
        payload: &str,
        _dictionary: &CompressionDictionary,
    ) -> Result<String, CapabilityFault> {
        Ok(format!("inf({payload})"))
    }
}

impl DictionaryBuilderCapability for Wrapping {
    fn build_dictionary(
        &self,
        seed: &CompressionSeed,
    ) -> Result<CompressionDictionary, CapabilityFault> {
        Ok(CompressionDictionary::new(seed.value().clone()))
    }
}

/// Decompressor that only upper-cases, to tell it apart from [`Wrapping`].
struct Shouting;

impl DecompressCapability for Shouting {
    fn decompress(
        &self,
        payload: &str,
        _dictionary: &CompressionDictionary,
    ) -> Result<String, CapabilityFault> {
        Ok(payload.to_uppercase())
    }
}

#[fixture]
fn capabilities() -> Capabilities { Capabilities::from_shared(Arc::new(Wrapping)) }

fn raw(id: u32, encrypted: bool, compressed: bool, payload: &str) -> RawFragment {
    RawFragment::new(
        FragmentMetadata {
            id: FragmentId::new(id),
            encrypted,
            compressed,
        },
        payload,
    )
}

#[rstest]
#[case(false, false, "p")]
#[case(true, false, "dec[k](p)")]
#[case(false, true, "inf(p)")]
#[case(true, true, "inf(dec[k](p))")]
fn flags_select_the_steps(
    capabilities: Capabilities,
    #[case] encrypted: bool,
    #[case] compressed: bool,
    #[case] expected: &str,
) {
    let key = DecryptionKey::new("k");
    let dictionary = CompressionDictionary::new(json!({}));
    let decoder = FragmentDecoder::new(&capabilities, Some(&key), Some(&dictionary));
    let mut assets = AssetMap::new();
    let decoded = decoder
        .decode(&raw(0, encrypted, compressed, "p"), &mut assets)
        .expect("decode");
    assert_eq!(decoded.decoded(), expected);
    assert_eq!(decoded.resolved(), None);
}

#[rstest]
fn missing_key_only_matters_for_encrypted_fragments(capabilities: Capabilities) {
    let decoder = FragmentDecoder::new(&capabilities, None, None);
    let mut assets = AssetMap::new();
    assert!(decoder.decode(&raw(0, false, false, "p"), &mut assets).is_ok());
    let err = decoder
        .decode(&raw(4, true, false, "p"), &mut assets)
        .expect_err("key required");
    assert_eq!(err, DecodeError::MissingKey { id: FragmentId::new(4) });
}

#[rstest]
fn missing_dictionary_fails_compressed_fragment(capabilities: Capabilities) {
    let decoder = FragmentDecoder::new(&capabilities, None, None);
    let err = decoder
        .decode(&raw(2, false, true, "p"), &mut AssetMap::new())
        .expect_err("dictionary required");
    assert_eq!(err.fragment_id(), FragmentId::new(2));
    assert!(matches!(err, DecodeError::MissingDictionary { .. }));
}

#[rstest]
fn capability_fault_names_fragment_and_step(capabilities: Capabilities) {
    let key = DecryptionKey::new("k");
    let decoder = FragmentDecoder::new(&capabilities, Some(&key), None);
    let mut assets = AssetMap::new();
    let fragment = raw(7, true, false, "corrupt").with_asset("img", Some("data:x".to_owned()));
    let err = decoder.decode(&fragment, &mut assets).expect_err("fault");
    assert_eq!(
        err,
        DecodeError::Capability {
            id: FragmentId::new(7),
            step: DecodeStep::Decrypt,
            fault: CapabilityFault::new("bad block"),
        }
    );
    assert!(assets.is_empty(), "assets of failed fragments are not registered");
}

#[rstest]
fn assets_with_payloads_are_registered(capabilities: Capabilities) {
    let decoder = FragmentDecoder::new(&capabilities, None, None);
    let mut assets = AssetMap::new();
    let fragment = raw(0, false, false, "p")
        .with_asset("a", Some("data:a".to_owned()))
        .with_asset("b", None);
    decoder.decode(&fragment, &mut assets).expect("decode");
    assert_eq!(assets.get("a"), Some("data:a"));
    assert!(!assets.contains("b"));
}

#[rstest]
fn skeletons_use_the_same_pipeline(capabilities: Capabilities) {
    let dictionary = CompressionDictionary::new(json!([]));
    let decoder = FragmentDecoder::new(&capabilities, None, Some(&dictionary));
    let skeleton = RawSkeleton {
        metadata: FragmentMetadata {
            id: FragmentId::zero(),
            encrypted: false,
            compressed: true,
        },
        payload: "s".to_owned(),
    };
    assert_eq!(decoder.decode_skeleton(&skeleton).expect("decode"), "inf(s)");
}

#[test]
fn separately_supplied_capabilities_handle_their_own_step() {
    let wrapping = Arc::new(Wrapping);
    let capabilities = Capabilities::new(wrapping.clone(), Arc::new(Shouting), wrapping);
    let key = DecryptionKey::new("k");
    let dictionary = CompressionDictionary::new(json!([]));
    let decoder = FragmentDecoder::new(&capabilities, Some(&key), Some(&dictionary));

    let decoded = decoder
        .decode(&raw(0, true, true, "p"), &mut AssetMap::new())
        .expect("decode");
    assert_eq!(decoded.decoded(), "DEC[K](P)");
}
