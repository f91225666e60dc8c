//! Tests for vendor source extraction, key lookup and the process adapter.

use std::{collections::BTreeMap, process::Command};

use rstest::rstest;

use super::{
    CapabilityError,
    CapabilityKind,
    CapabilityResolver,
    DecryptionKey,
    ProcessResolver,
    VendorSource,
    vendor::extract_region,
};
use crate::{
    capture::{CaptureIndex, DocumentId},
    config::{MarkerPair, ReassemblyConfig},
    document::CompressionSeed,
};

fn capture(entries: &[(&str, &str)]) -> CaptureIndex {
    let entries: BTreeMap<String, String> = entries
        .iter()
        .map(|(id, body)| ((*id).to_owned(), (*body).to_owned()))
        .collect();
    CaptureIndex::new(DocumentId::from("B0"), entries)
}

const BUNDLE: &str = "var a=1,KindleCompression={lz:1},\n ContentMigration={},KindleO_Aaa={d:2}, KindleAppDb={}";

#[rstest]
#[case("A=1,B=2", Some("A=1"))]
#[case("A=1 , \n\tB=2", Some("A=1"))]
#[case("B=2,A=1", None)]
#[case("A=1", None)]
#[case("B=2", None)]
fn extract_region_brackets_and_trims(#[case] text: &str, #[case] expected: Option<&str>) {
    let markers = MarkerPair::new("A=", "B=");
    assert_eq!(extract_region(text, &markers), expected);
}

#[test]
fn vendor_source_extracts_both_regions() {
    let config = ReassemblyConfig::default();
    let index = capture(&[("https://h/app.js", BUNDLE)]);

    let source = VendorSource::extract(&index, &config).expect("both regions present");

    assert_eq!(source.compression, "KindleCompression={lz:1}");
    assert_eq!(source.decryption, "KindleO_Aaa={d:2}");
    assert_eq!(source.source(CapabilityKind::Decryption), "KindleO_Aaa={d:2}");
}

#[test]
fn vendor_source_ignores_non_script_entries() {
    let config = ReassemblyConfig::default();
    let index = capture(&[("https://h/app.jsonp", BUNDLE)]);

    let err = VendorSource::extract(&index, &config).expect_err("jsonp is not a script");
    assert_eq!(
        err,
        CapabilityError::MissingSource {
            capability: CapabilityKind::Compression,
        }
    );
}

#[test]
fn vendor_source_reports_missing_decryption_region() {
    let config = ReassemblyConfig::default();
    let index = capture(&[(
        "https://h/app.js",
        "KindleCompression={},ContentMigration={}",
    )]);

    let err = VendorSource::extract(&index, &config).expect_err("decryption region missing");
    assert!(matches!(
        err,
        CapabilityError::MissingSource {
            capability: CapabilityKind::Decryption
        }
    ));
}

#[test]
fn decryption_key_comes_from_start_reading_record() {
    let config = ReassemblyConfig::default();
    let index = capture(&[
        ("https://h/service/startReading", r#"{"contentChecksum":"k3y","other":1}"#),
        ("https://h/other", r#"{"contentChecksum":"wrong"}"#),
    ]);

    let key = DecryptionKey::from_capture(&index, &config).expect("key present");
    assert_eq!(key.as_str(), "k3y");
}

#[test]
fn decryption_key_absent_when_record_unparsable() {
    let config = ReassemblyConfig::default();
    let index = capture(&[("https://h/startReading", "not json")]);
    assert!(DecryptionKey::from_capture(&index, &config).is_none());
}

#[cfg(unix)]
fn shell_resolver(script: &str) -> ProcessResolver { ProcessResolver::new("sh").arg("-c").arg(script) }

fn sample_source() -> VendorSource {
    VendorSource {
        compression: "KindleCompression={}".to_owned(),
        decryption: "KindleO_Aaa={}".to_owned(),
    }
}

#[cfg(unix)]
#[test]
fn process_resolver_round_trips_helper_results() {
    let resolver = shell_resolver(r#"cat >/dev/null; printf '{"result":"plain"}'"#);
    let capabilities = resolver
        .resolve(&sample_source())
        .expect("helper probe succeeds");

    let text = capabilities
        .decryptor()
        .decrypt("cipher", &DecryptionKey::new("k"))
        .expect("helper decrypts");
    assert_eq!(text, "plain");
}

#[cfg(unix)]
#[test]
fn process_resolver_reports_failed_probe() {
    let resolver = shell_resolver("cat >/dev/null; echo broken >&2; exit 3");
    let err = resolver
        .resolve(&sample_source())
        .expect_err("failing helper must not resolve");
    match err {
        CapabilityError::Unavailable { capability, reason } => {
            assert_eq!(capability, CapabilityKind::Compression);
            assert!(reason.contains("broken"), "reason was {reason}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn process_resolver_reports_missing_program() {
    let resolver = ProcessResolver::new("/nonexistent/folio-helper");
    let err = resolver
        .resolve(&sample_source())
        .expect_err("missing helper must not resolve");
    assert!(matches!(err, CapabilityError::Unavailable { .. }));
}

#[cfg(unix)]
#[test]
fn process_resolver_rejects_helper_that_ignores_request() {
    // Only `probe` drains stdin; every other operation answers blindly.
    let resolver = shell_resolver(
        r#"if [ "$0" = probe ]; then cat >/dev/null; fi; printf '{"result":"x"}'"#,
    );
    let capabilities = resolver
        .resolve(&sample_source())
        .expect("helper probe succeeds");

    let payload = "p".repeat(1 << 20);
    let fault = capabilities
        .decryptor()
        .decrypt(&payload, &DecryptionKey::new("k"))
        .expect_err("an unread request must not yield a result");
    assert!(
        fault.message().contains("cannot send decrypt request"),
        "fault was {fault}"
    );
}

fn node_available() -> bool {
    Command::new("node")
        .arg("--version")
        .output()
        .is_ok_and(|output| output.status.success())
}

/// Vendor routines shaped like the captured reader bundle.
fn vendor_routines() -> VendorSource {
    VendorSource {
        compression: concat!(
            "KindleCompression={",
            "lzAddStringsToDictionary:function(s,m,o){m.offset=o===undefined?0:o;m.words=s},",
            "lzAddNumbersToDictionary:function(m,o){m.numbers=o===undefined?0:o},",
            "lzGetDecompressionDictionary:function(m){return [m.offset,m.numbers,m.words]},",
            "lzExpandWithStaticDictionary:function(p,d){return p.split('~').join(d[2])}",
            "}"
        )
        .to_owned(),
        decryption: "KindleO_Aaa={o_aad:function(d,k){return d.split('').reverse().join('')+k}}"
            .to_owned(),
    }
}

#[rstest]
#[case::legacy(CompressionSeed::Legacy(serde_json::json!("abc")), serde_json::json!([0, 0, "abc"]))]
#[case::json(CompressionSeed::Json(serde_json::json!("abc")), serde_json::json!([256, 256, "abc"]))]
fn bundled_helper_runs_vendor_routines(
    #[case] seed: CompressionSeed,
    #[case] expected: serde_json::Value,
) {
    if !node_available() {
        eprintln!("node not found; skipping bundled helper test");
        return;
    }
    let capabilities = ProcessResolver::bundled("node")
        .resolve(&vendor_routines())
        .expect("bundled helper resolves");

    let dictionary = capabilities
        .dictionary_builder()
        .build_dictionary(&seed)
        .expect("dictionary builds");
    assert_eq!(dictionary.as_value(), &expected);

    let plain = capabilities
        .decryptor()
        .decrypt(">p/<~>p<", &DecryptionKey::new("!"))
        .expect("decrypts");
    assert_eq!(plain, "<p>~</p>!");
    let text = capabilities
        .decompressor()
        .decompress(&plain, &dictionary)
        .expect("decompresses");
    assert_eq!(text, "<p>abc</p>!");
}

#[test]
fn bundled_helper_rejects_source_without_routines() {
    if !node_available() {
        eprintln!("node not found; skipping bundled helper test");
        return;
    }
    let source = VendorSource {
        compression: "KindleCompression={}".to_owned(),
        ..vendor_routines()
    };
    let err = ProcessResolver::bundled("node")
        .resolve(&source)
        .expect_err("missing routines must not resolve");
    match err {
        CapabilityError::Unavailable { capability, reason } => {
            assert_eq!(capability, CapabilityKind::Compression);
            assert!(reason.contains("lzExpandWithStaticDictionary"), "reason was {reason}");
        }
        other => panic!("unexpected error: {other}"),
    }
}
