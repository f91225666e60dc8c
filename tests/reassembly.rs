//! End-to-end reassembly from a HAR capture and in-memory record stores.

use folio::{
    AssemblyError,
    CaptureLog,
    DecodeError,
    DocumentRenderer,
    Error,
    FragmentId,
    HtmlRenderer,
    ReassemblyConfig,
    ReassemblyEngine,
    capability::CapabilityKind,
    parse_har,
};
use folio_testing::{
    CaptureBuilder,
    FailingResolver,
    FragmentRecord,
    MemoryCatalog,
    MemoryStore,
    ReversibleCodec,
    StaticResolver,
};
use rstest::{fixture, rstest};

const ASIN: &str = "B00TEST";
const KEY: &str = "k1";
const METADATA: &str = r#"{"title":"The Book: Part 1","authorList":["Ann"],"cprJson":["seed"]}"#;

fn fragment_map(count: u32) -> String {
    format!(r#"{{"fragmentMetadata":{{"numberOfFragments":{count}}}}}"#)
}

fn encoded(plain: &str) -> String { ReversibleCodec::encode(plain, Some(KEY), true) }

#[fixture]
fn capture() -> CaptureBuilder {
    CaptureBuilder::new(ASIN)
        .vendor_scripts()
        .start_reading(KEY)
        .record(
            &FragmentRecord::new(0, encoded(r#"<p>zero <img dataUrl="img1"></p>"#))
                .flags(true, true)
                .asset("img1", Some("data:image/png;base64,AAA")),
        )
        .fragment(1, "<p>stale</p>")
}

fn store_with(count: u32) -> MemoryStore {
    MemoryStore::new("0")
        .with_info(ASIN, METADATA, &fragment_map(count))
        .with_fragment(
            ASIN,
            1,
            r##"<a href="#" onclick="KindleContentInterface.gotoPosition(3,5); return false;">x</a>"##,
            None,
            None,
        )
        .with_fragment(
            ASIN,
            2,
            &encoded("<p>two</p>"),
            Some(r#"{"encryption":1,"compression":1}"#),
            Some(r#"{"imageData":{"unused":null}}"#),
        )
}

fn scripts_only() -> CaptureLog {
    let capture = CaptureBuilder::new(ASIN).vendor_scripts().start_reading(KEY);
    parse_har(&capture.build()).expect("parse")
}

fn engine(capture: &CaptureBuilder) -> Result<ReassemblyEngine, Error> {
    let log = parse_har(&capture.build())?;
    ReassemblyEngine::prepare(ReassemblyConfig::default(), &log, &StaticResolver::default())
}

#[rstest]
#[tokio::test]
async fn capture_and_store_fragments_are_merged(capture: CaptureBuilder) {
    let engine = engine(&capture).expect("prepare");
    assert_eq!(engine.document_id().as_str(), ASIN);
    assert_eq!(engine.key().map(|key| key.as_str()), Some(KEY));

    let catalog = MemoryCatalog::new(vec![store_with(3)]);
    let reassembly = engine.reassemble(&catalog).await.expect("reassemble");
    assert_eq!(
        reassembly.document.body(),
        [
            r#"<p>zero <img src="data:image/png;base64,AAA"></p>"#,
            r##"<a href="#5">x</a>"##,
            "<p>two</p>",
        ]
    );
    assert_eq!(reassembly.info_store, "0");
    assert_eq!(reassembly.fragment_store.as_deref(), Some("0"));
    assert_eq!(reassembly.assets.len(), 1);
    assert_eq!(reassembly.document.metadata().authors, ["Ann"]);
}

#[rstest]
#[tokio::test]
async fn declared_count_one_too_high_is_tolerated(capture: CaptureBuilder) {
    let engine = engine(&capture).expect("prepare");
    let catalog = MemoryCatalog::new(vec![store_with(4)]);
    let reassembly = engine.reassemble(&catalog).await.expect("reassemble");
    assert_eq!(reassembly.document.body().len(), 3);
}

#[rstest]
#[tokio::test]
async fn gap_inside_declared_range_is_fatal(capture: CaptureBuilder) {
    let engine = engine(&capture).expect("prepare");
    let catalog = MemoryCatalog::new(vec![store_with(5)]);
    let err = engine.reassemble(&catalog).await.expect_err("gap");
    assert!(matches!(
        err,
        Error::Assembly(AssemblyError::MissingFragment { id }) if id == FragmentId::new(3)
    ));
}

#[rstest]
#[tokio::test]
async fn rendered_html_contains_body_in_order(capture: CaptureBuilder) {
    let engine = engine(&capture).expect("prepare");
    let catalog = MemoryCatalog::new(vec![store_with(3)]);
    let reassembly = engine.reassemble(&catalog).await.expect("reassemble");

    let mut out = Vec::new();
    HtmlRenderer
        .render(&reassembly.document, &mut out)
        .expect("render");
    let html = String::from_utf8(out).expect("utf-8");
    let zero = html.find("<p>zero").expect("fragment 0");
    let two = html.find("<p>two</p>").expect("fragment 2");
    assert!(zero < two);
    assert!(html.contains(r#"<body id="B00TEST">"#));
    assert_eq!(
        HtmlRenderer.file_name(&reassembly.document),
        "The-Book--Part-1.html"
    );
}

#[test]
fn two_page_loads_fail_before_any_store_is_touched() {
    let capture = CaptureBuilder::new(ASIN)
        .page("https://read.amazon.com/?asin=OTHER")
        .vendor_scripts();
    let catalog = MemoryCatalog::new(vec![store_with(3)]);
    let err = engine(&capture).expect_err("ambiguous capture");
    assert!(matches!(err, Error::Capture(folio::CaptureError::PageLoads { found: 2 })));
    assert_eq!(catalog.open_attempts(), 0);
}

#[test]
fn vendor_source_is_handed_to_the_resolver() {
    let log = scripts_only();
    let resolver = StaticResolver::default();
    ReassemblyEngine::prepare(ReassemblyConfig::default(), &log, &resolver).expect("prepare");
    let seen = resolver.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(
        seen[0].source(CapabilityKind::Compression),
        "KindleCompression={lz:function(){}}"
    );
    assert_eq!(
        seen[0].source(CapabilityKind::Decryption),
        "KindleO_Aaa={decrypt:function(){}}"
    );
}

#[test]
fn unavailable_capability_is_fatal() {
    let log = scripts_only();
    let err = ReassemblyEngine::prepare(
        ReassemblyConfig::default(),
        &log,
        &FailingResolver(CapabilityKind::Decryption),
    )
    .expect_err("resolver failure");
    assert!(matches!(err, Error::Capability(_)));
    assert!(err.to_string().contains("decryption"));
}

#[tokio::test]
async fn encrypted_fragment_without_key_is_fatal() {
    let capture = CaptureBuilder::new(ASIN)
        .vendor_scripts()
        .record(&FragmentRecord::new(0, encoded("<p/>")).flags(true, true));
    let engine = engine(&capture).expect("prepare");
    assert!(engine.key().is_none());
    let catalog = MemoryCatalog::new(vec![
        MemoryStore::new("0").with_info(ASIN, METADATA, &fragment_map(1)),
    ]);
    let err = engine.reassemble(&catalog).await.expect_err("no key");
    assert!(matches!(
        err,
        Error::Decode(DecodeError::MissingKey { id }) if id == FragmentId::zero()
    ));
}

#[rstest]
#[tokio::test]
async fn missing_document_info_is_fatal(capture: CaptureBuilder) {
    let engine = engine(&capture).expect("prepare");
    let catalog = MemoryCatalog::new(vec![MemoryStore::new("0").with_fragment(
        ASIN,
        0,
        "<p/>",
        None,
        None,
    )]);
    let err = engine.reassemble(&catalog).await.expect_err("no info");
    assert!(matches!(err, Error::DocumentInfoNotFound { .. }));
    assert_eq!(err.to_string(), "no record store holds document info for B00TEST");
}

#[rstest]
#[tokio::test]
async fn unknown_asset_reference_is_fatal(capture: CaptureBuilder) {
    let capture = capture.fragment(3, r#"<img dataUrl="ghost">"#);
    let engine = engine(&capture).expect("prepare");
    let catalog = MemoryCatalog::new(vec![store_with(4)]);
    let err = engine.reassemble(&catalog).await.expect_err("unresolved");
    assert_eq!(err.to_string(), "fragment 3 references unknown asset `ghost`");
}
