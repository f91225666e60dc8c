//! Asset name collisions are logged but never replace the first payload.

use folio::{AssetInsert, AssetMap};
use folio_testing::{LoggerHandle, logger};
use log::Level;
use rstest::rstest;
use serial_test::serial;

#[rstest]
#[serial]
fn conflicting_payload_logs_a_warning(mut logger: LoggerHandle) {
    logger.clear();
    let mut assets = AssetMap::new();
    assets.insert("cover", "data:first");
    assert_eq!(assets.insert("cover", "data:second"), AssetInsert::Conflict);

    let warnings = logger.drain_messages(Level::Warn);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("asset `cover`"), "unexpected warning: {warnings:?}");
    assert_eq!(assets.get("cover"), Some("data:first"));
}

#[rstest]
#[serial]
fn identical_payload_is_silent(mut logger: LoggerHandle) {
    logger.clear();
    let mut assets = AssetMap::new();
    assets.insert("cover", "data:same");
    assets.insert("cover", "data:same");
    assert!(logger.drain_messages(Level::Warn).is_empty());
}
