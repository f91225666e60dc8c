//! Fragment and skeleton records carried by captured JSONP responses.
//!
//! Each response has the shape `callback({...});`. Responses from other
//! endpoints that share the suffix but not the shape are skipped.

use std::{
    collections::{BTreeMap, btree_map::Entry},
    sync::LazyLock,
};

use log::debug;
use regex::Regex;
use serde::Deserialize;

use super::{FragmentId, RawFragment, RawSkeleton, record::MetadataJson};
use crate::{capture::CaptureIndex, config::ReassemblyConfig};

static JSONP_CALL: LazyLock<Regex> = LazyLock::new(jsonp_call);

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
fn jsonp_call() -> Regex { Regex::new(r"(?s)^\w+\((.*)\);\s*$").expect("valid JSONP pattern") }

#[derive(Deserialize)]
struct JsonpRecord {
    #[serde(rename = "fragmentData")]
    fragment_data: Option<String>,
    #[serde(rename = "fragmentMetadata")]
    fragment_metadata: Option<MetadataJson>,
    #[serde(default, rename = "imageData")]
    image_data: Option<BTreeMap<String, Option<String>>>,
    #[serde(rename = "skeletonData")]
    skeleton_data: Option<String>,
    #[serde(rename = "skeletonMetadata")]
    skeleton_metadata: Option<MetadataJson>,
}

/// Encoded records recovered from the capture, keyed by identifier.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CaptureRecords {
    /// Content fragments.
    pub fragments: BTreeMap<FragmentId, RawFragment>,
    /// Layout skeletons.
    pub skeletons: BTreeMap<FragmentId, RawSkeleton>,
}

impl CaptureRecords {
    /// Collect every fragment and skeleton record from the capture.
    ///
    /// Responses are visited in identifier order; when two responses carry
    /// the same fragment id the first one is kept.
    #[must_use]
    pub fn from_capture(capture: &CaptureIndex, config: &ReassemblyConfig) -> Self {
        let mut records = Self::default();
        for (identifier, body) in capture.with_suffix(&config.record_suffix) {
            match parse_jsonp(body) {
                Some(record) => records.absorb(identifier, record),
                None => debug!("skipping `{identifier}`: not a JSONP record"),
            }
        }
        records
    }

    fn absorb(&mut self, identifier: &str, record: JsonpRecord) {
        if let (Some(data), Some(meta)) = (record.fragment_data, record.fragment_metadata) {
            match meta.id {
                Some(id) => {
                    let assets = record.image_data.unwrap_or_default();
                    let fragment = RawFragment {
                        metadata: meta.with_id(id),
                        payload: data,
                        assets,
                    };
                    if let Entry::Vacant(vacant) = self.fragments.entry(id) {
                        vacant.insert(fragment);
                    } else {
                        debug!("`{identifier}` repeats fragment {id}; keeping the earlier copy");
                    }
                }
                None => debug!("`{identifier}` carries a fragment without an id"),
            }
        }
        if let (Some(data), Some(meta)) = (record.skeleton_data, record.skeleton_metadata) {
            if let Some(id) = meta.id {
                self.skeletons.entry(id).or_insert(RawSkeleton {
                    metadata: meta.with_id(id),
                    payload: data,
                });
            }
        }
    }
}

fn parse_jsonp(body: &str) -> Option<JsonpRecord> {
    let captures = JSONP_CALL.captures(body)?;
    let json = captures.get(1)?.as_str();
    serde_json::from_str(json).ok()
}
