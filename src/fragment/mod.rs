//! Fragment records and the decode stage.
//!
//! This module collects the domain types for encoded and decoded fragments,
//! the shared asset map, the capture-side JSONP record parser and the
//! decoder that drives the injected capabilities. Each sub-module focuses on
//! a single concept.

pub mod asset;
pub mod decoder;
pub mod error;
pub mod id;
pub mod jsonp;
pub mod record;

pub use asset::{AssetInsert, AssetMap};
pub use decoder::FragmentDecoder;
pub use error::{DecodeError, DecodeStep};
pub use id::FragmentId;
pub use jsonp::CaptureRecords;
pub use record::{DecodedFragment, FragmentMetadata, RawFragment, RawSkeleton};
