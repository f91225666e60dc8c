#![doc(html_root_url = "https://docs.rs/folio/latest")]
//! Public API for the `folio` library.
//!
//! This crate rebuilds a complete document from fragments captured in a
//! browser network log and in the browser's local record stores. The pipeline
//! reconciles the capture, locates the document index, decodes every fragment
//! through injected capabilities, resolves references and assembles the
//! fragments in order.

pub mod capability;
pub mod capture;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod fragment;
pub mod metrics;
pub mod store;

pub use capability::{
    Capabilities,
    CapabilityError,
    CapabilityFault,
    CapabilityResolver,
    CompressionDictionary,
    DecompressCapability,
    DecryptCapability,
    DecryptionKey,
    DictionaryBuilderCapability,
    VendorSource,
};
pub use capture::{
    CaptureError,
    CaptureIndex,
    CaptureLog,
    CaptureReconciler,
    DocumentId,
    parse_har,
};
pub use config::{MarkerPair, ReassemblyConfig};
pub use document::{
    AssembledDocument,
    AssemblyError,
    CompressionSeed,
    DocumentAssembler,
    DocumentInfo,
    DocumentMetadata,
    DocumentRenderer,
    FragmentMap,
    HtmlRenderer,
    ReferenceResolver,
    ResolveError,
    output_file_name,
};
pub use engine::{Reassembly, ReassemblyEngine};
pub use error::{Error, Result};
pub use fragment::{
    AssetInsert,
    AssetMap,
    CaptureRecords,
    DecodeError,
    DecodedFragment,
    FragmentDecoder,
    FragmentId,
    FragmentMetadata,
    RawFragment,
    RawSkeleton,
};
pub use store::{
    FragmentSource,
    FragmentStoreLocator,
    FragmentsTableSource,
    LegacyInfoSource,
    LocatedStores,
    RecordStore,
    SqliteCatalog,
    SqliteStore,
    StoreCatalog,
    StoreError,
};
