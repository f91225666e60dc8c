//! Test doubles and fixtures for exercising the `folio` pipeline without a
//! browser profile or a vendor helper program.
//!
//! ```rust
//! use folio_testing::{CaptureBuilder, ReversibleCodec};
//!
//! let har = CaptureBuilder::new("B00TEST")
//!     .vendor_scripts()
//!     .start_reading("key")
//!     .fragment(0, &ReversibleCodec::encode("<p>hi</p>", Some("key"), false))
//!     .build();
//! assert!(har.contains("read.amazon.com"));
//! ```

pub mod capabilities;
pub mod har;
pub mod logging;
pub mod metrics;
pub mod stores;

pub use capabilities::{FailingResolver, ReversibleCodec, StaticResolver};
pub use har::{CaptureBuilder, FragmentRecord};
pub use logging::{LoggerHandle, logger};
pub use metrics::{Counters, counters, debugging_recorder_setup};
pub use stores::{MemoryCatalog, MemoryStore};
