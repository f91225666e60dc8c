//! Document-level data and the final pipeline stages.
//!
//! Metadata and the fragment map come from the record stores. The
//! [`ReferenceResolver`] rewrites decoded fragments once every asset is known,
//! the [`DocumentAssembler`] orders them into an [`AssembledDocument`], and a
//! [`DocumentRenderer`] serialises the result.

pub mod assembler;
pub mod error;
pub mod metadata;
pub mod render;
pub mod resolver;

pub use assembler::{AssembledDocument, DocumentAssembler};
pub use error::{AssemblyError, ResolveError};
pub use metadata::{CompressionSeed, DocumentInfo, DocumentMetadata, FragmentMap};
pub use render::{DocumentRenderer, HtmlRenderer, output_file_name};
pub use resolver::ReferenceResolver;
