//! Command line interface for the `folio` binary.
//!
//! Kept free of library dependencies so the build script can render a man
//! page from it.

use std::path::PathBuf;

use clap::Parser;

/// Command line arguments for the `folio` binary.
#[derive(Debug, Parser)]
#[command(
    name = "folio",
    version,
    about = "Rebuild a captured web-reader document as a single HTML file"
)]
pub struct Cli {
    /// HAR capture of exactly one reader session.
    pub capture: PathBuf,

    /// Directory of browser record stores; defaults to the Chrome profile's
    /// reader database directory.
    #[arg(short, long, value_name = "DIR")]
    pub stores: Option<PathBuf>,

    /// Node runtime used to run the bundled decode helper.
    #[arg(long, value_name = "PROGRAM", default_value = "node")]
    pub node: PathBuf,

    /// Custom helper program replacing the bundled decode helper.
    #[arg(short, long, value_name = "PROGRAM")]
    pub decoder: Option<PathBuf>,

    /// Output file; defaults to a name derived from the document title.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}
