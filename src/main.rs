//! `folio` binary: rebuild a captured document as HTML.
//!
//! Reads a HAR capture, probes the browser's record stores and writes the
//! reassembled document. Any fatal error prints one message and exits 1.

mod cli;

use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use folio::{
    DocumentRenderer,
    HtmlRenderer,
    ReassemblyConfig,
    ReassemblyEngine,
    capability::ProcessResolver,
    capture::parse_har,
    store::SqliteCatalog,
};
use tracing::info;

const CHROME_STORE_DIRECTORY: &str =
    "Library/Application Support/Google/Chrome/Default/databases/https_read.amazon.com_0";

fn default_store_directory() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_default()
        .join(CHROME_STORE_DIRECTORY)
}

async fn run(cli: cli::Cli) -> folio::Result<PathBuf> {
    let text = tokio::fs::read_to_string(&cli.capture).await?;
    let log = parse_har(&text)?;
    let resolver = cli
        .decoder
        .map_or_else(|| ProcessResolver::bundled(cli.node), ProcessResolver::new);
    let engine = ReassemblyEngine::prepare(ReassemblyConfig::default(), &log, &resolver)?;

    let catalog = SqliteCatalog::new(cli.stores.unwrap_or_else(default_store_directory));
    info!(
        stores = %catalog.directory().display(),
        asin = %engine.document_id(),
        "reading record stores"
    );
    let reassembly = engine.reassemble(&catalog).await?;

    let renderer = HtmlRenderer;
    let mut html = Vec::new();
    renderer.render(&reassembly.document, &mut html)?;
    let output = cli
        .output
        .unwrap_or_else(|| Path::new(".").join(renderer.file_name(&reassembly.document)));
    tokio::fs::write(&output, html).await?;
    Ok(output)
}

#[tokio::main]
async fn main() -> ExitCode {
    // Applications embedding the library should install their own subscriber.
    tracing_subscriber::fmt::init();

    let cli = cli::Cli::parse();
    match run(cli).await {
        Ok(output) => {
            info!(path = %output.display(), "document written");
            println!("{}", output.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("folio: {err}");
            ExitCode::FAILURE
        }
    }
}
