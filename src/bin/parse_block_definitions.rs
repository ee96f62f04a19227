//! Build the block mapping JSON from a Mineways source checkout.
//!
//! Run with: cargo run --bin parse-block-definitions -- --source-dir path/to/mineways

use std::path::PathBuf;
use std::process::ExitCode;

use block_mappings::{Error, Pipeline, SourcePaths};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "parse-block-definitions")]
#[command(about = "Extract block colors and flags from Mineways sources into a JSON map")]
struct Args {
    /// Directory holding blockInfo.h, blockInfo.cpp, nbt.cpp and tiles.h
    #[arg(long, default_value = "src_code_in_mineways")]
    source_dir: PathBuf,

    #[arg(long)]
    block_info_header: Option<PathBuf>,

    #[arg(long)]
    block_info_source: Option<PathBuf>,

    #[arg(long)]
    translations: Option<PathBuf>,

    #[arg(long)]
    tiles: Option<PathBuf>,

    #[arg(long, short, default_value = "block_mappings.json")]
    output: PathBuf,
}

impl Args {
    fn source_paths(&self) -> SourcePaths {
        let mut paths = SourcePaths::from_dir(&self.source_dir);
        if let Some(p) = &self.block_info_header {
            paths.block_info_header = p.clone();
        }
        if let Some(p) = &self.block_info_source {
            paths.block_info_source = p.clone();
        }
        if let Some(p) = &self.translations {
            paths.translations = p.clone();
        }
        if let Some(p) = &self.tiles {
            paths.tiles = p.clone();
        }
        paths
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> block_mappings::Result<()> {
    let sources = args.source_paths().read()?;
    let output = Pipeline::default().run(&sources)?;
    output.log();

    // Serialize fully before touching the destination.
    let json = output.map.to_json()?;
    std::fs::write(&args.output, json)
        .map_err(|e| Error::Io(format!("{}: {}", args.output.display(), e)))?;

    info!(
        "wrote {} block mappings to {}",
        output.map.len(),
        args.output.display()
    );
    Ok(())
}
