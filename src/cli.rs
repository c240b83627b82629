use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "citepin",
    version,
    about = "Chunk-to-page localization and highlight tooling for extracted documents"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Locate(LocateArgs),
    Batch(BatchArgs),
    Inspect(InspectArgs),
}

#[derive(Args, Debug, Clone)]
pub struct LocateArgs {
    #[arg(long)]
    pub extraction: PathBuf,

    #[arg(long)]
    pub chunk: String,

    #[arg(long, default_value_t = 24)]
    pub probe_length: usize,

    #[arg(long, default_value_t = 0.7)]
    pub acceptance_threshold: f64,

    #[arg(long, default_value_t = 5)]
    pub scan_stride: usize,

    #[arg(long, default_value_t = 12.0)]
    pub fallback_fragment_height: f64,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    #[arg(long)]
    pub extraction_root: PathBuf,

    #[arg(long)]
    pub citations: PathBuf,

    #[arg(long, default_value_t = 24)]
    pub probe_length: usize,

    #[arg(long, default_value_t = 0.7)]
    pub acceptance_threshold: f64,

    #[arg(long, default_value_t = 5)]
    pub scan_stride: usize,

    #[arg(long, default_value_t = 12.0)]
    pub fallback_fragment_height: f64,

    #[arg(long)]
    pub report_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    #[arg(long)]
    pub extraction: PathBuf,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}
