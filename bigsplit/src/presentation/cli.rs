use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Split big files into numbered chunk files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args)]
pub struct SplitArgs {
    /// file to split
    pub source: PathBuf,

    /// chunk size in MiB (default 10)
    #[arg(long, conflicts_with = "size_bytes", value_parser = clap::value_parser!(u64).range(1..))]
    pub size_mb: Option<u64>,

    /// chunk size in bytes
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub size_bytes: Option<u64>,

    /// output directory (defaults to <source dir>/SplitFiles)
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// copy buffer size in KiB
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u64).range(1..))]
    pub buffer_kb: u64,

    /// print the result as one JSON object on stdout
    #[arg(long)]
    pub json: bool,

    /// no progress bar
    #[arg(long, short)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split a file into `<name>_Split<N><ext>` chunks
    Split(SplitArgs),

    /// List the chunk files of a source in index order
    Chunks {
        source: PathBuf,
        /// output directory used for the split
        #[arg(long)]
        out: Option<PathBuf>,
    },
}
