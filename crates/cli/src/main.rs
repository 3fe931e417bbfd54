mod args;
mod commands;
pub mod defaults;
mod printing;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use args::{CompressArgs, DecompressArgs, InspectArgs, MergeArgs, SplitArgs};
use commands::{compress, decompress, inspect, merge, split};

/// huffsplit: segmented prefix-code compression for DNA
///
/// Splits a nucleotide sequence into runs and codes each run with the
/// cheapest prefix code from a fixed table, switching codes only where the
/// new header pays for itself.
#[derive(Parser, Debug)]
#[command(name = "huffsplit")]
#[command(author, version, about = "Compresses nucleotide sequences with segmented prefix codes", long_about = None)]
struct Cli {
    /// Number of threads to use for parallel processing
    ///
    /// If not specified, defaults to the number of logical CPUs.
    #[arg(short = 't', long, global = true)]
    threads: Option<usize>,

    /// Log filter for diagnostics on stderr (e.g. "debug", "huffsplit_codec=trace")
    #[arg(long, global = true, default_value = defaults::LOG_LEVEL)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compress a nucleotide file.
    Compress(CompressArgs),

    /// Restore a compressed file.
    Decompress(DecompressArgs),

    /// Split a file into independently coded parts.
    ///
    /// Each run chosen by the planner becomes one single-tree file.
    Split(SplitArgs),

    /// Merge part files written by `split`.
    Merge(MergeArgs),

    /// List the runs of a segmented stream.
    Inspect(InspectArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level)
        .with_context(|| format!("Invalid log filter: {}", cli.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }
    debug!(threads = rayon::current_num_threads(), "thread pool ready");

    match cli.command {
        Commands::Compress(args) => compress::compress_file(&args)?,
        Commands::Decompress(args) => decompress::decompress_file(&args)?,
        Commands::Split(args) => split::split_file(&args)?,
        Commands::Merge(args) => merge::merge_files(&args)?,
        Commands::Inspect(args) => inspect::inspect_stream(&args)?,
    }

    Ok(())
}
