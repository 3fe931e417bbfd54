use clap::Args;
use huffsplit_codec::{Alphabet, Format};
use std::path::PathBuf;

use crate::defaults;

#[derive(Args, Debug)]
pub struct CompressArgs {
    /// Input file of ASCII nucleotides (no newlines or headers)
    pub input: PathBuf,

    /// Output file
    pub output: PathBuf,

    /// Output format (segmented, single-tree)
    #[arg(short, long, default_value = defaults::FORMAT)]
    pub format: Format,

    /// Alphabet (dna4 = ACGT, dna5 = ACGTN)
    ///
    /// The single-tree format always uses dna4.
    #[arg(short, long, default_value = defaults::ALPHABET)]
    pub alphabet: Alphabet,

    /// Encode the whole input as one run (segmented format only)
    #[arg(long)]
    pub single_run: bool,
}

#[derive(Args, Debug)]
pub struct DecompressArgs {
    /// Compressed input file
    pub input: PathBuf,

    /// Output file for the restored nucleotides
    pub output: PathBuf,

    /// Format of the input (segmented, single-tree)
    #[arg(short, long, default_value = defaults::FORMAT)]
    pub format: Format,

    /// Alphabet the stream was written with
    #[arg(short, long, default_value = defaults::ALPHABET)]
    pub alphabet: Alphabet,
}

#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Input file of ASCII nucleotides over ACGT
    pub input: PathBuf,

    /// Prefix for part files; parts are named <prefix>1, <prefix>2, ...
    pub prefix: PathBuf,

    /// Show a progress bar while writing parts
    #[arg(long)]
    pub progress: bool,
}

#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Prefix the parts were written with
    pub prefix: PathBuf,

    /// Output file for the restored nucleotides
    pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Segmented stream to inspect
    pub input: PathBuf,

    /// Alphabet the stream was written with
    #[arg(short, long, default_value = defaults::ALPHABET)]
    pub alphabet: Alphabet,

    /// Print a JSON report instead of a table
    #[arg(long)]
    pub json: bool,
}
