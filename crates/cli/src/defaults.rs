//! Shared default values for command-line options.

/// Output format for `compress`/`decompress`.
pub const FORMAT: &str = "segmented";

/// Alphabet for segmented streams.
pub const ALPHABET: &str = "dna5";

/// `tracing` filter directive; diagnostics go to stderr.
pub const LOG_LEVEL: &str = "warn";

/// Template for the split progress bar.
pub const PROGRESS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} parts ({eta})";
