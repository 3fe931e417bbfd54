use anyhow::{Context, Result};
use huffsplit_codec::alphabet::to_ascii;
use huffsplit_codec::files;
use huffsplit_codec::strategies::merge_parts;

use crate::args::MergeArgs;
use crate::printing::format_bytes;

pub fn merge_files(args: &MergeArgs) -> Result<()> {
    println!("🧬 huffsplit - Merge");
    println!("============================================\n");

    let paths = files::discover_parts(&args.prefix).context("Failed to find parts")?;
    println!("📂 Found {} parts", paths.len());

    let parts = paths
        .iter()
        .map(|p| files::read_file(p))
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to read parts")?;
    let input_bytes: usize = parts.iter().map(Vec::len).sum();

    let symbols = merge_parts(&parts).context("Failed to decode parts")?;
    let restored = to_ascii(&symbols);
    files::write_file(&args.output, &restored).context("Failed to write output")?;

    println!("  • Input: {}", format_bytes(input_bytes as u64));
    println!("  • Restored: {} bases", restored.len());
    println!("\n✓ Merged into {}", args.output.display());
    Ok(())
}
