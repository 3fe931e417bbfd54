use anyhow::{Context, Result};
use huffsplit_codec::{files, CodecOptions};

use crate::args::DecompressArgs;
use crate::printing::format_bytes;

pub fn decompress_file(args: &DecompressArgs) -> Result<()> {
    println!("🧬 huffsplit - Decompress");
    println!("============================================\n");

    let data = files::read_file(&args.input).context("Failed to read input")?;
    let codec = CodecOptions::new(args.format, args.alphabet);
    let restored = codec
        .decode(&data)
        .with_context(|| format!("Failed to decode {} as {}", args.input.display(), args.format))?;

    files::write_file(&args.output, &restored).context("Failed to write output")?;

    println!("  • Input: {}", format_bytes(data.len() as u64));
    println!("  • Restored: {} bases", restored.len());
    println!(
        "\n✓ Decompressed {} → {}",
        args.input.display(),
        args.output.display()
    );
    Ok(())
}
