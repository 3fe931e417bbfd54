use anyhow::{Context, Result};
use huffsplit_codec::{files, Alphabet, Codec, Format, Segmented, SingleTree};

use crate::args::CompressArgs;
use crate::printing::{print_plan_summary, print_size_summary};

pub fn compress_file(args: &CompressArgs) -> Result<()> {
    println!("🧬 huffsplit - Compress");
    println!("============================================\n");

    let input = files::read_file(&args.input).context("Failed to read input")?;

    let output = match args.format {
        Format::Segmented => {
            let codec = Segmented {
                alphabet: args.alphabet,
                single_run: args.single_run,
            };
            let symbols = args
                .alphabet
                .parse(&input)
                .with_context(|| format!("Invalid input in {}", args.input.display()))?;
            let (plan, bytes) = codec
                .encode_symbols(&symbols)
                .context("Failed to encode sequence")?;
            print_plan_summary(&plan, codec.table());
            bytes
        }
        Format::SingleTree => {
            if args.alphabet != Alphabet::Dna4 {
                println!("⚠️  Note: single-tree files always use the dna4 alphabet.");
            }
            if args.single_run {
                println!("⚠️  Note: --single-run has no effect on single-tree files.");
            }
            SingleTree
                .encode(&input)
                .with_context(|| format!("Failed to encode {}", args.input.display()))?
        }
    };

    files::write_file(&args.output, &output).context("Failed to write output")?;

    print_size_summary(input.len(), output.len());
    println!(
        "\n✓ Compressed {} → {} ({})",
        args.input.display(),
        args.output.display(),
        args.format
    );
    Ok(())
}
