use anyhow::{Context, Result};
use huffsplit_codec::strategies::split_symbols;
use huffsplit_codec::{files, Alphabet, TopologyTable};
use indicatif::{ProgressBar, ProgressStyle};

use crate::args::SplitArgs;
use crate::defaults;
use crate::printing::{print_plan_summary, print_size_summary};

pub fn split_file(args: &SplitArgs) -> Result<()> {
    println!("🧬 huffsplit - Split");
    println!("============================================\n");

    let input = files::read_file(&args.input).context("Failed to read input")?;
    let symbols = Alphabet::Dna4
        .parse(&input)
        .with_context(|| format!("Invalid input in {}", args.input.display()))?;

    let out = split_symbols(&symbols).context("Failed to encode parts")?;
    print_plan_summary(&out.plan, TopologyTable::shared(Alphabet::Dna4));

    let pb = if args.progress {
        let pb = ProgressBar::new(out.parts.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(defaults::PROGRESS_TEMPLATE)
                .context("Invalid progress template")?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let paths = files::write_parts(&args.prefix, &out.parts, |_, _| {
        if let Some(pb) = &pb {
            pb.inc(1);
        }
    })
    .context("Failed to write parts")?;

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }

    print_size_summary(input.len(), out.total_bytes());
    if let (Some(first), Some(last)) = (paths.first(), paths.last()) {
        println!(
            "\n✓ Wrote {} parts: {} .. {}",
            paths.len(),
            first.display(),
            last.display()
        );
    }
    Ok(())
}
