use anyhow::{Context, Result};
use huffsplit_codec::decoder::{self, RunRecord};
use huffsplit_codec::{files, Alphabet, TopologyTable};
use serde::Serialize;

use crate::args::InspectArgs;
use crate::printing::{describe_topology, format_bytes};

#[derive(Debug, Serialize)]
struct Report<'a> {
    alphabet: Alphabet,
    bytes: usize,
    symbols: u64,
    runs: &'a [RunRecord],
}

pub fn inspect_stream(args: &InspectArgs) -> Result<()> {
    let data = files::read_file(&args.input).context("Failed to read input")?;
    let table = TopologyTable::shared(args.alphabet);
    let runs = decoder::inspect_stream(table, &data)
        .with_context(|| format!("Failed to parse {} as a segmented stream", args.input.display()))?;
    let symbols: u64 = runs.iter().map(|r| u64::from(r.length)).sum();

    if args.json {
        let report = Report {
            alphabet: args.alphabet,
            bytes: data.len(),
            symbols,
            runs: &runs,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("\n📊 Stream Information");
    println!("{}", "=".repeat(50));
    println!("File: {}", args.input.display());
    println!("Size: {}", format_bytes(data.len() as u64));
    println!("Alphabet: {} ({} topologies)", args.alphabet, table.len());
    println!("Symbols: {symbols}");
    println!("Runs: {}", runs.len());

    println!("\n{:>10} {:>5} {:>12} {:>10}  codes", "offset", "id", "length", "data");
    for run in &runs {
        let codes = table
            .topology(run.topology)
            .map(describe_topology)
            .unwrap_or_default();
        println!(
            "{:>10} {:>5} {:>12} {:>10}  {codes}",
            run.offset, run.topology.0, run.length, run.data_bytes
        );
    }
    Ok(())
}
