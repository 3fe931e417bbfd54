use huffsplit_codec::{Plan, Topology, TopologyTable};

/// Human-readable byte count.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.2} {}", UNITS[unit])
    }
}

/// Codewords of a topology, e.g. `A=1 C=01 G=00`.
pub fn describe_topology(topology: &Topology) -> String {
    topology
        .domain()
        .iter()
        .filter_map(|s| topology.codeword(s).map(|c| format!("{s}={c}")))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn print_size_summary(input: usize, output: usize) {
    let ratio = if output == 0 {
        0.0
    } else {
        input as f64 / output as f64
    };
    let bits_per_base = if input == 0 {
        0.0
    } else {
        output as f64 * 8.0 / input as f64
    };
    println!("\n📦 Size");
    println!("  • Input: {} ({input} bases)", format_bytes(input as u64));
    println!("  • Output: {}", format_bytes(output as u64));
    println!("  • Ratio: {ratio:.2}x ({bits_per_base:.3} bits/base)");
}

pub fn print_plan_summary(plan: &Plan, table: &TopologyTable) {
    println!("\n🧩 Plan");
    println!("  • Runs: {}", plan.num_runs());
    println!("  • Planned size: {} bits ({} bytes)", plan.total_bits, plan.total_bytes());
    println!("  • Topology table: {} ({} entries)", table.alphabet(), table.len());
    if plan.num_runs() <= 8 {
        for seg in &plan.segments {
            let codes = table
                .topology(seg.topology)
                .map(describe_topology)
                .unwrap_or_default();
            println!(
                "    - [{}, {}) topology {} ({codes})",
                seg.start, seg.end, seg.topology
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use huffsplit_codec::{Alphabet, TopologyId};

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(12), "12 B");
        assert_eq!(format_bytes(2048), "2.00 KiB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.00 MiB");
    }

    #[test]
    fn test_describe_topology() {
        let table = TopologyTable::shared(Alphabet::Dna5);
        let topo = table.topology(TopologyId(10)).unwrap();
        assert_eq!(describe_topology(topo), "C=1 T=0");
    }
}
