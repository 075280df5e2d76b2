use std::collections::BTreeMap;

use kinetica::{EventHistory, ReactionScheduler, Species, Surface, parse_rules};

const RULES: &str = "\
# SIR-style epidemic on a lattice
I + H -> I + I, 1.0
I -> R, 0.5
";

fn main() {
    println!("═══════════════════════════════════════════════════════");
    println!("  Kinetica — Stochastic Surface Reaction Kernel");
    println!("  Epidemic demo + determinism verification");
    println!("═══════════════════════════════════════════════════════");
    println!();

    // ── Run 1 ─────────────────────────────────────────────────
    let hash_1 = run_simulation("Run 1", 42);

    // ── Run 2: identical seed ─────────────────────────────────
    let hash_2 = run_simulation("Run 2", 42);

    // ── Verify ────────────────────────────────────────────────
    println!("  Verification:");
    println!("    Run 1 trace hash: {:016x}", hash_1);
    println!("    Run 2 trace hash: {:016x}", hash_2);
    if hash_1 == hash_2 {
        println!("    ✓ Traces are IDENTICAL — deterministic replay confirmed.");
    } else {
        println!("    ✗ MISMATCH — determinism violation detected!");
    }
}

fn run_simulation(label: &str, seed: u64) -> u64 {
    let rules = parse_rules(RULES).expect("demo rule set is valid");

    // 16x16 lattice of healthy sites with one infected seed.
    let mut surface = Surface::square_grid(16, 16, "H");
    let center = surface
        .node_at(kinetica::Position::new(8, 8))
        .expect("center exists");
    surface.set_state(center, Species::from("I"));

    let mut scheduler = ReactionScheduler::new(surface, rules, seed, 50.0);
    let mut history = EventHistory::new();

    while !scheduler.done() {
        if let Some(event) = scheduler.process_next_reaction() {
            history.record(&event);
        }
    }

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for id in scheduler.surface().node_ids().collect::<Vec<_>>() {
        *counts.entry(scheduler.surface().state(id).as_str()).or_default() += 1;
    }

    println!(
        "  {}: {} reactions fired, final {} at seed {}",
        label,
        history.len(),
        scheduler.time(),
        seed
    );
    print!("    Final composition:");
    for (species, count) in &counts {
        print!(" {}={}", species, count);
    }
    println!();
    println!();

    history.trace_hash()
}
