use anyhow::Result;
use ratchet_sim::simulation::{header_fields, Configuration, Snapshot, TimeScale};

use crate::args::OutputFormat;

/// The column header line.
pub fn header_line() -> String {
    header_fields().join(" ")
}

/// Format a mean mutation count with at most three fractional digits.
pub fn format_m1(value: f64) -> String {
    let text = format!("{value:.3}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

/// Format one report record.
pub fn format_record(
    snapshot: &Snapshot,
    format: OutputFormat,
    time_scale: TimeScale,
) -> Result<String> {
    let record = match format {
        OutputFormat::Plain => format_plain(snapshot),
        OutputFormat::Human => format_human(snapshot, time_scale),
        OutputFormat::Json => serde_json::to_string(snapshot)?,
    };
    Ok(record)
}

fn format_plain(snapshot: &Snapshot) -> String {
    let mut line = format!(
        "{} {} {} {} {} {} {} ",
        snapshot.time,
        snapshot.population_size,
        snapshot.selection,
        snapshot.mutation,
        snapshot.backmutation,
        snapshot.fittest_class,
        format_m1(snapshot.mean_above_fittest),
    );
    line.extend(snapshot.distribution.iter().map(|count| format!("{count};")));
    line
}

fn format_human(snapshot: &Snapshot, time_scale: TimeScale) -> String {
    let mut line = match time_scale {
        TimeScale::Rescaled => format!("t:{}N ", snapshot.time),
        TimeScale::Generations => format!("t:{} ", snapshot.time),
    };
    line.push_str(&format!(
        "N:{} s:{} m:{} b:{} K*:{} M1:{} ",
        snapshot.population_size,
        snapshot.selection,
        snapshot.mutation,
        snapshot.backmutation,
        snapshot.fittest_class,
        format_m1(snapshot.mean_above_fittest),
    ));
    line.extend(
        snapshot
            .full_distribution()
            .map(|(class, count)| format!("{class}:{count} ")),
    );
    line
}

pub fn print_parameters(config: &Configuration) {
    let model = &config.model;
    let execution = &config.execution;

    println!("\n📋 Simulation Configuration");
    println!("  • Population Size: {} [-N, --population-size]", model.population_size);
    match execution.time_scale {
        TimeScale::Rescaled => println!(
            "  • Run Length: {} × N generations [-t, --generations]",
            execution.generations
        ),
        TimeScale::Generations => println!(
            "  • Run Length: {} generations [-t, --generations] [-d, --dont-rescale]",
            execution.generations
        ),
    }
    if let Some(seed) = execution.seed {
        println!("  • Random Seed: {seed} [--seed]");
    } else {
        println!("  • Random Seed: Random [--seed]");
    }

    println!("\n⚡ Model Parameters");
    println!("  • Mutation (m): {} [-m, --mutation]", model.mutation);
    println!("  • Selection (s): {} [-s, --selection]", model.selection);
    println!("  • Back-mutation (b): {} [-b, --backmutation]", model.backmutation);
    println!(
        "  • Initial Mutations: {} [-i, --initial-mutations]",
        model.initial_mutations
    );

    println!("\n🎲 Reproduction");
    println!("  • Algorithm: {} [-a, --algorithm]", execution.algorithm);
    println!("  • Parallel Draws: {} [--parallel]", execution.parallel);
    println!(
        "  • Look-back Window: {} classes [--lookback-window]",
        execution.lookback_window
    );
    println!();
}
