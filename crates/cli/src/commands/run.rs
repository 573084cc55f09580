use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use ratchet_sim::simulation::{Configuration, ExecutionConfig, Simulation};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use tracing::{info, warn};

use crate::args::{OutputFormat, RunArgs};
use crate::printing::{format_record, header_line};

pub fn run_simulation(args: &RunArgs) -> Result<()> {
    let config = load_config(args)?;
    let time_scale = config.execution.time_scale;

    let mut sim = Simulation::new(config).context("Failed to initialize simulation")?;

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    if args.header {
        if args.format == OutputFormat::Json {
            warn!("--header is ignored for json output");
        } else {
            writeln!(out, "{}", header_line())?;
        }
    }

    let pb = if args.progress {
        let pb = ProgressBar::new(sim.total_generations() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {per_sec}",
                )?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    info!(
        algorithm = %sim.algorithm(),
        generations = sim.total_generations(),
        "starting run"
    );

    sim.run_with(|snapshot| {
        writeln!(out, "{}", format_record(snapshot, args.format, time_scale)?)
            .context("Failed to write record")?;
        if let Some(pb) = &pb {
            pb.set_position(snapshot.generation as u64);
        }
        Ok::<(), anyhow::Error>(())
    })
    .with_context(|| format!("Simulation failed at generation {}", sim.generation()))?;

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }

    out.flush().context("Failed to flush output")?;
    Ok(())
}

/// Configuration from `--config` or the model flags, with execution flags
/// applied on top.
fn load_config(args: &RunArgs) -> Result<Configuration> {
    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Configuration::from_json(&json)
                .with_context(|| format!("Invalid configuration in {}", path.display()))?
        }
        None => Configuration::new(args.model.to_parameters(), ExecutionConfig::default()),
    };
    args.execution.apply(&mut config.execution);
    Ok(config)
}
