use anyhow::{Context, Result};
use ratchet_sim::simulation::{Configuration, ExecutionConfig};
use std::fs;

use crate::args::InitArgs;
use crate::printing::print_parameters;

pub fn init_simulation(args: &InitArgs) -> Result<()> {
    let config = build_config(args)?;

    println!("🧬 Ratchet - Muller's Ratchet Simulator");
    println!("============================================\n");
    println!("Configuration:");
    print_parameters(&config);

    let json = config.to_json()?;
    fs::write(&args.output, json)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!("✓ Configuration written: {}", args.output.display());
    println!("\nSimulation initialized successfully!");
    println!(
        "\n💡 Use 'ratchet run --config {}' to start the simulation",
        args.output.display()
    );

    Ok(())
}

/// Assemble and validate the configuration described by the flags.
pub fn build_config(args: &InitArgs) -> Result<Configuration> {
    let mut execution = ExecutionConfig::default();
    args.execution.apply(&mut execution);
    let config = Configuration::new(args.model.to_parameters(), execution);
    config.validate().context("Invalid model parameters")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::{ExecutionArgs, ModelArgs};
    use ratchet_sim::evolution::Algorithm;
    use ratchet_sim::simulation::TimeScale;
    use std::path::PathBuf;

    fn default_args() -> InitArgs {
        InitArgs {
            model: ModelArgs {
                population_size: 1000,
                mutation: 0.4,
                selection: 0.1,
                backmutation: 0.0001,
                initial_mutations: 0,
            },
            execution: ExecutionArgs {
                generations: None,
                algorithm: None,
                dont_rescale: false,
                seed: None,
                parallel: false,
                lookback_window: None,
            },
            output: PathBuf::from("ratchet.json"),
        }
    }

    #[test]
    fn test_build_config_defaults() {
        let config = build_config(&default_args()).unwrap();
        assert_eq!(config, Configuration::default());
    }

    #[test]
    fn test_build_config_overrides() {
        let mut args = default_args();
        args.model.population_size = 50;
        args.execution.generations = Some(20);
        args.execution.algorithm = Some(Algorithm::Direct);
        args.execution.dont_rescale = true;
        args.execution.seed = Some(7);

        let config = build_config(&args).unwrap();
        assert_eq!(config.model.population_size, 50);
        assert_eq!(config.execution.generations, 20);
        assert_eq!(config.execution.algorithm, Algorithm::Direct);
        assert_eq!(config.execution.time_scale, TimeScale::Generations);
        assert_eq!(config.execution.seed, Some(7));
    }

    #[test]
    fn test_build_config_rejects_invalid() {
        let mut args = default_args();
        args.model.selection = 1.5;
        assert!(build_config(&args).is_err());
    }
}
