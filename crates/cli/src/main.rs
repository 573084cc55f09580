mod args;
mod commands;
pub mod defaults;
mod printing;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use args::{InitArgs, RunArgs};
use commands::{header, init, run};

/// Ratchet: A Muller's Ratchet Simulator
///
/// This tool simulates how deleterious mutations accumulate in an asexual
/// population of fixed size under selection, mutation and back-mutation.
#[derive(Parser, Debug)]
#[command(name = "ratchet")]
#[command(author, version, about = "Simulates Muller's ratchet in asexual populations", long_about = None)]
struct Cli {
    /// Number of threads to use for parallel processing
    ///
    /// If not specified, defaults to the number of logical CPUs.
    #[arg(long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a simulation and write one record per report interval.
    ///
    /// The initial population is reported first. Time is counted in units
    /// of N generations unless --dont-rescale is given.
    Run(Box<RunArgs>),

    /// Print the column header of plain records.
    Header,

    /// Write a simulation configuration file.
    ///
    /// Sets up the parameters for a new experiment but does not run it.
    Init(Box<InitArgs>),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(defaults::LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    match cli.command {
        Commands::Run(args) => {
            run::run_simulation(&args)?;
        }
        Commands::Header => {
            header::print_header();
        }
        Commands::Init(args) => {
            init::init_simulation(&args)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_flags() {
        let cli = Cli::try_parse_from([
            "ratchet", "--threads", "2", "run", "-N", "50", "-t", "10", "-m", "0.3", "-s", "0.05",
            "-b", "0", "-i", "1", "-a", "direct", "-d", "--seed", "9",
        ])
        .unwrap();

        assert_eq!(cli.threads, Some(2));
        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.model.population_size, 50);
        assert_eq!(args.model.initial_mutations, 1);
        assert_eq!(args.execution.generations, Some(10));
        assert!(args.execution.dont_rescale);
        assert_eq!(args.execution.seed, Some(9));
    }
}
