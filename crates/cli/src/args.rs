use clap::{Args, ValueEnum};
use ratchet_sim::evolution::Algorithm;
use ratchet_sim::simulation::{ExecutionConfig, ModelParameters, TimeScale};
use std::path::PathBuf;

use crate::defaults;

/// Parameters of the population-genetic model.
#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// Population size (N)
    #[arg(short = 'N', long, default_value_t = defaults::POPULATION_SIZE)]
    pub population_size: usize,

    /// Expected number of new deleterious mutations per offspring (m)
    #[arg(short, long, default_value_t = defaults::MUTATION, allow_negative_numbers = true)]
    pub mutation: f64,

    /// Fitness cost per mutation, in [0, 1] (s)
    #[arg(short, long, default_value_t = defaults::SELECTION, allow_negative_numbers = true)]
    pub selection: f64,

    /// Per-mutation reversion probability per generation, in [0, 1] (b)
    #[arg(short, long, default_value_t = defaults::BACKMUTATION, allow_negative_numbers = true)]
    pub backmutation: f64,

    /// Mutations carried by every individual at the start
    #[arg(short, long, default_value_t = defaults::INITIAL_MUTATIONS)]
    pub initial_mutations: u32,
}

impl ModelArgs {
    pub fn to_parameters(&self) -> ModelParameters {
        ModelParameters::new(
            self.population_size,
            self.mutation,
            self.selection,
            self.backmutation,
            self.initial_mutations,
        )
    }
}

/// How a run is executed. Unset options keep their configured value.
#[derive(Args, Debug, Clone)]
pub struct ExecutionArgs {
    /// Run length, in units of N generations unless --dont-rescale is given
    ///
    /// Defaults to 1000.
    #[arg(short = 't', long)]
    pub generations: Option<usize>,

    /// Reproduction algorithm (direct or analytic)
    ///
    /// Defaults to analytic.
    #[arg(short, long)]
    pub algorithm: Option<Algorithm>,

    /// Count time in generations and report every generation
    #[arg(short, long)]
    pub dont_rescale: bool,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Draw offspring in parallel on the rayon pool
    #[arg(long)]
    pub parallel: bool,

    /// Classes below the fittest class considered by analytic back-mutation
    #[arg(long)]
    pub lookback_window: Option<u32>,
}

impl ExecutionArgs {
    /// Override `execution` with every option given on the command line.
    pub fn apply(&self, execution: &mut ExecutionConfig) {
        if let Some(generations) = self.generations {
            execution.generations = generations;
        }
        if let Some(algorithm) = self.algorithm {
            execution.algorithm = algorithm;
        }
        if self.dont_rescale {
            execution.time_scale = TimeScale::Generations;
        }
        if self.seed.is_some() {
            execution.seed = self.seed;
        }
        if self.parallel {
            execution.parallel = true;
        }
        if let Some(window) = self.lookback_window {
            execution.lookback_window = window;
        }
    }
}

/// Layout of the records written by `run`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Space-separated columns with `;`-terminated class counts
    #[default]
    Plain,
    /// Labelled fields and `class:count` pairs from class 0
    Human,
    /// One JSON object per line
    Json,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub execution: ExecutionArgs,

    /// JSON configuration file (see `ratchet init`), replaces the model flags
    #[arg(
        short,
        long,
        conflicts_with_all = [
            "population_size",
            "mutation",
            "selection",
            "backmutation",
            "initial_mutations",
        ]
    )]
    pub config: Option<PathBuf>,

    /// Record format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Plain)]
    pub format: OutputFormat,

    /// Print the column header before the records
    #[arg(long)]
    pub header: bool,

    /// Write records to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Show a progress bar on stderr
    #[arg(long)]
    pub progress: bool,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub execution: ExecutionArgs,

    /// Output configuration path
    #[arg(short, long, default_value = defaults::CONFIG_FILE)]
    pub output: PathBuf,
}
