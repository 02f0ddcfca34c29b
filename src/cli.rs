//! Command line input handling

use sort_visualizer::{Algorithm, Error, data::DataType};

/// Command line arguments
#[derive(clap::Parser)]
#[command(
    author,
    version,
    about,
    subcommand_value_name = "command",
    subcommand_help_heading = "Commands",
    disable_help_subcommand = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Animate a sort in the terminal
    Run {
        /// The sorting algorithm to run
        #[arg()]
        algorithm: Algorithm,
        /// The values to sort, comma separated
        #[arg(long, default_value = "8,5,3,9,4,1,7,6,2", allow_hyphen_values = true)]
        values: InputValues,
        /// Replace the values by this many random ones
        #[arg(long, conflicts_with = "values")]
        random: Option<usize>,
        /// The largest value generated by `--random`
        #[arg(long, default_value_t = sort_visualizer::data::DEFAULT_MAX_VALUE)]
        max_value: i64,
        /// Animation speed from 0 to 100, each step waits `100 - speed` milliseconds
        #[arg(short, long, default_value_t = 50, value_parser = clap::value_parser!(u8).range(0..=100))]
        speed: u8,
        /// Wait exactly this many milliseconds per step, overrides `--speed`
        #[arg(long)]
        delay_ms: Option<u64>,
        /// Shuffle the values before sorting
        #[arg(long)]
        shuffle: bool,
        /// Seed for the rng
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Sort many generated sequences without pacing and report step statistics
    Bench {
        /// The sorting algorithm to run
        #[arg()]
        algorithm: Algorithm,
        /// The data type to use for sorting
        #[arg(short, long, default_value_t = DataType::Permutation)]
        data: DataType,
        /// The number of runs to do
        #[arg(short, long, default_value_t = 1_000)]
        runs: usize,
        /// The size of the sequences to sort
        #[arg(short = 'n', long, default_value_t = 100)]
        size: usize,
        /// The largest value of uniform data
        #[arg(long, default_value_t = sort_visualizer::data::DEFAULT_MAX_VALUE)]
        max_value: i64,
        /// Seed for the rng
        #[arg(long)]
        seed: Option<u64>,
    },
    /// List the algorithms with their complexity
    Info,
}

/// A comma separated list of integers as typed by a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputValues(pub Vec<i64>);

impl std::str::FromStr for InputValues {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| {
                token
                    .parse()
                    .map_err(|err| Error::InvalidInput(format!("`{token}` is not an integer: {err}")))
            })
            .collect::<Result<Vec<i64>, _>>()?;

        if values.is_empty() {
            return Err(Error::InvalidInput("no values given".to_owned()));
        }

        Ok(Self(values))
    }
}
