use std::{fmt::Write as _, time::Duration};

use clap::Parser as _;
use rand::SeedableRng as _;
use sort_visualizer::{
    Algorithm, EventKind, MutationEvent, PacingController, RunHandle, RunStatus, SortEngine,
    algorithms, data::DataType,
};
use tracing_subscriber::EnvFilter;

mod cli;

/// Program entry point
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr, the animation owns stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli::Args { command } = cli::Args::parse();

    match command {
        cli::Command::Run {
            algorithm,
            values,
            random,
            max_value,
            speed,
            delay_ms,
            shuffle,
            seed,
        } => {
            let delay = delay_ms
                .map(Duration::from_millis)
                .unwrap_or_else(|| PacingController::delay_for_speed(speed));
            let engine = SortEngine::with_rng(values.0, create_rng(seed))?;
            engine.set_speed(delay);

            if let Some(length) = random {
                engine.resize(length, max_value)?;
            }

            run(&engine, algorithm, shuffle)?;
        }
        cli::Command::Bench {
            algorithm,
            data,
            runs,
            size,
            max_value,
            seed,
        } => {
            println!(
                "Running measurements for the following algorithm:\n{algorithm} (stable: {stable})",
                stable = algorithm.is_stable(),
            );
            println!("Runs: {runs}, Size: {size}, Data type: {data}");

            let mut rng = create_rng(seed);
            let steps = perform_experiment(algorithm, data, runs, size, max_value, &mut rng)?;

            println!("Comparisons: {:?}", steps.comparisons);
            println!("Swaps: {:?}", steps.swaps);
            println!("Overwrites: {:?}", steps.overwrites);
        }
        cli::Command::Info => {
            for algorithm in Algorithm::ALL {
                println!(
                    "{algorithm:<10} {profile} (stable: {stable})",
                    profile = algorithm.complexity(),
                    stable = algorithm.is_stable(),
                );
            }
        }
    }

    Ok(())
}

/// Create the rng, seeded if requested
fn create_rng(seed: Option<u64>) -> rand::rngs::StdRng {
    match seed {
        Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
        None => {
            tracing::debug!("No seed provided, generating one using system rng");
            rand::rngs::StdRng::from_os_rng()
        }
    }
}

/// Animate an optional shuffle followed by the sort
fn run(engine: &SortEngine, algorithm: Algorithm, shuffle: bool) -> sort_visualizer::Result<()> {
    println!("{}", render_values(&engine.current_snapshot().values, &[]));

    if shuffle {
        println!("Shuffling");
        let handle = engine.shuffle()?;
        render_run(&handle);
    }

    let handle = engine.start(algorithm)?;
    println!("{algorithm}: {}", algorithm.complexity());
    let status = render_run(&handle);

    let snapshot = engine.current_snapshot();
    println!(
        "{status}: {comparisons} comparisons, {swaps} swaps, {overwrites} overwrites, sorted: {sorted}",
        comparisons = snapshot.counters.comparisons,
        swaps = snapshot.counters.swaps,
        overwrites = snapshot.counters.overwrites,
        sorted = snapshot.values.is_sorted(),
    );

    Ok(())
}

/// Print every event of the run as it arrives, returning the final status
fn render_run(handle: &RunHandle) -> RunStatus {
    for event in handle.events() {
        println!("{}", render_event(&event));
    }

    handle.wait()
}

/// One line per event, the touched indices are highlighted
fn render_event(event: &MutationEvent) -> String {
    let (first, second) = event.kind.indices();
    let highlighted: Vec<usize> = first.into_iter().chain(second).collect();
    let label = match event.kind {
        EventKind::Compare(..) => "compare",
        EventKind::Swap(..) => "swap",
        EventKind::Overwrite(..) => "overwrite",
        EventKind::ShuffleStep(..) => "shuffle",
        EventKind::RunComplete(_) => "done",
    };

    format!(
        "{label:>9} |{values}| c={comparisons} s={swaps}",
        values = render_values(&event.values, &highlighted),
        comparisons = event.counters.comparisons,
        swaps = event.counters.swaps,
    )
}

fn render_values(values: &[i64], highlighted: &[usize]) -> String {
    let width = values
        .iter()
        .map(|value| value.to_string().len())
        .max()
        .unwrap_or(1);

    let mut line = String::new();
    for (index, value) in values.iter().enumerate() {
        if highlighted.contains(&index) {
            let _ = write!(line, "[{value:>width$}]");
        } else {
            let _ = write!(line, " {value:>width$} ");
        }
    }

    line
}

/// Statistics of each counter over all runs of an experiment
struct StepStats {
    comparisons: rolling_stats::Stats<f64>,
    swaps: rolling_stats::Stats<f64>,
    overwrites: rolling_stats::Stats<f64>,
}

/// Sort `runs` generated sequences headless, collecting statistics of the step counts
fn perform_experiment(
    algorithm: Algorithm,
    data: DataType,
    runs: usize,
    size: usize,
    max_value: i64,
    rng: &mut impl rand::Rng,
) -> sort_visualizer::Result<StepStats> {
    let mut stats = StepStats {
        comparisons: rolling_stats::Stats::new(),
        swaps: rolling_stats::Stats::new(),
        overwrites: rolling_stats::Stats::new(),
    };

    let bar = indicatif::ProgressBar::new(runs as u64);

    for _ in 0..runs {
        let mut values = data.initialize(size, max_value, rng)?;
        let counters = algorithms::run_headless(algorithm, &mut values);

        debug_assert!(
            values.is_sorted(),
            "{values:?} is not sorted after algorithm run"
        );

        stats.comparisons.update(counters.comparisons as f64);
        stats.swaps.update(counters.swaps as f64);
        stats.overwrites.update(counters.overwrites as f64);

        bar.inc(1);
    }
    bar.finish();

    Ok(stats)
}
