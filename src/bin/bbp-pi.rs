//! bbp-pi CLI entry point
//!
//! With a digit count argument, computes once. Without one, prompts for digit
//! counts until `0` or end of input.

use anyhow::{Context, Result};
use bbp_pi::prelude::*;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// bbp-pi - compute digits of π with the BBP series
#[derive(Parser, Debug)]
#[command(name = "bbp-pi")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Digits after the decimal point; omit for interactive mode
    #[arg(value_name = "DIGITS", allow_negative_numbers = true)]
    digits: Option<i64>,

    /// Number of worker threads (default: hardware parallelism)
    #[arg(short = 'w', long, env = "BBP_PI_WORKERS")]
    workers: Option<usize>,

    /// Abort after this many seconds and print the partial result
    #[arg(long, default_value = "600")]
    timeout_secs: u64,

    /// Pin each worker to its own core (requires the `numa` build feature)
    #[arg(long)]
    pin_workers: bool,

    /// Log calculation events to stderr (requires the `logging` build feature)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut builder = PiCalculatorBuilder::new()
        .timeout(Duration::from_secs(cli.timeout_secs))
        .pin_workers(cli.pin_workers);
    if let Some(workers) = cli.workers {
        builder = builder.workers(workers);
    }
    if cli.verbose {
        builder = builder.event_handler(Arc::new(LoggingEventHandler));
    }
    let calculator = builder.build().context("Invalid calculator settings")?;

    match cli.digits {
        Some(digits) => run_once(&calculator, digits),
        None => run_interactive(&calculator),
    }
}

#[cfg(feature = "logging")]
fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

#[cfg(not(feature = "logging"))]
fn init_logging(_verbose: bool) {}

fn run_once(calculator: &PiCalculator, digits: i64) -> Result<()> {
    let started = Instant::now();
    let outcome = calculator
        .calculate(digits)
        .with_context(|| format!("Failed to calculate {} digits", digits))?;
    print_outcome(&outcome);
    print_elapsed(started);
    Ok(())
}

fn run_interactive(calculator: &PiCalculator) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("Enter the number of digits after the decimal point (0 to quit): ");
        io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next() else {
            println!();
            return Ok(());
        };
        let line = line.context("Failed to read from stdin")?;

        let digits: i64 = match line.trim().parse() {
            Ok(digits) => digits,
            Err(_) => {
                eprintln!("Not a whole number: {:?}", line.trim());
                continue;
            },
        };
        if digits == 0 {
            return Ok(());
        }

        let started = Instant::now();
        match calculator.calculate(digits) {
            Ok(outcome) => {
                print_outcome(&outcome);
                print_elapsed(started);
                println!();
            },
            Err(err @ CalculationError::InvalidPrecision { .. }) => eprintln!("{}", err),
            Err(err) => return Err(err).context("Calculation failed"),
        }
    }
}

fn print_elapsed(started: Instant) {
    println!("{}", elapsed_line(started.elapsed()));
}

fn elapsed_line(elapsed: Duration) -> String {
    format!("Time taken: {} ms", elapsed.as_millis())
}

fn print_outcome(outcome: &CalculationOutcome) {
    println!("π: {}", outcome);
    if outcome.is_degraded() {
        eprintln!(
            "Warning: timed out after {} of {} workers merged; result may be incomplete",
            outcome.merged_workers, outcome.total_workers
        );
    }
}
