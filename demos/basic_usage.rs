// ============================================================================
// Basic Usage Example
// ============================================================================

use bbp_pi::prelude::*;
use std::sync::Arc;
use std::time::Duration;

fn main() {
    println!("=== BBP Pi Example ===\n");

    // Calculator with one worker per hardware thread
    let calculator = PiCalculatorBuilder::new()
        .event_handler(Arc::new(LoggingEventHandler))
        .build()
        .expect("default configuration is valid");

    println!(
        "Created calculator with {} workers\n",
        calculator.config().workers
    );

    for digits in [1, 5, 10, 50, 100] {
        match calculator.calculate(digits) {
            Ok(outcome) => println!(
                "{:>4} digits: {}  ({} terms, {} ms)",
                digits,
                outcome,
                outcome.terms_computed,
                outcome.elapsed.as_millis()
            ),
            Err(err) => println!("{:>4} digits: error: {}", digits, err),
        }
    }

    // Invalid precision is rejected, not computed
    println!("\n=== Invalid Request ===");
    if let Err(err) = calculator.calculate(-3) {
        println!("  {}", err);
    }

    // A deliberately tiny timeout yields a tagged, possibly incomplete result
    println!("\n=== Timeout ===");
    let hurried = PiCalculator::with_config(CalculatorConfig::quick(Duration::from_micros(50)))
        .expect("positive timeout is valid");
    match hurried.calculate(5000) {
        Ok(outcome) if outcome.is_degraded() => println!(
            "  Timed out: {} of {} workers merged",
            outcome.merged_workers, outcome.total_workers
        ),
        Ok(_) => println!("  Finished before the deadline"),
        Err(err) => println!("  error: {}", err),
    }
}
