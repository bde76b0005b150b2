//! `clockpump run` — pump the saturating-counter testbench to completion.
//!
//! Loads `clockpump.toml`, merges command-line overrides, configures the
//! simulation context, builds the testbench model from it and steps time
//! until the model finishes. `$display` output goes to stdout, status lines
//! and logs to stderr.

use std::io;
use std::path::Path;

use clockpump_config::{load_config, load_config_file, validate_config, HarnessConfig};
use clockpump_sim::{DebugLevel, Driver, RegInitMode, RunSummary, SimContext, SimError, StepResult};
use serde::Serialize;

use crate::sat_counter::{SatCounterTb, TraceSample};
use crate::{logging, GlobalArgs, OutputFormat, RunArgs};

/// Machine-readable result of a run.
#[derive(Debug, Serialize)]
struct RunReport {
    summary: RunSummary,
    final_count: u64,
    trace: Option<Vec<TraceSample>>,
}

/// Runs the `clockpump run` command.
///
/// Returns exit code 0 once the model has finished and been finalized. Any
/// configuration error or model fault is returned as `Err`.
pub fn run(args: &RunArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    // Step 1: Load config and merge overrides
    let mut config = match &global.config {
        Some(path) => load_config_file(Path::new(path))?,
        None => load_config(&std::env::current_dir()?)?,
    };
    apply_overrides(&mut config, args)?;
    validate_config(&config)?;
    logging::init(global, config.sim.debug);

    // Step 2: Configure the context before any model exists
    let mut ctx = SimContext::new();
    ctx.command_args(args.plusargs.iter().cloned());
    config.sim.apply(&mut ctx);

    if !global.quiet {
        eprintln!(
            "   Simulating sat_counter_tb (width {})",
            config.counter.width
        );
    }

    // Step 3: Build the model and pump time. Stepped by hand so the trace
    // can be read before the model is released.
    let mut driver = Driver::new(ctx, |ctx| {
        SatCounterTb::new(ctx, &config.counter, io::stdout())
    })?;
    while driver.step()? == StepResult::Continued {}
    let final_count = driver.model().count();
    let trace = driver.model().trace_samples().map(<[TraceSample]>::to_vec);
    let summary = driver.finish()?;

    // Step 4: Report
    match args.format {
        OutputFormat::Json => {
            let report = RunReport {
                summary,
                final_count,
                trace,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            if !global.quiet {
                eprintln!(
                    "   Simulation finished at {} ({} iterations, count = {final_count})",
                    summary.final_time, summary.iterations
                );
                if let Some(samples) = &trace {
                    eprintln!("   Trace: {} samples", samples.len());
                }
            }
        }
    }

    Ok(0)
}

/// Merges command-line overrides into a loaded configuration.
fn apply_overrides(config: &mut HarnessConfig, args: &RunArgs) -> Result<(), SimError> {
    if let Some(level) = args.debug {
        config.sim.debug = DebugLevel::new(level)?;
    }
    if let Some(code) = args.rand_reset {
        config.sim.rand_reset = RegInitMode::from_code(code)?;
    }
    if let Some(seed) = args.seed {
        config.sim.seed = seed;
    }
    if args.trace {
        config.sim.trace = true;
    }
    if args.no_trace {
        config.sim.trace = false;
    }
    if let Some(width) = args.width {
        config.counter.width = width;
    }
    if let Some(cycles) = args.reset_cycles {
        config.counter.reset_cycles = cycles;
    }
    if let Some(cycles) = args.hold_cycles {
        config.counter.hold_cycles = cycles;
    }
    Ok(())
}
