//! clockpump CLI — drives a compiled design model through simulated time.
//!
//! Provides `clockpump run`, which configures a simulation context, builds
//! the saturating-counter testbench model and steps it until it finishes.

#![warn(missing_docs)]

mod logging;
mod run;
mod sat_counter;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// clockpump — a fixed-step simulation harness.
#[derive(Parser, Debug)]
#[command(name = "clockpump", version, about = "Fixed-step HDL simulation harness")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a custom `clockpump.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the testbench model until it finishes.
    Run(RunArgs),
}

/// Arguments for the `clockpump run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Simulator debug level (0-9).
    #[arg(long)]
    pub debug: Option<u8>,

    /// Register init policy: 0 zeros, 1 ones, 2 seeded pattern.
    #[arg(long)]
    pub rand_reset: Option<u8>,

    /// Seed for the pattern init policy.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Enable tracing.
    #[arg(long, conflicts_with = "no_trace")]
    pub trace: bool,

    /// Disable tracing.
    #[arg(long)]
    pub no_trace: bool,

    /// Counter width in bits.
    #[arg(long)]
    pub width: Option<u32>,

    /// Cycles to hold the counter in reset.
    #[arg(long)]
    pub reset_cycles: Option<u32>,

    /// Cycles to check the saturated value before finishing.
    #[arg(long)]
    pub hold_cycles: Option<u32>,

    /// Output format for the run summary.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Arguments forwarded to the model (e.g. `+hold_cycles=5`).
    #[arg(last = true)]
    pub plusargs: Vec<String>,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Run summary output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable status lines on stderr.
    Text,
    /// Machine-readable JSON on stdout.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => color_from_env(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Run(ref args) => run::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Rough terminal detection from `NO_COLOR` and `TERM`.
fn color_from_env() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::env::var_os("TERM").is_some()
}
