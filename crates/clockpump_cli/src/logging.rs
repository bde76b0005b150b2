//! Tracing subscriber setup for the CLI.

use clockpump_sim::DebugLevel;
use tracing_subscriber::EnvFilter;

use crate::GlobalArgs;

/// Returns the default filter directive for the given flags and debug level.
///
/// `RUST_LOG`, when set, replaces this directive entirely.
pub fn default_directive(global: &GlobalArgs, debug: DebugLevel) -> &'static str {
    if global.quiet {
        return "error";
    }
    match debug.get() {
        0 if global.verbose => "clockpump_sim=debug,clockpump_cli=debug,warn",
        0 => "warn",
        1..=4 => "clockpump_sim=debug,clockpump_cli=debug,warn",
        _ => "clockpump_sim=trace,clockpump_cli=trace,warn",
    }
}

/// Installs a stderr `fmt` subscriber. A second call is a no-op.
pub fn init(global: &GlobalArgs, debug: DebugLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(global, debug)));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(global.color)
        .with_target(false)
        .try_init();
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
