//! Configuration types deserialized from `clockpump.toml`.

use clockpump_sim::{DebugLevel, RegInitMode, RegInitPolicy, SimContext};
use serde::Deserialize;

/// The top-level harness configuration parsed from `clockpump.toml`.
///
/// Every section is optional; a missing file section takes its defaults.
#[derive(Debug, Default, Deserialize)]
pub struct HarnessConfig {
    /// Simulation context settings.
    #[serde(default)]
    pub sim: SimSection,
    /// Parameters of the saturating-counter testbench model.
    #[serde(default)]
    pub counter: CounterSection,
}

/// Simulation context settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SimSection {
    /// Debug verbosity, 0..=9.
    #[serde(default)]
    pub debug: DebugLevel,
    /// Register initialization mode code (0 zeros, 1 ones, 2 pattern).
    #[serde(default = "default_rand_reset")]
    pub rand_reset: RegInitMode,
    /// Seed for the pattern initialization mode.
    #[serde(default)]
    pub seed: u64,
    /// Whether trace resources may be opened.
    #[serde(default = "default_trace")]
    pub trace: bool,
}

fn default_rand_reset() -> RegInitMode {
    RegInitMode::Pattern
}

fn default_trace() -> bool {
    true
}

impl Default for SimSection {
    fn default() -> Self {
        Self {
            debug: DebugLevel::OFF,
            rand_reset: default_rand_reset(),
            seed: 0,
            trace: default_trace(),
        }
    }
}

impl SimSection {
    /// Returns the register initialization policy described by this section.
    pub fn reg_init(&self) -> RegInitPolicy {
        RegInitPolicy {
            mode: self.rand_reset,
            seed: self.seed,
        }
    }

    /// Applies these settings to a context that has not yet built a model.
    pub fn apply(&self, ctx: &mut SimContext) {
        ctx.set_debug_level(self.debug);
        ctx.set_reg_init(self.reg_init());
        ctx.set_trace_ever_on(self.trace);
    }
}

/// Parameters of the saturating-counter testbench model.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CounterSection {
    /// Counter width in bits, 1..=32.
    #[serde(default = "default_width")]
    pub width: u32,
    /// Cycles the testbench holds reset before enabling the counter.
    #[serde(default = "default_reset_cycles")]
    pub reset_cycles: u32,
    /// Cycles the testbench checks the saturated value before finishing.
    #[serde(default = "default_hold_cycles")]
    pub hold_cycles: u32,
    /// Whether the design clamps at `2^width - 1`. When false the counter
    /// wraps and the testbench's saturation monitor fails the run.
    #[serde(default = "default_saturate")]
    pub saturate: bool,
}

fn default_width() -> u32 {
    4
}

fn default_reset_cycles() -> u32 {
    2
}

fn default_hold_cycles() -> u32 {
    3
}

fn default_saturate() -> bool {
    true
}

impl Default for CounterSection {
    fn default() -> Self {
        Self {
            width: default_width(),
            reset_cycles: default_reset_cycles(),
            hold_cycles: default_hold_cycles(),
            saturate: default_saturate(),
        }
    }
}
