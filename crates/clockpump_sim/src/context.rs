//! Simulation context: global policy plus the state shared by driver and model.
//!
//! A [`SimContext`] is configured first, then handed to the device model's
//! constructor and finally moved into the [`Driver`](crate::Driver). Models
//! read configuration at construction time, so later changes to
//! construction-time settings do not reach an already built model.
//!
//! Field ownership is split: the finished flag is written only by the model
//! (through [`ModelCtx::finish`](crate::ModelCtx::finish)), the time counters
//! only by the driver.

use tracing::debug;

use crate::policy::{DebugLevel, RegInitPolicy};
use crate::time::SimTime;

/// Global simulation configuration and shared run state.
///
/// Only the driver moves time; outside this crate the time base is read-only:
///
/// ```compile_fail
/// let mut ctx = clockpump_sim::SimContext::new();
/// ctx.advance_time(5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SimContext {
    debug: DebugLevel,
    reg_init: RegInitPolicy,
    trace_ever_on: bool,
    args: Vec<String>,
    finished: bool,
    /// Step counter bumped by the driver before each evaluation.
    stamp: SimTime,
    /// Time base advanced by the driver after each evaluation.
    time: SimTime,
}

impl SimContext {
    /// Creates a context with debugging off, zero register initialization,
    /// tracing disabled and time at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the debug verbosity.
    pub fn set_debug_level(&mut self, level: DebugLevel) {
        self.debug = level;
    }

    /// Returns the debug verbosity.
    pub fn debug_level(&self) -> DebugLevel {
        self.debug
    }

    /// Selects how models seed uninitialized registers.
    ///
    /// Only models constructed after this call observe the new policy.
    pub fn set_reg_init(&mut self, policy: RegInitPolicy) {
        debug!(mode = policy.mode.code(), seed = policy.seed, "register init policy set");
        self.reg_init = policy;
    }

    /// Returns the register initialization policy.
    pub fn reg_init(&self) -> RegInitPolicy {
        self.reg_init
    }

    /// Enables or disables tracing for trace resources opened afterwards.
    pub fn set_trace_ever_on(&mut self, on: bool) {
        self.trace_ever_on = on;
    }

    /// Returns whether trace resources may be opened.
    pub fn trace_ever_on(&self) -> bool {
        self.trace_ever_on
    }

    /// Stores the process argument vector for later queries by models.
    pub fn command_args<I, S>(&mut self, args: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
    }

    /// Returns the stored argument vector.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Looks up a `+name` or `+name=value` argument.
    ///
    /// Returns the text after `=`, or an empty string for a bare `+name`.
    /// When the argument appears more than once the first occurrence wins.
    pub fn plusarg(&self, name: &str) -> Option<&str> {
        self.args.iter().find_map(|arg| {
            let rest = arg.strip_prefix('+')?.strip_prefix(name)?;
            if rest.is_empty() {
                Some("")
            } else {
                rest.strip_prefix('=')
            }
        })
    }

    /// Advances the time base by `delta` units. Driver only.
    pub(crate) fn advance_time(&mut self, delta: u64) {
        self.time = self.time.advance(delta);
    }

    /// Returns the time base.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Returns the current simulation time as a real number.
    ///
    /// This is the time-stamp query used by trace sinks and by models that
    /// need "now". While a model evaluates it reports the step being
    /// evaluated; between iterations it equals [`time`](Self::time).
    pub fn time_stamp(&self) -> f64 {
        self.stamp.as_real()
    }

    /// Returns whether the device model has signalled completion.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub(crate) fn set_finished(&mut self) {
        self.finished = true;
    }

    /// Bumps the step counter and returns the step about to be evaluated.
    pub(crate) fn next_stamp(&mut self) -> SimTime {
        self.stamp = self.stamp.advance(1);
        self.stamp
    }

    pub(crate) fn stamp(&self) -> SimTime {
        self.stamp
    }
}
