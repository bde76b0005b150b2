//! Behavioural saturating-counter testbench.
//!
//! Stands in for a compiled `sat_counter_tb` design: holds the counter in
//! reset, lets it count up to `2^width - 1`, checks that it stays there for
//! a few cycles and then finishes. One `evaluate` call is one clock cycle.

use std::io::Write;

use clockpump_config::{validate_counter, CounterSection};
use clockpump_sim::{width_mask, DeviceModel, ModelCtx, SimContext, SimError};
use serde::Serialize;
use tracing::{debug, info};

/// One traced value of the counter register.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TraceSample {
    /// Time stamp of the evaluation that produced the value.
    pub time: f64,
    /// Counter value after the evaluation.
    pub count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Reset { remaining: u32 },
    Counting,
    Holding { remaining: u32 },
    Done,
}

/// Saturating-counter testbench writing `$display` output to `out`.
pub struct SatCounterTb<W: Write> {
    width: u32,
    max: u64,
    count: u64,
    saturate: bool,
    hold_cycles: u32,
    phase: Phase,
    trace: Option<Vec<TraceSample>>,
    finalized: bool,
    out: W,
}

impl<W: Write> SatCounterTb<W> {
    /// Builds the testbench from the configured context.
    ///
    /// The counter register is seeded from the context's register init
    /// policy, and the trace buffer is opened only if tracing is enabled.
    /// A `+hold_cycles=N` command argument overrides `params.hold_cycles`.
    /// The merged parameters are validated like a loaded config file.
    pub fn new(ctx: &SimContext, params: &CounterSection, out: W) -> Result<Self, SimError> {
        let mut params = params.clone();
        if let Some(raw) = ctx.plusarg("hold_cycles") {
            params.hold_cycles = raw.parse().map_err(|_| SimError::ModelFault {
                time: 0,
                reason: format!("bad +hold_cycles value '{raw}'"),
            })?;
        }
        validate_counter(&params).map_err(|e| SimError::ModelFault {
            time: 0,
            reason: e.to_string(),
        })?;
        let max = width_mask(params.width);
        let count = ctx.reg_init().fill(params.width);
        let phase = if params.reset_cycles > 0 {
            Phase::Reset {
                remaining: params.reset_cycles,
            }
        } else {
            Phase::Counting
        };
        debug!(width = params.width, initial = count, "sat_counter_tb constructed");

        Ok(Self {
            width: params.width,
            max,
            count,
            saturate: params.saturate,
            hold_cycles: params.hold_cycles,
            phase,
            trace: ctx.trace_ever_on().then(Vec::new),
            finalized: false,
            out,
        })
    }

    /// Returns the current counter value.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Returns the saturation value.
    #[cfg(test)]
    pub fn max(&self) -> u64 {
        self.max
    }

    /// Returns the traced samples, or `None` if tracing was off at construction.
    pub fn trace_samples(&self) -> Option<&[TraceSample]> {
        self.trace.as_deref()
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.out
    }

    fn display(&mut self, ctx: &ModelCtx<'_>, line: &str) -> Result<(), SimError> {
        writeln!(self.out, "[{}] {line}", ctx.time().units).map_err(|e| SimError::ModelFault {
            time: ctx.time().units,
            reason: format!("display output failed: {e}"),
        })
    }

    /// Next value of the counter register, as the design computes it.
    fn next_count(&self) -> u64 {
        if self.saturate && self.count == self.max {
            self.count
        } else {
            self.count.wrapping_add(1) & self.max
        }
    }
}

impl<W: Write> DeviceModel for SatCounterTb<W> {
    fn evaluate(&mut self, ctx: &mut ModelCtx<'_>) -> Result<(), SimError> {
        let time = ctx.time().units;
        match self.phase {
            Phase::Reset { remaining } => {
                self.count = 0;
                self.phase = if remaining > 1 {
                    Phase::Reset {
                        remaining: remaining - 1,
                    }
                } else {
                    Phase::Counting
                };
            }
            Phase::Counting => {
                let next = self.next_count();
                if next < self.count {
                    return Err(SimError::AssertionFailed {
                        time,
                        message: format!("counter wrapped from {} to {next}", self.count),
                    });
                }
                self.count = next;
                if self.count == self.max {
                    let line = format!("counter saturated at {}", self.max);
                    self.display(ctx, &line)?;
                    self.phase = Phase::Holding {
                        remaining: self.hold_cycles,
                    };
                }
            }
            Phase::Holding { remaining } => {
                self.count = self.next_count();
                if self.count != self.max {
                    return Err(SimError::AssertionFailed {
                        time,
                        message: format!(
                            "saturated counter moved to {} (expected {})",
                            self.count, self.max
                        ),
                    });
                }
                if remaining > 1 {
                    self.phase = Phase::Holding {
                        remaining: remaining - 1,
                    };
                } else {
                    self.display(ctx, "PASS")?;
                    self.phase = Phase::Done;
                    ctx.finish();
                }
            }
            Phase::Done => {}
        }

        if let Some(trace) = &mut self.trace {
            trace.push(TraceSample {
                time: ctx.time_stamp(),
                count: self.count,
            });
        }
        Ok(())
    }

    fn finalize(&mut self, _ctx: &mut ModelCtx<'_>) -> Result<(), SimError> {
        if self.finalized {
            return Err(SimError::FinalizeFailed {
                reason: "sat_counter_tb finalized twice".to_string(),
            });
        }
        self.finalized = true;
        self.out.flush().map_err(|e| SimError::FinalizeFailed {
            reason: e.to_string(),
        })?;
        if let Some(trace) = &self.trace {
            info!(
                samples = trace.len(),
                width = self.width,
                "trace flushed"
            );
        }
        Ok(())
    }
}
