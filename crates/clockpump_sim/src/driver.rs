//! The time-stepping driver: a fixed-step clock pump.
//!
//! Each iteration bumps the time stamp, evaluates the model once, advances
//! the context time base by one unit and then checks the finished flag.
//! There is no timeout; a model that never finishes keeps the loop running.

use std::fmt;

use serde::Serialize;
use tracing::{debug, debug_span, info, trace, warn};

use crate::context::SimContext;
use crate::error::SimError;
use crate::model::{DeviceModel, ModelCtx};
use crate::time::SimTime;

/// Lifecycle state of a [`Driver`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    /// Context configured and model built; no iteration has run yet.
    Initializing,
    /// Iterating one time unit per step.
    Running,
    /// Terminal: the model is being finalized and released.
    Finalizing,
    /// Terminal: an evaluation faulted; the model is never evaluated or
    /// finalized again.
    Faulted,
}

impl fmt::Display for DriverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Initializing => "initializing",
            Self::Running => "running",
            Self::Finalizing => "finalizing",
            Self::Faulted => "faulted",
        };
        f.write_str(name)
    }
}

/// The result of a single iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    /// The model has not finished; keep stepping.
    Continued,
    /// The finished flag was observed; call [`Driver::finish`].
    Done,
}

/// Summary of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Context time when the model was finalized.
    pub final_time: SimTime,
    /// Number of `evaluate` calls made.
    pub iterations: u64,
}

/// Owns the context and the device model and pumps time through them.
pub struct Driver<M: DeviceModel> {
    ctx: SimContext,
    model: M,
    state: DriverState,
    iterations: u64,
}

impl<M: DeviceModel> Driver<M> {
    /// Builds the model from the configured context and takes ownership of
    /// both.
    ///
    /// The model can only be constructed here, after configuration, so it
    /// always sees the final construction-time settings.
    pub fn new<F>(ctx: SimContext, build: F) -> Result<Self, SimError>
    where
        F: FnOnce(&SimContext) -> Result<M, SimError>,
    {
        let model = build(&ctx)?;
        debug!(
            debug_level = ctx.debug_level().get(),
            reg_init = ctx.reg_init().mode.code(),
            trace = ctx.trace_ever_on(),
            "device model constructed"
        );
        Ok(Self {
            ctx,
            model,
            state: DriverState::Initializing,
            iterations: 0,
        })
    }

    /// Returns the simulation context.
    pub fn context(&self) -> &SimContext {
        &self.ctx
    }

    /// Returns the simulation context mutably.
    ///
    /// Changing construction-time settings here does not affect the model,
    /// which was already built. Time cannot be written through this handle.
    pub fn context_mut(&mut self) -> &mut SimContext {
        &mut self.ctx
    }

    /// Returns the device model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Returns the number of iterations run so far.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Runs one iteration.
    ///
    /// Once the finished flag has been observed, further calls return
    /// [`StepResult::Done`] without evaluating the model again. An evaluation
    /// fault moves the driver to [`DriverState::Faulted`]; every later call
    /// fails with [`SimError::Halted`].
    pub fn step(&mut self) -> Result<StepResult, SimError> {
        if self.state == DriverState::Faulted {
            return Err(SimError::Halted {
                time: self.ctx.stamp().units,
            });
        }
        if self.ctx.is_finished() {
            return Ok(StepResult::Done);
        }
        if self.state == DriverState::Initializing {
            self.transition(DriverState::Running);
        }

        let now = self.ctx.next_stamp();
        trace!(time = now.units, "evaluate");
        if let Err(e) = self.model.evaluate(&mut ModelCtx::new(&mut self.ctx)) {
            warn!(time = now.units, error = %e, "evaluation faulted");
            self.transition(DriverState::Faulted);
            return Err(e);
        }
        self.ctx.advance_time(1);
        self.iterations += 1;
        debug_assert_eq!(self.ctx.time(), self.ctx.stamp());

        if self.ctx.is_finished() {
            debug!(time = now.units, "model signalled finish");
            Ok(StepResult::Done)
        } else {
            Ok(StepResult::Continued)
        }
    }

    /// Steps until the model finishes, then finalizes it.
    ///
    /// Never returns if the model never sets the finished flag. An evaluation
    /// fault is returned immediately and the model is dropped without being
    /// finalized.
    pub fn run(mut self) -> Result<RunSummary, SimError> {
        let span = debug_span!("clockpump.run");
        let _guard = span.enter();
        while self.step()? == StepResult::Continued {}
        self.finish()
    }

    /// Finalizes the model exactly once and releases it.
    ///
    /// Consumes the driver, so the model cannot be evaluated afterwards.
    /// Fails with [`SimError::NotFinished`] if the model has not signalled
    /// completion, or [`SimError::Halted`] if an evaluation faulted; the
    /// model is then dropped without finalization.
    pub fn finish(mut self) -> Result<RunSummary, SimError> {
        if self.state == DriverState::Faulted {
            return Err(SimError::Halted {
                time: self.ctx.stamp().units,
            });
        }
        if !self.ctx.is_finished() {
            return Err(SimError::NotFinished {
                time: self.ctx.time().units,
            });
        }
        self.transition(DriverState::Finalizing);

        let Driver {
            mut ctx,
            mut model,
            iterations,
            ..
        } = self;
        model.finalize(&mut ModelCtx::new(&mut ctx))?;
        drop(model);

        let summary = RunSummary {
            final_time: ctx.time(),
            iterations,
        };
        info!(
            final_time = summary.final_time.units,
            iterations, "simulation finished"
        );
        Ok(summary)
    }

    fn transition(&mut self, next: DriverState) {
        debug!(from = %self.state, to = %next, "driver state change");
        self.state = next;
    }
}
