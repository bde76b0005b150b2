//! The device model boundary.
//!
//! A compiled design-under-test is opaque to the harness. It is driven only
//! through the [`DeviceModel`] trait and sees the simulation context only
//! through the narrow [`ModelCtx`] view.

use crate::context::SimContext;
use crate::error::SimError;
use crate::policy::{DebugLevel, RegInitPolicy};
use crate::time::SimTime;

/// An evaluable design-under-test.
///
/// Models are built from a configured [`SimContext`] (see
/// [`Driver::new`](crate::Driver::new)) and must snapshot any
/// construction-time settings they need, such as the register
/// initialization policy.
pub trait DeviceModel {
    /// Recomputes all outputs for one discrete time step.
    ///
    /// May call [`ModelCtx::finish`] when the design reaches its own
    /// termination condition. An `Err` is fatal to the run.
    fn evaluate(&mut self, ctx: &mut ModelCtx<'_>) -> Result<(), SimError>;

    /// Runs end-of-simulation logic. Called at most once, after the finished
    /// flag is set; the model is never evaluated again afterwards.
    fn finalize(&mut self, ctx: &mut ModelCtx<'_>) -> Result<(), SimError>;
}

impl<M: DeviceModel + ?Sized> DeviceModel for Box<M> {
    fn evaluate(&mut self, ctx: &mut ModelCtx<'_>) -> Result<(), SimError> {
        (**self).evaluate(ctx)
    }

    fn finalize(&mut self, ctx: &mut ModelCtx<'_>) -> Result<(), SimError> {
        (**self).finalize(ctx)
    }
}

/// The model's view of the context during `evaluate` and `finalize`.
///
/// Exposes read access to time and configuration and write access to the
/// finished flag only.
pub struct ModelCtx<'a> {
    ctx: &'a mut SimContext,
}

impl<'a> ModelCtx<'a> {
    pub(crate) fn new(ctx: &'a mut SimContext) -> Self {
        Self { ctx }
    }

    /// Returns the time step being evaluated. The first evaluation sees 1.
    pub fn time(&self) -> SimTime {
        self.ctx.stamp()
    }

    /// Returns the current time as a real number.
    pub fn time_stamp(&self) -> f64 {
        self.ctx.time_stamp()
    }

    /// Signals that the simulation is complete.
    ///
    /// The driver observes the flag at the end of the current iteration.
    pub fn finish(&mut self) {
        self.ctx.set_finished();
    }

    /// Returns whether completion has already been signalled.
    pub fn is_finished(&self) -> bool {
        self.ctx.is_finished()
    }

    /// Returns the debug verbosity.
    pub fn debug_level(&self) -> DebugLevel {
        self.ctx.debug_level()
    }

    /// Returns the current register initialization policy.
    pub fn reg_init(&self) -> RegInitPolicy {
        self.ctx.reg_init()
    }

    /// Returns whether trace resources may be opened.
    pub fn trace_ever_on(&self) -> bool {
        self.ctx.trace_ever_on()
    }

    /// Looks up a `+name` / `+name=value` command argument.
    pub fn plusarg(&self, name: &str) -> Option<&str> {
        self.ctx.plusarg(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FinishOnFirst;

    impl DeviceModel for FinishOnFirst {
        fn evaluate(&mut self, ctx: &mut ModelCtx<'_>) -> Result<(), SimError> {
            ctx.finish();
            Ok(())
        }

        fn finalize(&mut self, _ctx: &mut ModelCtx<'_>) -> Result<(), SimError> {
            Ok(())
        }
    }

    #[test]
    fn finish_sets_context_flag() {
        let mut ctx = SimContext::new();
        {
            let mut view = ModelCtx::new(&mut ctx);
            assert!(!view.is_finished());
            FinishOnFirst.evaluate(&mut view).unwrap();
            assert!(view.is_finished());
        }
        assert!(ctx.is_finished());
    }

    #[test]
    fn view_reads_context() {
        let mut ctx = SimContext::new();
        ctx.set_trace_ever_on(true);
        ctx.set_reg_init(RegInitPolicy::ones());
        ctx.command_args(["+mode=fast"]);
        ctx.next_stamp();
        let view = ModelCtx::new(&mut ctx);
        assert_eq!(view.time().units, 1);
        assert_eq!(view.time_stamp(), 1.0);
        assert!(view.trace_ever_on());
        assert_eq!(view.reg_init(), RegInitPolicy::ones());
        assert_eq!(view.plusarg("mode"), Some("fast"));
        assert_eq!(view.debug_level(), DebugLevel::OFF);
    }

    #[test]
    fn boxed_model_forwards() {
        let mut model: Box<dyn DeviceModel> = Box::new(FinishOnFirst);
        let mut ctx = SimContext::new();
        model.evaluate(&mut ModelCtx::new(&mut ctx)).unwrap();
        assert!(ctx.is_finished());
    }
}
