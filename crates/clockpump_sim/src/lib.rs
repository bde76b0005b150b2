//! Fixed-step clock pump for compiled HDL device models.
//!
//! This crate drives an opaque, evaluable design-under-test through
//! simulated time one unit at a time until the design signals completion.
//! It performs no event scheduling, change detection or combinational
//! settling; all logic lives inside the [`DeviceModel`].
//!
//! # Architecture
//!
//! A [`SimContext`] is configured first (debug level, register init policy,
//! trace enable, command arguments). The [`Driver`] then builds the model
//! from that context and owns both for the rest of the run. Each iteration
//! bumps the time stamp, evaluates the model, advances the context time base
//! and checks the finished flag. Once the flag is seen the model is finalized
//! exactly once and dropped.
//!
//! # Usage
//!
//! ```ignore
//! use clockpump_sim::{Driver, RegInitPolicy, SimContext};
//!
//! let mut ctx = SimContext::new();
//! ctx.set_reg_init(RegInitPolicy::pattern(0));
//! ctx.set_trace_ever_on(true);
//! let driver = Driver::new(ctx, |ctx| Ok(MyModel::new(ctx)))?;
//! let summary = driver.run()?;
//! println!("finished at {}", summary.final_time);
//! ```
//!
//! # Modules
//!
//! - `error` — Simulation error types
//! - `time` — Discrete simulation time
//! - `policy` — Debug level and register initialization policy
//! - `context` — Shared simulation context
//! - `model` — Device model trait and the model's context view
//! - `driver` — The time-stepping loop

#![warn(missing_docs)]

pub mod context;
pub mod driver;
pub mod error;
pub mod model;
pub mod policy;
pub mod time;

pub use context::SimContext;
pub use driver::{Driver, DriverState, RunSummary, StepResult};
pub use error::SimError;
pub use model::{DeviceModel, ModelCtx};
pub use policy::{width_mask, DebugLevel, RegInitMode, RegInitPolicy};
pub use time::SimTime;
