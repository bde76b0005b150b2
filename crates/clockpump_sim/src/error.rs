//! Simulation error types for the clock pump.
//!
//! Configuration mistakes and device model faults are both represented as
//! variants of [`SimError`]. None of them are recoverable once the loop runs.

/// Errors that can occur during context configuration or simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A debug level outside the supported range was requested.
    #[error("invalid debug level {level} (expected 0..={max})")]
    InvalidDebugLevel {
        /// The rejected level.
        level: u8,
        /// The highest accepted level.
        max: u8,
    },

    /// An unknown register initialization policy code was requested.
    #[error("invalid register init policy {code} (expected 0, 1 or 2)")]
    InvalidRegInit {
        /// The rejected policy code.
        code: u8,
    },

    /// The device model detected an internal inconsistency while evaluating.
    #[error("model fault at time {time}: {reason}")]
    ModelFault {
        /// Simulation time of the failing evaluation.
        time: u64,
        /// Description of what went wrong inside the model.
        reason: String,
    },

    /// A check declared inside the design failed.
    #[error("assertion failed at time {time}: {message}")]
    AssertionFailed {
        /// Simulation time of the failing evaluation.
        time: u64,
        /// The assertion failure message.
        message: String,
    },

    /// Finalization was requested before the model signalled completion.
    #[error("cannot finalize: model has not finished (time {time})")]
    NotFinished {
        /// Simulation time when finalization was requested.
        time: u64,
    },

    /// The driver was used after an evaluation fault stopped it.
    #[error("driver halted by a model fault at time {time}")]
    Halted {
        /// Simulation time of the faulting evaluation.
        time: u64,
    },

    /// The device model could not complete its shutdown logic.
    #[error("finalize failed: {reason}")]
    FinalizeFailed {
        /// Description of the failure.
        reason: String,
    },
}
