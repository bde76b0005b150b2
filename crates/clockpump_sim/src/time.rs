//! Discrete simulation time.
//!
//! [`SimTime`] counts abstract time units, not wall-clock time. The driver
//! advances it by exactly one unit per loop iteration, and it never moves
//! backwards.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in simulation time, measured in discrete time units.
///
/// Starts at zero. Time-stamping consumers read it as a real number through
/// [`as_real`](SimTime::as_real), matching the usual simulator convention of
/// reporting "now" as a double.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SimTime {
    /// Number of elapsed time units.
    pub units: u64,
}

impl SimTime {
    /// Creates a time point at time zero.
    pub fn zero() -> Self {
        Self { units: 0 }
    }

    /// Creates a time point at the given number of units.
    pub fn from_units(units: u64) -> Self {
        Self { units }
    }

    /// Returns this time advanced by `delta` units.
    ///
    /// Saturates at `u64::MAX` rather than wrapping, so time stays monotonic
    /// even on a pathological run.
    pub fn advance(&self, delta: u64) -> Self {
        Self {
            units: self.units.saturating_add(delta),
        }
    }

    /// Returns the time widened to a real number.
    pub fn as_real(&self) -> f64 {
        self.units as f64
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.units == 1 {
            write!(f, "1 unit")
        } else {
            write!(f, "{} units", self.units)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_time() {
        assert_eq!(SimTime::zero().units, 0);
        assert_eq!(SimTime::default(), SimTime::zero());
    }

    #[test]
    fn advance_by_one() {
        let t = SimTime::zero().advance(1);
        assert_eq!(t.units, 1);
        assert_eq!(t.advance(1).units, 2);
    }

    #[test]
    fn advance_saturates() {
        let t = SimTime::from_units(u64::MAX - 1).advance(5);
        assert_eq!(t.units, u64::MAX);
    }

    #[test]
    fn as_real_widens() {
        assert_eq!(SimTime::from_units(5).as_real(), 5.0);
        assert_eq!(SimTime::zero().as_real(), 0.0);
    }

    #[test]
    fn ordering() {
        assert!(SimTime::from_units(1) < SimTime::from_units(2));
    }

    #[test]
    fn display() {
        assert_eq!(SimTime::zero().to_string(), "0 units");
        assert_eq!(SimTime::from_units(1).to_string(), "1 unit");
        assert_eq!(SimTime::from_units(42).to_string(), "42 units");
    }

    #[test]
    fn serde_roundtrip() {
        let t = SimTime::from_units(12345);
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, r#"{"units":12345}"#);
        let back: SimTime = serde_json::from_str(&json).unwrap();
        assert_eq!(t, back);
    }
}
