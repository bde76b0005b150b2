//! Typed simulation policies: debug verbosity and register initialization.
//!
//! Both types are validated on construction, so an invalid value is rejected
//! while the context is being configured and never reaches the loop.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Simulator debug verbosity, from 0 (off) to [`DebugLevel::MAX`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DebugLevel(u8);

impl DebugLevel {
    /// Highest accepted debug level.
    pub const MAX: u8 = 9;

    /// Debugging disabled.
    pub const OFF: DebugLevel = DebugLevel(0);

    /// Creates a debug level, rejecting values above [`DebugLevel::MAX`].
    pub fn new(level: u8) -> Result<Self, SimError> {
        if level > Self::MAX {
            return Err(SimError::InvalidDebugLevel {
                level,
                max: Self::MAX,
            });
        }
        Ok(Self(level))
    }

    /// Returns the numeric level.
    pub fn get(self) -> u8 {
        self.0
    }

    /// Returns `true` if any debug output is enabled.
    pub fn is_on(self) -> bool {
        self.0 > 0
    }
}

impl TryFrom<u8> for DebugLevel {
    type Error = SimError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl From<DebugLevel> for u8 {
    fn from(level: DebugLevel) -> u8 {
        level.0
    }
}

/// How storage that the design never resets is seeded at model construction.
///
/// The numeric codes follow the common simulator `rand-reset` convention.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum RegInitMode {
    /// Code 0: all bits cleared.
    #[default]
    Zeros,
    /// Code 1: all bits set.
    Ones,
    /// Code 2: every register gets the same seeded, non-zero pattern.
    Pattern,
}

impl RegInitMode {
    /// Parses a numeric policy code.
    pub fn from_code(code: u8) -> Result<Self, SimError> {
        match code {
            0 => Ok(Self::Zeros),
            1 => Ok(Self::Ones),
            2 => Ok(Self::Pattern),
            _ => Err(SimError::InvalidRegInit { code }),
        }
    }

    /// Returns the numeric policy code.
    pub fn code(self) -> u8 {
        match self {
            Self::Zeros => 0,
            Self::Ones => 1,
            Self::Pattern => 2,
        }
    }
}

impl TryFrom<u8> for RegInitMode {
    type Error = SimError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

impl From<RegInitMode> for u8 {
    fn from(mode: RegInitMode) -> u8 {
        mode.code()
    }
}

/// A register initialization mode plus the seed used by [`RegInitMode::Pattern`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegInitPolicy {
    /// Which initialization scheme to apply.
    pub mode: RegInitMode,
    /// Seed for the pattern generator. Ignored by the other modes.
    #[serde(default)]
    pub seed: u64,
}

impl RegInitPolicy {
    /// All-zeros initialization.
    pub fn zeros() -> Self {
        Self {
            mode: RegInitMode::Zeros,
            seed: 0,
        }
    }

    /// All-ones initialization.
    pub fn ones() -> Self {
        Self {
            mode: RegInitMode::Ones,
            seed: 0,
        }
    }

    /// Deterministic non-zero pattern derived from `seed`.
    pub fn pattern(seed: u64) -> Self {
        Self {
            mode: RegInitMode::Pattern,
            seed,
        }
    }

    /// Returns the initial value for a register `width` bits wide.
    ///
    /// Widths above 64 are clamped to 64. The pattern mode never yields zero
    /// for a non-empty register, and yields the same value on every call with
    /// the same seed and width.
    pub fn fill(&self, width: u32) -> u64 {
        let mask = width_mask(width);
        match self.mode {
            RegInitMode::Zeros => 0,
            RegInitMode::Ones => mask,
            RegInitMode::Pattern => {
                if mask == 0 {
                    return 0;
                }
                let raw: u64 = StdRng::seed_from_u64(self.seed).gen();
                match raw & mask {
                    0 => 1,
                    v => v,
                }
            }
        }
    }
}

/// Returns the all-ones value of a `width`-bit register, clamped to 64 bits.
pub fn width_mask(width: u32) -> u64 {
    match width {
        0 => 0,
        w if w >= 64 => u64::MAX,
        w => (1u64 << w) - 1,
    }
}
