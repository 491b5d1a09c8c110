use core::ops::{Add, Sub};

/// Time in milliseconds.
#[derive(Debug, PartialEq, PartialOrd, Eq, Ord, Copy, Clone)]
pub struct MilliSeconds(u64);
impl MilliSeconds {
    /// Creates a new `MilliSeconds`.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Zero milliseconds.
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Returns the value as a `u64`.
    pub fn get_value(&self) -> u64 {
        self.0
    }
}

/// Saturates at `u64::MAX`, so a deadline computed from a huge timeout
/// never wraps around into the past.
impl Add for MilliSeconds {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        MilliSeconds(self.0.saturating_add(rhs.0))
    }
}

/// Saturates at zero.
impl Sub for MilliSeconds {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        MilliSeconds(self.0.saturating_sub(rhs.0))
    }
}
