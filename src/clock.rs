use crate::MilliSeconds;

/// Abstraction for time.
///
/// Acknowledgment timeouts, polling and settle pauses are all measured
/// against a `Clock`, so that the motion core does not depend on any
/// particular timer peripheral or operating system.
pub trait Clock {
    /// Returns the current time.
    ///
    /// Only differences between two readings are meaningful.
    fn now(&self) -> MilliSeconds;

    /// Blocks for the specified duration before returning.
    ///
    /// # Parameters
    ///
    /// - `duration`: How long to block.
    fn delay(&mut self, duration: MilliSeconds);
}

#[cfg(test)]
pub use self::test::TestClock;
