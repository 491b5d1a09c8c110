use core::sync::atomic::{AtomicBool, Ordering};

/// Stop request shared between the inbound event source and the motion
/// worker.
///
/// The network side raises the signal while a sequence is running; the
/// motion worker checks it before every write and on every acknowledgment
/// poll, so a blocked wait is released within one poll interval.
#[derive(Debug)]
pub struct StopSignal(AtomicBool);
impl StopSignal {
    /// Creates a new, lowered, stop signal.
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Requests that the running motion sequence stops.
    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Lowers the signal so that the next sequence can run.
    pub fn clear(&self) {
        self.0.store(false, Ordering::Release);
    }

    /// Returns `true` if a stop has been requested.
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}
