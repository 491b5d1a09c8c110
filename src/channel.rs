use ufmt_macros::uDebug;

/// Abstraction for a serial link to one motion controller.
///
/// One channel drives the primary axis group and a second one drives the
/// secondary group. Port configuration happens before the channel is
/// handed to the motion core.
pub trait Channel {
    /// Reads a single byte.
    ///
    /// # Returns
    ///
    /// - `Ok(byte)`: the next byte from the controller.
    /// - `Err(nb::Error::WouldBlock)`: no data yet, but the channel is still
    ///   open.
    /// - `Err(nb::Error::Other(error))`: the channel failed.
    fn read(&mut self) -> nb::Result<u8, ChannelError>;

    /// Writes a complete command line, like `XF32767x`.
    fn write(&mut self, line: &str) -> Result<(), ChannelError>;
}

/// Errors that a channel can report.
#[derive(Debug, uDebug, PartialEq, Eq, Copy, Clone)]
pub enum ChannelError {
    /// The other end went away.
    Closed,
    /// The channel is open but the transfer failed.
    Fault,
}

#[cfg(test)]
pub use self::test::TestChannel;
