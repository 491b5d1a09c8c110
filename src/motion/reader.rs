use core::cmp::min;

use heapless::String;
use log::{debug, warn};

use crate::{Channel, Clock, MilliSeconds, MotionError, StopSignal, Token};

/// Reads acknowledgment lines from a motion controller.
///
/// The reader owns a line buffer of `N` bytes. It polls its channel: while
/// the channel has no data the reader waits one poll interval on the clock,
/// checking the stop signal and the deadline before every poll.
pub struct AckReader<const N: usize> {
    buffer: String<N>,
    poll_interval: MilliSeconds,
}
impl<const N: usize> AckReader<N> {
    /// Creates a new `AckReader`.
    ///
    /// # Parameters
    ///
    /// - `poll_interval`: How long to wait when the channel has no data.
    ///   Intervals shorter than one millisecond are rounded up.
    pub fn new(poll_interval: MilliSeconds) -> Self {
        Self {
            buffer: String::new(),
            poll_interval: poll_interval.max(MilliSeconds::new(1)),
        }
    }

    /// Reads the next non-empty line and decodes it as a token.
    ///
    /// # Parameters
    ///
    /// - `channel`: Channel to read from.
    /// - `clock`: Clock for polling and the deadline.
    /// - `stop`: Releases the wait when raised.
    /// - `deadline`: Clock reading after which the read times out.
    ///
    /// # Returns
    ///
    /// The decoded token. Lines that are not tokens are returned as
    /// [Token::Unrecognized].
    pub fn read_token<C: Channel, K: Clock>(
        &mut self,
        channel: &mut C,
        clock: &mut K,
        stop: &StopSignal,
        deadline: MilliSeconds,
    ) -> Result<Token, MotionError> {
        loop {
            self.readln(channel, clock, stop, deadline)?;
            let line = self.buffer.trim();
            if line.is_empty() {
                continue;
            }
            let token = Token::parse(line);
            match token {
                Token::Unrecognized => warn!("Unrecognized line {:?}.", line),
                _ => debug!("Received {:?}.", token),
            }
            return Ok(token);
        }
    }

    /// Reads the next token, waiting at most `timeout` from now.
    pub fn read_next<C: Channel, K: Clock>(
        &mut self,
        channel: &mut C,
        clock: &mut K,
        stop: &StopSignal,
        timeout: MilliSeconds,
    ) -> Result<Token, MotionError> {
        let deadline = clock.now() + timeout;
        self.read_token(channel, clock, stop, deadline)
    }

    /// Discards everything the controller has sent so far.
    ///
    /// Late replies to a failed command, and the rest of a line whose read
    /// was abandoned, must not be taken for the reply to the next command.
    ///
    /// # Returns
    ///
    /// The number of non-empty lines discarded, counting a trailing partial
    /// line.
    pub fn drain<C: Channel>(&mut self, channel: &mut C) -> usize {
        let mut discarded = 0;
        self.buffer.clear();
        while let Ok(c) = channel.read() {
            if c == b'\n' {
                discarded += self.discard_line();
            } else {
                // Overlong stale lines are only logged truncated.
                let _ = self.buffer.push(c as char);
            }
        }
        discarded + self.discard_line()
    }

    fn discard_line(&mut self) -> usize {
        let line = self.buffer.trim();
        let discarded = if line.is_empty() {
            0
        } else {
            debug!("Discarding stale line {:?}.", line);
            1
        };
        self.buffer.clear();
        discarded
    }

    /// Reads one line, without its `\n`, into the buffer.
    fn readln<C: Channel, K: Clock>(
        &mut self,
        channel: &mut C,
        clock: &mut K,
        stop: &StopSignal,
        deadline: MilliSeconds,
    ) -> Result<(), MotionError> {
        self.buffer.clear();
        loop {
            let c = self.read_u8(channel, clock, stop, deadline)?;
            if c == b'\n' {
                break;
            }
            match self.buffer.push(c as char) {
                Ok(()) => {}
                Err(()) => return Err(MotionError::BufferOverflow),
            }
        }

        Ok(())
    }

    /// Polls for one byte until it arrives, the deadline passes, the channel
    /// fails or the stop signal is raised.
    fn read_u8<C: Channel, K: Clock>(
        &self,
        channel: &mut C,
        clock: &mut K,
        stop: &StopSignal,
        deadline: MilliSeconds,
    ) -> Result<u8, MotionError> {
        loop {
            if stop.is_raised() {
                return Err(MotionError::Cancelled);
            }
            match channel.read() {
                Ok(c) => return Ok(c),
                Err(nb::Error::Other(error)) => return Err(error.into()),
                Err(nb::Error::WouldBlock) => {
                    let now = clock.now();
                    if now >= deadline {
                        return Err(MotionError::Timeout);
                    }
                    clock.delay(min(self.poll_interval, deadline - now));
                }
            }
        }
    }
}
