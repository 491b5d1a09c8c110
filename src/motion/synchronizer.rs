use core::cmp::min;

use log::{debug, info, trace, warn};
use ufmt_macros::uDebug;

use crate::config::LINE_BUFFER_SIZE;
use crate::{
    AckReader, Axis, AxisGroup, Channel, Clock, Impulses, MachineConfig,
    MilliSeconds, MotionCommand, MotionError, StopSignal, Token, TokenClass,
    Verb,
};

/// State of one axis in the synchronizer.
#[derive(Debug, uDebug, PartialEq, Eq, Copy, Clone)]
pub enum AxisState {
    /// No command outstanding.
    Idle,
    /// A command was written.
    CommandSent,
    /// Waiting for the acknowledgment of the last command.
    AwaitingAck,
    /// The last command did not complete.
    Failed,
}

/// The machine, as seen through its two controller channels.
///
/// Every move is synchronized: the command is written, then tokens are read
/// until the expected acknowledgment arrives. A second command for an axis
/// is therefore never written before the first has resolved.
pub struct Machine<'s, C, K> {
    primary: C,
    secondary: C,
    clock: K,
    stop: &'s StopSignal,
    reader: AckReader<LINE_BUFFER_SIZE>,
    config: MachineConfig,
    states: [AxisState; 3],
}
impl<'s, C: Channel, K: Clock> Machine<'s, C, K> {
    /// Creates a new `Machine`.
    ///
    /// # Parameters
    ///
    /// - `primary`: Channel to the length axis controller.
    /// - `secondary`: Channel to the width and depth axis controller.
    /// - `clock`: Time source for timeouts, polling and settle pauses.
    /// - `stop`: Signal that cancels the running sequence.
    /// - `config`: Machine configuration.
    pub fn new(
        primary: C,
        secondary: C,
        clock: K,
        stop: &'s StopSignal,
        config: MachineConfig,
    ) -> Self {
        Self {
            primary,
            secondary,
            clock,
            stop,
            reader: AckReader::new(config.poll_interval),
            config,
            states: [AxisState::Idle; 3],
        }
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn stop_signal(&self) -> &'s StopSignal {
        self.stop
    }

    pub fn axis_state(&self, axis: Axis) -> AxisState {
        self.states[axis as usize]
    }

    /// Writes a command and waits for its acknowledgment.
    ///
    /// Tokens that do not match `expected` are skipped. Unrecognized lines
    /// are skipped as well, up to the configured budget.
    ///
    /// # Parameters
    ///
    /// - `command`: Command to write.
    /// - `expected`: Tokens that complete the move.
    /// - `timeout`: Time allowed from the write until a matching token.
    pub fn move_and_wait(
        &mut self,
        command: MotionCommand,
        expected: TokenClass,
        timeout: MilliSeconds,
    ) -> Result<(), MotionError> {
        let axis = command.axis();
        let result = self.synchronize(command, expected, timeout);
        match result {
            Ok(()) => self.transition(axis, AxisState::Idle),
            Err(error) => {
                warn!("Move of axis {} failed: {}", axis, error);
                self.transition(axis, AxisState::Failed);
            }
        }
        result
    }

    /// Moves an axis and waits for any token from its motor.
    pub fn move_axis(
        &mut self,
        axis: Axis,
        verb: Verb,
        magnitude: Impulses,
    ) -> Result<(), MotionError> {
        let command = MotionCommand::new(axis, verb, magnitude)?;
        let timeout = self.config.ack_timeout;
        self.move_and_wait(command, TokenClass::move_of(axis), timeout)
    }

    /// Moves an axis and waits until it reports its minimum limit.
    pub fn move_to_min(
        &mut self,
        axis: Axis,
        verb: Verb,
        magnitude: Impulses,
    ) -> Result<(), MotionError> {
        let command = MotionCommand::new(axis, verb, magnitude)?;
        let timeout = self.config.ack_timeout;
        self.move_and_wait(command, TokenClass::min_limit_of(axis), timeout)
    }

    /// Writes a stop command for every axis, without waiting.
    ///
    /// A failing channel does not prevent the stops on the other channel.
    ///
    /// # Returns
    ///
    /// The first write error, if any.
    pub fn stop_all(&mut self) -> Result<(), MotionError> {
        info!("Stopping all axes.");
        let mut result = Ok(());
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            let line = MotionCommand::stop(axis).encode()?;
            let channel = match axis.group() {
                AxisGroup::Primary => &mut self.primary,
                AxisGroup::Secondary => &mut self.secondary,
            };
            debug!("Writing {}.", line.as_str());
            if let Err(error) = channel.write(line.as_str()) {
                warn!("Stop of axis {} failed: {:?}", axis, error);
                if result.is_ok() {
                    result = Err(error.into());
                }
            }
            self.transition(axis, AxisState::Idle);
        }
        result
    }

    /// Waits for the machine to come to rest.
    ///
    /// The stop signal is checked every poll interval.
    pub fn settle(
        &mut self,
        duration: MilliSeconds,
    ) -> Result<(), MotionError> {
        let poll = self.config.poll_interval.max(MilliSeconds::new(1));
        let deadline = self.clock.now() + duration;
        loop {
            if self.stop.is_raised() {
                return Err(MotionError::Cancelled);
            }
            let now = self.clock.now();
            if now >= deadline {
                return Ok(());
            }
            self.clock.delay(min(poll, deadline - now));
        }
    }

    fn synchronize(
        &mut self,
        command: MotionCommand,
        expected: TokenClass,
        timeout: MilliSeconds,
    ) -> Result<(), MotionError> {
        if self.stop.is_raised() {
            return Err(MotionError::Cancelled);
        }
        let axis = command.axis();
        let line = command.encode()?;
        let deadline = self.clock.now() + timeout;

        let channel = match command.group() {
            AxisGroup::Primary => &mut self.primary,
            AxisGroup::Secondary => &mut self.secondary,
        };
        self.reader.drain(channel);
        debug!("Writing {}.", line.as_str());
        channel.write(line.as_str())?;
        transition(&mut self.states, axis, AxisState::CommandSent);
        transition(&mut self.states, axis, AxisState::AwaitingAck);

        let mut unrecognized = 0;
        loop {
            let token = self.reader.read_token(
                channel,
                &mut self.clock,
                self.stop,
                deadline,
            )?;
            if expected.matches(token) {
                return Ok(());
            }
            if token == Token::Unrecognized {
                unrecognized += 1;
                if unrecognized > self.config.unrecognized_budget {
                    return Err(MotionError::UnrecognizedToken);
                }
            } else {
                trace!("Skipping {:?}, waiting for {:?}.", token, expected);
            }
            if self.clock.now() >= deadline {
                return Err(MotionError::Timeout);
            }
        }
    }

    fn transition(&mut self, axis: Axis, state: AxisState) {
        transition(&mut self.states, axis, state);
    }
}

fn transition(states: &mut [AxisState; 3], axis: Axis, state: AxisState) {
    let previous = core::mem::replace(&mut states[axis as usize], state);
    if previous != state {
        trace!("Axis {}: {:?} -> {:?}.", axis, previous, state);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{EncodingError, TestChannel, TestClock};
    use std::thread;
    use std::time::{Duration, Instant};

    const UNRECOGNIZED_BUDGET: u32 = crate::config::UNRECOGNIZED_BUDGET;

    fn machine<'s>(
        primary: &TestChannel,
        secondary: &TestChannel,
        clock: &TestClock,
        stop: &'s StopSignal,
    ) -> Machine<'s, TestChannel, TestClock> {
        Machine::new(
            primary.clone(),
            secondary.clone(),
            clock.clone(),
            stop,
            MachineConfig::default(),
        )
    }

    #[test]
    fn test_move_completes() {
        let (primary, secondary) = (TestChannel::new(), TestChannel::new());
        let clock = TestClock::new();
        let stop = StopSignal::new();
        let mut machine = machine(&primary, &secondary, &clock, &stop);

        assert_eq!(Ok(()), machine.move_axis(Axis::Y, Verb::Right, 1000));
        assert_eq!(Ok(()), machine.move_axis(Axis::X, Verb::Forward, 500));
        assert_eq!(vec!["YR1000x"], secondary.written());
        assert_eq!(vec!["XF500x"], primary.written());
        assert_eq!(AxisState::Idle, machine.axis_state(Axis::X));
        assert_eq!(AxisState::Idle, machine.axis_state(Axis::Y));
    }

    #[test]
    fn test_skips_tokens_of_other_motors() {
        let (primary, secondary) = (TestChannel::new(), TestChannel::new());
        let clock = TestClock::new();
        let stop = StopSignal::new();
        let mut machine = machine(&primary, &secondary, &clock, &stop);
        secondary.script_next(&["Z", "Zmin", "Ymax"]);

        assert_eq!(Ok(()), machine.move_axis(Axis::Y, Verb::Right, 10));
    }

    #[test]
    fn test_exact_class_skips_plain_completion() {
        let (primary, secondary) = (TestChannel::new(), TestChannel::new());
        let clock = TestClock::new();
        let stop = StopSignal::new();
        let mut machine = machine(&primary, &secondary, &clock, &stop);

        // Moves 100 from 4000, so the switch is never reached.
        assert_eq!(
            Err(MotionError::Timeout),
            machine.move_to_min(Axis::Y, Verb::Left, 100)
        );
        assert_eq!(vec!["Y"], secondary.replies());
        assert_eq!(AxisState::Failed, machine.axis_state(Axis::Y));
    }

    #[test]
    fn test_timeout_measured_from_write() {
        let (primary, secondary) = (TestChannel::new(), TestChannel::new());
        let clock = TestClock::new();
        let stop = StopSignal::new();
        let mut machine = machine(&primary, &secondary, &clock, &stop);
        primary.script_next(&["X2"]);

        assert_eq!(
            Err(MotionError::Timeout),
            machine.move_axis(Axis::X, Verb::Forward, 10)
        );
        assert_eq!(MachineConfig::default().ack_timeout, clock.elapsed());
        assert_eq!(AxisState::Failed, machine.axis_state(Axis::X));
    }

    #[test]
    fn test_closed_channel() {
        let (primary, secondary) = (TestChannel::new(), TestChannel::new());
        let clock = TestClock::new();
        let stop = StopSignal::new();
        let mut machine = machine(&primary, &secondary, &clock, &stop);
        primary.close();

        assert_eq!(
            Err(MotionError::ChannelClosed),
            machine.move_axis(Axis::X, Verb::Backward, 10)
        );
    }

    #[test]
    fn test_unrecognized_budget() {
        let (primary, secondary) = (TestChannel::new(), TestChannel::new());
        let clock = TestClock::new();
        let stop = StopSignal::new();
        let mut machine = machine(&primary, &secondary, &clock, &stop);

        let mut script = vec!["noise"; UNRECOGNIZED_BUDGET as usize];
        script.push("Z");
        secondary.script_next(&script);
        assert_eq!(Ok(()), machine.move_axis(Axis::Z, Verb::Down, 10));

        script.insert(0, "noise");
        secondary.script_next(&script);
        assert_eq!(
            Err(MotionError::UnrecognizedToken),
            machine.move_axis(Axis::Z, Verb::Down, 10)
        );
    }

    #[test]
    fn test_late_reply_is_not_taken_for_next_move() {
        let (primary, secondary) = (TestChannel::new(), TestChannel::new());
        let clock = TestClock::new();
        let stop = StopSignal::new();
        let mut machine = machine(&primary, &secondary, &clock, &stop);
        let timeout = MachineConfig::default().ack_timeout;
        secondary.silence_from(0);

        assert_eq!(
            Err(MotionError::Timeout),
            machine.move_axis(Axis::Z, Verb::Down, 100)
        );
        // The controller finishes the first move after giving up on it.
        secondary.inject("Z");
        assert_eq!(
            Err(MotionError::Timeout),
            machine.move_axis(Axis::Z, Verb::Up, 100)
        );
        assert_eq!(timeout + timeout, clock.elapsed());
    }

    #[test]
    fn test_rest_of_abandoned_line_is_discarded() {
        let (primary, secondary) = (TestChannel::new(), TestChannel::new());
        let clock = TestClock::new();
        let stop = StopSignal::new();
        let config = MachineConfig {
            unrecognized_budget: 0,
            ..MachineConfig::default()
        };
        let mut machine = Machine::new(
            primary.clone(),
            secondary.clone(),
            clock.clone(),
            &stop,
            config,
        );
        secondary.script_next_bytes("Z");

        assert_eq!(
            Err(MotionError::Timeout),
            machine.move_axis(Axis::Z, Verb::Down, 100)
        );
        secondary.inject_bytes("min\r\n");
        assert_eq!(Ok(()), machine.move_axis(Axis::Z, Verb::Down, 100));
        assert_eq!(vec!["Z"], secondary.replies());
    }

    #[test]
    fn test_invalid_command_is_not_written() {
        let (primary, secondary) = (TestChannel::new(), TestChannel::new());
        let clock = TestClock::new();
        let stop = StopSignal::new();
        let mut machine = machine(&primary, &secondary, &clock, &stop);

        assert_eq!(
            Err(MotionError::Encoding(EncodingError::NegativeMagnitude)),
            machine.move_axis(Axis::Y, Verb::Right, -5)
        );
        assert!(secondary.written().is_empty());
    }

    #[test]
    fn test_raised_stop_prevents_write() {
        let (primary, secondary) = (TestChannel::new(), TestChannel::new());
        let clock = TestClock::new();
        let stop = StopSignal::new();
        let mut machine = machine(&primary, &secondary, &clock, &stop);
        stop.raise();

        assert_eq!(
            Err(MotionError::Cancelled),
            machine.move_axis(Axis::X, Verb::Forward, 10)
        );
        assert!(primary.written().is_empty());
    }

    #[test]
    fn test_stop_releases_pending_wait() {
        static STOP: StopSignal = StopSignal::new();
        let (primary, secondary) = (TestChannel::new(), TestChannel::new());
        let clock = TestClock::new();
        let mut machine = machine(&primary, &secondary, &clock, &STOP);
        secondary.raise_stop_on_write(0, &STOP);

        assert_eq!(
            Err(MotionError::Cancelled),
            machine.move_axis(Axis::Z, Verb::Down, 7500)
        );
        assert!(clock.elapsed() < MachineConfig::default().ack_timeout);
    }

    #[test]
    fn test_stop_from_another_thread() {
        /// Clock backed by the operating system.
        struct StdClock(Instant);
        impl Clock for StdClock {
            fn now(&self) -> MilliSeconds {
                MilliSeconds::new(self.0.elapsed().as_millis() as u64)
            }

            fn delay(&mut self, duration: MilliSeconds) {
                thread::sleep(Duration::from_millis(duration.get_value()));
            }
        }

        let (primary, secondary) = (TestChannel::new(), TestChannel::new());
        primary.silence_from(0);
        let stop = StopSignal::new();
        let started = Instant::now();
        let mut machine = Machine::new(
            primary.clone(),
            secondary,
            StdClock(started),
            &stop,
            MachineConfig::default(),
        );

        let result = thread::scope(|s| {
            s.spawn(|| {
                thread::sleep(Duration::from_millis(50));
                stop.raise();
            });
            machine.move_axis(Axis::X, Verb::Forward, 10)
        });
        assert_eq!(Err(MotionError::Cancelled), result);
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_stop_all_is_best_effort() {
        let (primary, secondary) = (TestChannel::new(), TestChannel::new());
        let clock = TestClock::new();
        let stop = StopSignal::new();
        let mut machine = machine(&primary, &secondary, &clock, &stop);
        primary.break_writes();

        assert_eq!(Err(MotionError::ChannelFault), machine.stop_all());
        assert_eq!(vec!["YSx", "ZSx"], secondary.written());
        assert!(secondary.replies().is_empty());
    }

    #[test]
    fn test_stop_all_ignores_stop_signal() {
        let (primary, secondary) = (TestChannel::new(), TestChannel::new());
        let clock = TestClock::new();
        let stop = StopSignal::new();
        let mut machine = machine(&primary, &secondary, &clock, &stop);
        stop.raise();

        assert_eq!(Ok(()), machine.stop_all());
        assert_eq!(vec!["XSx"], primary.written());
        assert_eq!(vec!["YSx", "ZSx"], secondary.written());
    }

    #[test]
    fn test_settle() {
        let (primary, secondary) = (TestChannel::new(), TestChannel::new());
        let clock = TestClock::new();
        let stop = StopSignal::new();
        let mut machine = machine(&primary, &secondary, &clock, &stop);

        assert_eq!(Ok(()), machine.settle(MilliSeconds::new(1005)));
        assert_eq!(MilliSeconds::new(1005), clock.elapsed());

        stop.raise();
        assert_eq!(
            Err(MotionError::Cancelled),
            machine.settle(MilliSeconds::new(1000))
        );
        assert_eq!(MilliSeconds::new(1005), clock.elapsed());
    }
}
