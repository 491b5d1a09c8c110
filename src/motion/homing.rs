use log::{info, warn};

use crate::{Axis, Channel, Clock, HomingError, Machine, Verb};

impl<'s, C: Channel, K: Clock> Machine<'s, C, K> {
    /// Drives every axis onto its minimum limit switch.
    ///
    /// The length axis goes first, then width, then depth. Each move
    /// travels far enough to reach the switch from anywhere on the machine,
    /// so homing from home is harmless.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: all axes are at their minimum switches.
    /// - `Err(error)`: the first axis that failed, and why.
    pub fn home(&mut self) -> Result<(), HomingError> {
        info!("Starting to home the machine.");
        let travel = self.config().homing;
        let moves = [
            (Axis::X, Verb::Backward),
            (Axis::Y, Verb::Left),
            (Axis::Z, Verb::Up),
        ];
        for (axis, verb) in moves {
            self.move_to_min(axis, verb, travel.along(axis))
                .map_err(|cause| {
                    warn!("Homing axis {} failed.", axis);
                    HomingError { axis, cause }
                })?;
        }
        info!("Completed homing the machine.");
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        MachineConfig, MotionError, StopSignal, TestChannel, TestClock,
    };

    fn machine<'s>(
        primary: &TestChannel,
        secondary: &TestChannel,
        stop: &'s StopSignal,
    ) -> Machine<'s, TestChannel, TestClock> {
        Machine::new(
            primary.clone(),
            secondary.clone(),
            TestClock::new(),
            stop,
            MachineConfig::default(),
        )
    }

    #[test]
    fn test_home_from_anywhere() {
        let primary = TestChannel::at(21000, 0, 0);
        let secondary = TestChannel::at(0, 12500, 20000);
        let stop = StopSignal::new();
        let mut machine = machine(&primary, &secondary, &stop);

        assert_eq!(Ok(()), machine.home());
        assert_eq!(vec!["XB32767x"], primary.written());
        assert_eq!(vec!["YL15000x", "ZU23000x"], secondary.written());
        assert_eq!(0, primary.position(Axis::X));
        assert_eq!(0, secondary.position(Axis::Y));
        assert_eq!(0, secondary.position(Axis::Z));
    }

    #[test]
    fn test_home_twice_is_identical() {
        let primary = TestChannel::new();
        let secondary = TestChannel::new();
        let stop = StopSignal::new();
        let mut machine = machine(&primary, &secondary, &stop);

        assert_eq!(Ok(()), machine.home());
        let written = (primary.written(), secondary.written());
        let replies = (primary.replies(), secondary.replies());
        assert_eq!(vec!["X2min", "X1min"], replies.0);
        assert_eq!(vec!["Ymin", "Zmin"], replies.1);

        primary.clear_written();
        secondary.clear_written();
        assert_eq!(Ok(()), machine.home());
        assert_eq!(written, (primary.written(), secondary.written()));
        assert_eq!(replies, (primary.replies(), secondary.replies()));
    }

    #[test]
    fn test_failure_names_axis() {
        let primary = TestChannel::new();
        let secondary = TestChannel::new();
        let stop = StopSignal::new();
        let mut machine = machine(&primary, &secondary, &stop);
        // The depth move is the second write on the secondary channel.
        secondary.silence_from(1);

        assert_eq!(
            Err(HomingError {
                axis: Axis::Z,
                cause: MotionError::Timeout
            }),
            machine.home()
        );
    }

    #[test]
    fn test_closed_channel_aborts_first_axis() {
        let primary = TestChannel::new();
        let secondary = TestChannel::new();
        let stop = StopSignal::new();
        let mut machine = machine(&primary, &secondary, &stop);
        primary.close();

        assert_eq!(
            Err(HomingError {
                axis: Axis::X,
                cause: MotionError::ChannelClosed
            }),
            machine.home()
        );
        assert!(secondary.written().is_empty());
    }
}
