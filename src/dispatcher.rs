mod direction;

use log::{info, warn};

pub use direction::Direction;

use crate::{
    Channel, Clock, Error, Machine, MachinePosition, SeedingPlanner,
    SeedingReport,
};

/// Request to seed a bed.
#[derive(Debug, Default, PartialEq, Eq, Copy, Clone)]
pub struct Plant<'a> {
    /// Name of what is being planted, for the log.
    pub name: Option<&'a str>,
}

/// Entry point for inbound requests.
///
/// The dispatcher owns the machine and the seeding position. It handles
/// one request at a time, to completion. Every failure is logged and
/// returned; the dispatcher itself stays usable.
pub struct Dispatcher<'s, C, K> {
    machine: Machine<'s, C, K>,
    position: MachinePosition,
}
impl<'s, C: Channel, K: Clock> Dispatcher<'s, C, K> {
    /// Creates a new `Dispatcher`, starting at the configured start
    /// position.
    pub fn new(machine: Machine<'s, C, K>) -> Self {
        let position = machine.config().start_position;
        Self { machine, position }
    }

    /// Handles a remote control request by name, eg. `"Forward"`.
    pub fn handle_remote_control(
        &mut self,
        direction: &str,
    ) -> Result<(), Error> {
        let direction = Direction::parse(direction).map_err(|error| {
            warn!("Unknown direction {:?}.", direction);
            error
        })?;
        self.handle_direction(direction)
    }

    /// Handles a remote control request.
    ///
    /// Jogs move one axis by its configured jog travel and wait for the
    /// motor to acknowledge. `Stop` writes a stop command for every axis
    /// without waiting.
    pub fn handle_direction(
        &mut self,
        direction: Direction,
    ) -> Result<(), Error> {
        info!("Remote control: {}.", direction);
        let result = match direction.jog() {
            Some((axis, verb)) => {
                let magnitude = self.machine.config().jog.along(axis);
                self.machine
                    .move_axis(axis, verb, magnitude)
                    .map_err(Error::from)
            }
            None if direction == Direction::Home => {
                self.machine.home().map_err(Error::from)
            }
            None => return self.stop(),
        };
        self.finish(result)
    }

    /// Runs a seeding sequence from the current position.
    pub fn handle_seeding(
        &mut self,
        plant: &Plant,
    ) -> Result<SeedingReport, Error> {
        info!("Seeding {}.", plant.name.unwrap_or("unnamed plant"));
        let config = *self.machine.config();
        let result = SeedingPlanner::new(&mut self.machine)
            .run(&config.plan, &config.bounds, &mut self.position)
            .map_err(Error::from);
        self.finish(result)
    }

    /// Position of the last plant.
    pub fn position(&self) -> MachinePosition {
        self.position
    }

    pub fn machine(&self) -> &Machine<'s, C, K> {
        &self.machine
    }

    /// Stops every axis and lowers the stop signal.
    fn stop(&mut self) -> Result<(), Error> {
        let result = self.machine.stop_all();
        self.machine.stop_signal().clear();
        result.map_err(Error::from)
    }

    /// Logs a failed request. A cancelled request also stops the machine.
    fn finish<T>(&mut self, result: Result<T, Error>) -> Result<T, Error> {
        if let Err(error) = &result {
            warn!("{}", error);
            if error.is_cancelled() {
                if let Err(stop_error) = self.stop() {
                    warn!("Stopping after cancel failed: {}", stop_error);
                }
            }
        }
        result
    }
}
