use log::{debug, info, warn};

use crate::{
    plan_next, Axis, Channel, Clock, Machine, MachineBounds, MachinePosition,
    MotionError, PlantKind, PlantStep, SeedingError, SeedingPlan,
    SeedingReport, SeedingStep, Verb,
};

/// Runs seeding sequences on a machine.
///
/// The planner borrows the machine for one run. The position is only
/// advanced once all moves of a plant have been acknowledged, so after a
/// failure it still names the last plant that was completely seeded.
pub struct SeedingPlanner<'m, 's, C, K> {
    machine: &'m mut Machine<'s, C, K>,
}
impl<'m, 's, C: Channel, K: Clock> SeedingPlanner<'m, 's, C, K> {
    pub fn new(machine: &'m mut Machine<'s, C, K>) -> Self {
        Self { machine }
    }

    /// Seeds a bed.
    ///
    /// The machine is homed, moved to `position`, and then seeds
    /// `plan.plant_count` plants before homing again.
    ///
    /// # Parameters
    ///
    /// - `plan`: What to plant.
    /// - `bounds`: Travel of the machine.
    /// - `position`: Where to start. Updated after every plant.
    ///
    /// A plant whose row would lie past `bounds.length` fails the run with
    /// [`MotionError::OutOfBounds`] before anything is written for it.
    pub fn run(
        &mut self,
        plan: &SeedingPlan,
        bounds: &MachineBounds,
        position: &mut MachinePosition,
    ) -> Result<SeedingReport, SeedingError> {
        info!(
            "Starting to seed {} plants from {}.",
            plan.plant_count, position
        );
        let settle = self.machine.config().settle;
        let final_settle = self.machine.config().final_settle;

        self.machine.home().map_err(|error| SeedingError {
            step: SeedingStep::Homing(error.axis),
            cause: error.cause,
        })?;
        self.machine.settle(settle).map_err(at(SeedingStep::Settling))?;
        self.go_to(*position).map_err(at(SeedingStep::Positioning))?;
        self.machine.settle(settle).map_err(at(SeedingStep::Settling))?;

        let mut report = SeedingReport::default();
        for index in 0..plan.plant_count {
            let step = plan_next(plan, bounds, *position).ok_or_else(|| {
                warn!("No row left after {} for plant {}.", position, index);
                SeedingError {
                    step: SeedingStep::Plant(index),
                    cause: MotionError::OutOfBounds,
                }
            })?;
            self.seed(plan, bounds, &step)
                .map_err(at(SeedingStep::Plant(index)))?;
            *position = step.next;
            report.record(step.kind);
            info!("Seeded plant {} at {}.", index, position);
        }

        self.machine
            .settle(final_settle)
            .map_err(at(SeedingStep::Settling))?;
        self.machine.home().map_err(|error| SeedingError {
            step: SeedingStep::FinalHoming(error.axis),
            cause: error.cause,
        })?;
        info!(
            "Completed seeding: {} plants, {} row wraps.",
            report.plants, report.row_wraps
        );
        Ok(report)
    }

    /// Moves from home to `position`, one axis group at a time.
    fn go_to(&mut self, position: MachinePosition) -> Result<(), MotionError> {
        debug!("Moving to {}.", position);
        self.machine
            .move_axis(Axis::X, Verb::Forward, position.along_length)?;
        self.machine
            .move_axis(Axis::Y, Verb::Right, position.along_width)
    }

    /// Executes the moves of one plant.
    fn seed(
        &mut self,
        plan: &SeedingPlan,
        bounds: &MachineBounds,
        step: &PlantStep,
    ) -> Result<(), MotionError> {
        match step.kind {
            PlantKind::InRow => {
                self.machine
                    .move_axis(Axis::Y, Verb::Right, plan.plant_spacing)?;
            }
            PlantKind::RowWrap => {
                debug!("Wrapping to the next row.");
                self.machine.move_to_min(Axis::Y, Verb::Left, bounds.width)?;
                self.machine
                    .move_axis(Axis::X, Verb::Forward, plan.row_spacing)?;
                self.machine.move_axis(
                    Axis::Y,
                    Verb::Right,
                    plan.plant_spacing / 2,
                )?;
            }
        }
        self.machine.move_axis(Axis::Z, Verb::Down, plan.seed_depth)?;
        self.machine.move_axis(Axis::Z, Verb::Up, plan.seed_depth)
    }
}

/// Attaches the step of the run to a motion error.
fn at(step: SeedingStep) -> impl Fn(MotionError) -> SeedingError {
    move |cause| SeedingError { step, cause }
}
