mod plan;
mod planner;

pub use plan::plan_next;
pub use plan::MachineBounds;
pub use plan::MachinePosition;
pub use plan::PlantKind;
pub use plan::PlantStep;
pub use plan::SeedingPlan;
pub use plan::SeedingReport;
pub use planner::SeedingPlanner;
