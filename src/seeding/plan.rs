use core::fmt::{self, Display, Formatter};

use ufmt_macros::uDebug;

use crate::Impulses;

/// Position of the seeding head, relative to home.
#[derive(Debug, uDebug, Default, PartialEq, Eq, Copy, Clone)]
pub struct MachinePosition {
    pub along_length: Impulses,
    pub along_width: Impulses,
}
impl Display for MachinePosition {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.along_length, self.along_width)
    }
}

/// Usable travel of the machine.
#[derive(Debug, uDebug, PartialEq, Eq, Copy, Clone)]
pub struct MachineBounds {
    pub width: Impulses,
    pub length: Impulses,
}

/// What a seeding run plants.
#[derive(Debug, uDebug, PartialEq, Eq, Copy, Clone)]
pub struct SeedingPlan {
    pub plant_count: u32,
    /// Distance between rows, along the length axis.
    pub row_spacing: Impulses,
    /// Distance between plants in a row, along the width axis.
    pub plant_spacing: Impulses,
    pub seed_depth: Impulses,
}

/// How a plant is reached.
#[derive(Debug, uDebug, PartialEq, Eq, Copy, Clone)]
pub enum PlantKind {
    /// One plant spacing further along the current row.
    InRow,
    /// At the start of the next row.
    RowWrap,
}

/// The next plant of a run.
#[derive(Debug, uDebug, PartialEq, Eq, Copy, Clone)]
pub struct PlantStep {
    pub kind: PlantKind,
    /// Position once the plant is seeded.
    pub next: MachinePosition,
}

/// Outcome of a completed seeding run.
#[derive(Debug, uDebug, Default, PartialEq, Eq, Copy, Clone)]
pub struct SeedingReport {
    pub plants: u32,
    pub row_wraps: u32,
}
impl SeedingReport {
    pub(crate) fn record(&mut self, kind: PlantKind) {
        self.plants += 1;
        if kind == PlantKind::RowWrap {
            self.row_wraps += 1;
        }
    }
}

/// Decides where the next plant goes.
///
/// The plant stays in the current row if, one plant spacing further on,
/// there is still half a plant spacing left before the edge of the bed.
/// Otherwise the head wraps to the next row, half a plant spacing in from
/// the edge.
///
/// # Parameters
///
/// - `plan`: Spacing of the plants.
/// - `bounds`: Travel of the machine.
/// - `position`: Position of the previous plant.
///
/// # Returns
///
/// The next plant, or `None` if the next row lies beyond the length of the
/// machine.
pub fn plan_next(
    plan: &SeedingPlan,
    bounds: &MachineBounds,
    position: MachinePosition,
) -> Option<PlantStep> {
    let spacing = i64::from(plan.plant_spacing);
    let candidate = i64::from(position.along_width) + spacing;

    // candidate + spacing / 2 <= width, without truncating the half
    if 2 * candidate + spacing <= 2 * i64::from(bounds.width) {
        return Some(PlantStep {
            kind: PlantKind::InRow,
            next: MachinePosition {
                along_width: position
                    .along_width
                    .saturating_add(plan.plant_spacing),
                ..position
            },
        });
    }

    let along_length = position.along_length.saturating_add(plan.row_spacing);
    if along_length > bounds.length {
        return None;
    }
    Some(PlantStep {
        kind: PlantKind::RowWrap,
        next: MachinePosition {
            along_length,
            along_width: plan.plant_spacing / 2,
        },
    })
}
