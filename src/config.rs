use crate::{
    Axis, Impulses, MachineBounds, MachinePosition, MilliSeconds, SeedingPlan,
};

// JOG TRAVEL
pub const JOG_LENGTH: Impulses = 32767;
pub const JOG_WIDTH: Impulses = 14000;
pub const JOG_DEPTH: Impulses = 23000;

// HOMING TRAVEL (enough to reach the minimum switch from anywhere)
pub const HOMING_LENGTH: Impulses = 32767;
pub const HOMING_WIDTH: Impulses = 15000;
pub const HOMING_DEPTH: Impulses = 23000;

// FIELD
pub const BED_WIDTH: Impulses = 13000;
pub const BED_LENGTH: Impulses = 37000;
pub const START_LENGTH: Impulses = 5000;
pub const START_WIDTH: Impulses = 0;

// SEEDING
pub const PLANT_COUNT: u32 = 10;
pub const ROW_SPACING: Impulses = 3000;
pub const PLANT_SPACING: Impulses = 3000;
pub const SEED_DEPTH: Impulses = 7500;

// TIMING
pub const ACK_TIMEOUT: MilliSeconds = MilliSeconds::new(60_000);
pub const POLL_INTERVAL: MilliSeconds = MilliSeconds::new(10);
pub const SETTLE: MilliSeconds = MilliSeconds::new(1000);
pub const FINAL_SETTLE: MilliSeconds = MilliSeconds::new(2500);

/// Unrecognized lines tolerated while waiting for one acknowledgment.
pub const UNRECOGNIZED_BUDGET: u32 = 8;

/// Longest acknowledgment line, in bytes, including the line ending.
pub const LINE_BUFFER_SIZE: usize = 32;

/// Magnitudes for a move of each axis.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Travel {
    pub length: Impulses,
    pub width: Impulses,
    pub depth: Impulses,
}
impl Travel {
    /// Returns the magnitude for `axis`.
    pub fn along(&self, axis: Axis) -> Impulses {
        match axis {
            Axis::X => self.length,
            Axis::Y => self.width,
            Axis::Z => self.depth,
        }
    }
}

/// Machine configuration.
///
/// `MachineConfig::default()` reproduces the field machine; tests and
/// other machines override single fields.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct MachineConfig {
    /// Remote control jogs.
    pub jog: Travel,
    /// Homing moves.
    pub homing: Travel,
    /// How long to wait for the acknowledgment of one move.
    pub ack_timeout: MilliSeconds,
    /// How long to wait between polls of an idle channel.
    pub poll_interval: MilliSeconds,
    /// Pause after homing and after reaching the start position.
    pub settle: MilliSeconds,
    /// Pause before homing at the end of a seeding run.
    pub final_settle: MilliSeconds,
    /// See [UNRECOGNIZED_BUDGET].
    pub unrecognized_budget: u32,
    pub bounds: MachineBounds,
    pub plan: SeedingPlan,
    /// Where seeding starts, relative to home.
    pub start_position: MachinePosition,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            jog: Travel {
                length: JOG_LENGTH,
                width: JOG_WIDTH,
                depth: JOG_DEPTH,
            },
            homing: Travel {
                length: HOMING_LENGTH,
                width: HOMING_WIDTH,
                depth: HOMING_DEPTH,
            },
            ack_timeout: ACK_TIMEOUT,
            poll_interval: POLL_INTERVAL,
            settle: SETTLE,
            final_settle: FINAL_SETTLE,
            unrecognized_budget: UNRECOGNIZED_BUDGET,
            bounds: MachineBounds {
                width: BED_WIDTH,
                length: BED_LENGTH,
            },
            plan: SeedingPlan {
                plant_count: PLANT_COUNT,
                row_spacing: ROW_SPACING,
                plant_spacing: PLANT_SPACING,
                seed_depth: SEED_DEPTH,
            },
            start_position: MachinePosition {
                along_length: START_LENGTH,
                along_width: START_WIDTH,
            },
        }
    }
}
