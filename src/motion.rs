mod homing;
mod reader;
mod synchronizer;

pub use reader::AckReader;
pub use synchronizer::AxisState;
pub use synchronizer::Machine;
