#![cfg_attr(not(test), no_std)]

mod channel;
mod clock;
pub mod config;
mod dispatcher;
mod error;
mod milliseconds;
mod motion;
mod protocol;
mod seeding;
mod stop;

pub use channel::Channel;
pub use channel::ChannelError;
pub use clock::Clock;
pub use config::MachineConfig;
pub use dispatcher::Direction;
pub use dispatcher::Dispatcher;
pub use dispatcher::Plant;
pub use error::EncodingError;
pub use error::Error;
pub use error::HomingError;
pub use error::MotionError;
pub use error::SeedingError;
pub use error::SeedingStep;
pub use milliseconds::MilliSeconds;
pub use motion::AckReader;
pub use motion::AxisState;
pub use motion::Machine;
pub use protocol::encode;
pub use protocol::Axis;
pub use protocol::AxisGroup;
pub use protocol::Impulses;
pub use protocol::Motor;
pub use protocol::MotionCommand;
pub use protocol::Token;
pub use protocol::TokenClass;
pub use protocol::Verb;
pub use protocol::WireLine;
pub use seeding::plan_next;
pub use seeding::MachineBounds;
pub use seeding::MachinePosition;
pub use seeding::PlantKind;
pub use seeding::PlantStep;
pub use seeding::SeedingPlan;
pub use seeding::SeedingPlanner;
pub use seeding::SeedingReport;
pub use stop::StopSignal;

#[cfg(test)]
pub use channel::TestChannel;
#[cfg(test)]
pub use clock::TestClock;
