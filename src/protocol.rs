mod command;
mod token;

pub use command::encode;
pub use command::Axis;
pub use command::AxisGroup;
pub use command::Impulses;
pub use command::MotionCommand;
pub use command::Verb;
pub use command::WireLine;
pub use token::Motor;
pub use token::Token;
pub use token::TokenClass;
