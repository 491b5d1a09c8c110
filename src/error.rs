use core::fmt::{self, Display, Formatter};

use ufmt_macros::uDebug;

use crate::{Axis, ChannelError};

/// Errors that occur while encoding a motion command.
///
/// These are always detected before anything is written to a channel.
#[derive(Debug, uDebug, PartialEq, Eq, Copy, Clone)]
pub enum EncodingError {
    /// The magnitude was negative.
    NegativeMagnitude,
    /// The verb cannot be executed by the axis (eg. `X` moving left).
    InvalidVerb,
    /// The encoded line did not fit in its buffer.
    LineTooLong,
}
impl Display for EncodingError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            EncodingError::NegativeMagnitude => {
                write!(f, "Magnitude must not be negative.")
            }
            EncodingError::InvalidVerb => {
                write!(f, "Verb is not valid for the axis.")
            }
            EncodingError::LineTooLong => {
                write!(f, "Encoded command is too long.")
            }
        }
    }
}

/// Errors from a single synchronized move.
#[derive(Debug, uDebug, PartialEq, Eq, Copy, Clone)]
pub enum MotionError {
    /// The command could not be encoded.
    Encoding(EncodingError),
    /// No matching acknowledgment arrived before the deadline.
    Timeout,
    /// The controller kept sending lines that are not tokens.
    UnrecognizedToken,
    /// The channel was closed.
    ChannelClosed,
    /// The channel failed to write a command.
    ChannelFault,
    /// A line from the controller did not fit in the line buffer.
    BufferOverflow,
    /// The stop signal was raised.
    Cancelled,
    /// The move would take the head past the travel of the machine.
    OutOfBounds,
}
impl Display for MotionError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            MotionError::Encoding(error) => write!(f, "{}", error),
            MotionError::Timeout => write!(f, "Acknowledgment timed out."),
            MotionError::UnrecognizedToken => {
                write!(f, "Too many unrecognized acknowledgments.")
            }
            MotionError::ChannelClosed => write!(f, "Channel closed."),
            MotionError::ChannelFault => write!(f, "Channel write failed."),
            MotionError::BufferOverflow => {
                write!(f, "Acknowledgment buffer overflow.")
            }
            MotionError::Cancelled => write!(f, "Cancelled by stop."),
            MotionError::OutOfBounds => {
                write!(f, "Move would leave the machine bounds.")
            }
        }
    }
}
impl From<EncodingError> for MotionError {
    fn from(error: EncodingError) -> Self {
        MotionError::Encoding(error)
    }
}
impl From<ChannelError> for MotionError {
    fn from(error: ChannelError) -> Self {
        match error {
            ChannelError::Closed => MotionError::ChannelClosed,
            ChannelError::Fault => MotionError::ChannelFault,
        }
    }
}

/// Homing failed on an axis.
#[derive(Debug, uDebug, PartialEq, Eq, Copy, Clone)]
pub struct HomingError {
    /// Axis that did not reach its minimum limit.
    pub axis: Axis,
    /// Why the move failed.
    pub cause: MotionError,
}
impl Display for HomingError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "Homing failed on axis {}: {}", self.axis, self.cause)
    }
}

/// Step of a seeding run.
#[derive(Debug, uDebug, PartialEq, Eq, Copy, Clone)]
pub enum SeedingStep {
    /// Homing before the run.
    Homing(Axis),
    /// Moving to the recorded start position.
    Positioning,
    /// Seeding the plant with the given (zero-based) index.
    Plant(u32),
    /// Waiting for the machine to settle.
    Settling,
    /// Homing after the run.
    FinalHoming(Axis),
}
impl Display for SeedingStep {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            SeedingStep::Homing(axis) => write!(f, "homing axis {}", axis),
            SeedingStep::Positioning => write!(f, "positioning"),
            SeedingStep::Plant(index) => write!(f, "plant {}", index),
            SeedingStep::Settling => write!(f, "settling"),
            SeedingStep::FinalHoming(axis) => {
                write!(f, "final homing axis {}", axis)
            }
        }
    }
}

/// A seeding run was aborted.
#[derive(Debug, uDebug, PartialEq, Eq, Copy, Clone)]
pub struct SeedingError {
    /// Where the run stopped.
    pub step: SeedingStep,
    /// Why it stopped.
    pub cause: MotionError,
}
impl Display for SeedingError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "Seeding failed at {}: {}", self.step, self.cause)
    }
}

/// Errors reported by the [crate::Dispatcher].
#[derive(Debug, uDebug, PartialEq, Eq, Copy, Clone)]
pub enum Error {
    /// The remote control direction was not recognized.
    UnknownDirection,
    /// A jog or stop failed.
    Motion(MotionError),
    /// Homing failed.
    Homing(HomingError),
    /// Seeding failed.
    Seeding(SeedingError),
}
impl Error {
    /// Returns `true` if the error was caused by the stop signal.
    pub fn is_cancelled(&self) -> bool {
        let cause = match self {
            Error::UnknownDirection => return false,
            Error::Motion(cause) => cause,
            Error::Homing(error) => &error.cause,
            Error::Seeding(error) => &error.cause,
        };
        *cause == MotionError::Cancelled
    }
}
impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Error::UnknownDirection => write!(f, "Unknown direction."),
            Error::Motion(error) => write!(f, "{}", error),
            Error::Homing(error) => write!(f, "{}", error),
            Error::Seeding(error) => write!(f, "{}", error),
        }
    }
}
impl From<MotionError> for Error {
    fn from(error: MotionError) -> Self {
        Error::Motion(error)
    }
}
impl From<HomingError> for Error {
    fn from(error: HomingError) -> Self {
        Error::Homing(error)
    }
}
impl From<SeedingError> for Error {
    fn from(error: SeedingError) -> Self {
        Error::Seeding(error)
    }
}
