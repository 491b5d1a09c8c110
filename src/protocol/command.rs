use core::fmt::{self, Display, Formatter};

use ufmt::{uDisplay, uWrite};
use ufmt_macros::uDebug;
use winnow::ascii::digit1;
use winnow::combinator::{alt, eof, opt};
use winnow::token::literal;
use winnow::{Parser, Result};

use crate::EncodingError;

/// Number of motor impulses.
pub type Impulses = i32;

/// Motor axis.
#[derive(Debug, uDebug, PartialEq, Eq, Copy, Clone)]
pub enum Axis {
    /// Length axis, on the primary channel.
    X,
    /// Width axis, on the secondary channel.
    Y,
    /// Depth (dig) axis, sharing the secondary channel with `Y`.
    Z,
}
impl Axis {
    /// Returns the letter that addresses the axis on the wire.
    pub fn letter(&self) -> char {
        match self {
            Axis::X => 'X',
            Axis::Y => 'Y',
            Axis::Z => 'Z',
        }
    }

    /// Returns the channel group that drives the axis.
    pub fn group(&self) -> AxisGroup {
        match self {
            Axis::X => AxisGroup::Primary,
            Axis::Y | Axis::Z => AxisGroup::Secondary,
        }
    }
}
impl Display for Axis {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Group of motors that share one serial channel.
#[derive(Debug, uDebug, PartialEq, Eq, Copy, Clone)]
pub enum AxisGroup {
    /// The length-axis motors.
    Primary,
    /// The width and depth motors.
    Secondary,
}

/// What an axis is asked to do.
#[derive(Debug, uDebug, PartialEq, Eq, Copy, Clone)]
pub enum Verb {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
    Stop,
}
impl Verb {
    /// Returns the verb character used on the wire.
    pub fn code(&self) -> char {
        match self {
            Verb::Forward => 'F',
            Verb::Backward => 'B',
            Verb::Left => 'L',
            Verb::Right => 'R',
            Verb::Up => 'U',
            Verb::Down => 'D',
            Verb::Stop => 'S',
        }
    }

    /// Checks if the verb can be executed by an axis.
    fn is_valid_for(&self, axis: Axis) -> bool {
        match (axis, self) {
            (_, Verb::Stop) => true,
            (Axis::X, Verb::Forward | Verb::Backward) => true,
            (Axis::Y, Verb::Left | Verb::Right) => true,
            (Axis::Z, Verb::Up | Verb::Down) => true,
            _ => false,
        }
    }
}

/// Line sent to a motion controller, like `XF32767x`.
#[derive(Debug, PartialEq, Clone)]
pub struct WireLine(heapless::String<16>);
impl WireLine {
    /// Returns the line as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}
impl AsRef<str> for WireLine {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}
impl uWrite for WireLine {
    type Error = ();

    fn write_str(&mut self, s: &str) -> core::result::Result<(), ()> {
        self.0.push_str(s)
    }
}

/// A single motion command for one axis.
///
/// Stop commands carry no magnitude; every other command carries a
/// non-negative number of impulses.
#[derive(Debug, uDebug, PartialEq, Eq, Copy, Clone)]
pub struct MotionCommand {
    axis: Axis,
    verb: Verb,
    magnitude: Option<u32>,
}
impl MotionCommand {
    /// Creates a new `MotionCommand`.
    ///
    /// For [Verb::Stop] the magnitude is ignored.
    ///
    /// # Parameters
    ///
    /// - `axis`: Axis to command.
    /// - `verb`: What the axis should do.
    /// - `magnitude`: Number of impulses to move.
    ///
    /// # Returns
    ///
    /// - `Ok(command)`: if the command is valid.
    /// - `Err(error)`: if the magnitude is negative or the verb does not
    ///   belong to the axis.
    pub fn new(
        axis: Axis,
        verb: Verb,
        magnitude: Impulses,
    ) -> core::result::Result<Self, EncodingError> {
        if !verb.is_valid_for(axis) {
            return Err(EncodingError::InvalidVerb);
        }
        if verb == Verb::Stop {
            return Ok(Self::stop(axis));
        }
        let magnitude = u32::try_from(magnitude)
            .map_err(|_| EncodingError::NegativeMagnitude)?;
        Ok(Self {
            axis,
            verb,
            magnitude: Some(magnitude),
        })
    }

    /// Creates a stop command for an axis.
    pub fn stop(axis: Axis) -> Self {
        Self {
            axis,
            verb: Verb::Stop,
            magnitude: None,
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn verb(&self) -> Verb {
        self.verb
    }

    pub fn magnitude(&self) -> Option<u32> {
        self.magnitude
    }

    /// Returns the channel group the command must be written to.
    pub fn group(&self) -> AxisGroup {
        self.axis.group()
    }

    /// Encodes the command as a wire line.
    pub fn encode(&self) -> core::result::Result<WireLine, EncodingError> {
        let mut line = WireLine(heapless::String::new());
        ufmt::uwrite!(&mut line, "{}", *self)
            .map_err(|_| EncodingError::LineTooLong)?;
        Ok(line)
    }

    /// Parses a wire line back into a command.
    ///
    /// The whole input must be a single command.
    pub fn parse(input: &mut &str) -> Result<MotionCommand> {
        let (axis, verb, magnitude, _, _) = (
            Self::parse_axis,
            Self::parse_verb,
            opt(digit1.try_map(str::parse::<u32>)),
            literal("x"),
            eof,
        )
            .parse_next(input)?;

        // Stops have no magnitude, everything else needs one.
        match (verb, magnitude) {
            (Verb::Stop, None) => Ok(Self::stop(axis)),
            (Verb::Stop, Some(_)) | (_, None) => {
                Err(winnow::error::ContextError::new())
            }
            (verb, Some(magnitude)) if verb.is_valid_for(axis) => Ok(Self {
                axis,
                verb,
                magnitude: Some(magnitude),
            }),
            _ => Err(winnow::error::ContextError::new()),
        }
    }

    fn parse_axis(input: &mut &str) -> Result<Axis> {
        alt((
            literal("X").map(|_| Axis::X),
            literal("Y").map(|_| Axis::Y),
            literal("Z").map(|_| Axis::Z),
        ))
        .parse_next(input)
    }

    fn parse_verb(input: &mut &str) -> Result<Verb> {
        alt((
            literal("F").map(|_| Verb::Forward),
            literal("B").map(|_| Verb::Backward),
            literal("L").map(|_| Verb::Left),
            literal("R").map(|_| Verb::Right),
            literal("U").map(|_| Verb::Up),
            literal("D").map(|_| Verb::Down),
            literal("S").map(|_| Verb::Stop),
        ))
        .parse_next(input)
    }
}

/// Wire format: `<axis letter><verb code><magnitude>x`.
impl uDisplay for MotionCommand {
    fn fmt<W>(
        &self,
        f: &mut ufmt::Formatter<'_, W>,
    ) -> core::result::Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        f.write_char(self.axis.letter())?;
        f.write_char(self.verb.code())?;
        if let Some(magnitude) = self.magnitude {
            uDisplay::fmt(&magnitude, f)?;
        }
        f.write_char('x')
    }
}

/// Encodes a motion command for an axis.
///
/// # Parameters
///
/// - `axis`: Axis to command.
/// - `verb`: What the axis should do.
/// - `magnitude`: Number of impulses; ignored for [Verb::Stop].
///
/// # Returns
///
/// The wire line, eg. `ZU23000x`, or an [EncodingError].
pub fn encode(
    axis: Axis,
    verb: Verb,
    magnitude: Impulses,
) -> core::result::Result<WireLine, EncodingError> {
    MotionCommand::new(axis, verb, magnitude)?.encode()
}
