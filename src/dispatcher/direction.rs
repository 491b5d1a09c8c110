use core::fmt::{self, Display, Formatter};

use ufmt_macros::uDebug;
use winnow::combinator::alt;
use winnow::token::literal;
use winnow::{Parser, Result};

use crate::{Axis, Error, Verb};

/// Remote control request.
#[derive(Debug, uDebug, PartialEq, Eq, Copy, Clone)]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
    Home,
    Stop,
}
impl Direction {
    /// Parses a direction from its exact name, eg. `Forward`.
    pub fn parse(input: &str) -> core::result::Result<Direction, Error> {
        Self::parse_direction
            .parse(input)
            .map_err(|_| Error::UnknownDirection)
    }

    /// Returns the axis and verb of a jog, or `None` for the directions
    /// that are not jogs.
    pub fn jog(&self) -> Option<(Axis, Verb)> {
        match self {
            Direction::Forward => Some((Axis::X, Verb::Forward)),
            Direction::Backward => Some((Axis::X, Verb::Backward)),
            Direction::Left => Some((Axis::Y, Verb::Left)),
            Direction::Right => Some((Axis::Y, Verb::Right)),
            Direction::Up => Some((Axis::Z, Verb::Up)),
            Direction::Down => Some((Axis::Z, Verb::Down)),
            Direction::Home | Direction::Stop => None,
        }
    }

    fn parse_direction(input: &mut &str) -> Result<Direction> {
        alt((
            literal("Forward").map(|_| Direction::Forward),
            literal("Backward").map(|_| Direction::Backward),
            literal("Left").map(|_| Direction::Left),
            literal("Right").map(|_| Direction::Right),
            literal("Up").map(|_| Direction::Up),
            literal("Down").map(|_| Direction::Down),
            literal("Home").map(|_| Direction::Home),
            literal("Stop").map(|_| Direction::Stop),
        ))
        .parse_next(input)
    }
}
impl Display for Direction {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let name = match self {
            Direction::Forward => "Forward",
            Direction::Backward => "Backward",
            Direction::Left => "Left",
            Direction::Right => "Right",
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Home => "Home",
            Direction::Stop => "Stop",
        };
        write!(f, "{}", name)
    }
}
