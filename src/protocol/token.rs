use ufmt_macros::uDebug;
use winnow::combinator::alt;
use winnow::token::{literal, rest};
use winnow::{Parser, Result};

use crate::Axis;

/// Motor that can acknowledge a command.
///
/// The length axis is driven by two motors, one on each side of the
/// machine; both report on the primary channel.
#[derive(Debug, uDebug, PartialEq, Eq, Copy, Clone)]
pub enum Motor {
    X1,
    X2,
    Y,
    Z,
}
impl Motor {
    /// Returns the motor whose acknowledgment completes a move of `axis`.
    pub fn leading(axis: Axis) -> Motor {
        match axis {
            Axis::X => Motor::X1,
            Axis::Y => Motor::Y,
            Axis::Z => Motor::Z,
        }
    }
}

/// Acknowledgment line sent by a motion controller.
#[derive(Debug, uDebug, PartialEq, Eq, Copy, Clone)]
pub enum Token {
    /// Minimum limit switch reached, like `X1min`.
    MinLimit(Motor),
    /// Maximum limit switch reached, like `Ymax`.
    MaxLimit(Motor),
    /// Any other line addressed from a motor; the move is complete.
    Done(Motor),
    /// A line that is not addressed from any motor.
    Unrecognized,
}
impl Token {
    /// Decodes one line from a controller.
    ///
    /// Surrounding whitespace is ignored. Decoding never fails: lines that
    /// do not start with a motor prefix become [Token::Unrecognized].
    pub fn parse(line: &str) -> Token {
        let mut input = line.trim();
        Self::parse_token
            .parse_next(&mut input)
            .unwrap_or(Token::Unrecognized)
    }

    /// Returns the motor that sent the token.
    pub fn motor(&self) -> Option<Motor> {
        match self {
            Token::MinLimit(motor)
            | Token::MaxLimit(motor)
            | Token::Done(motor) => Some(*motor),
            Token::Unrecognized => None,
        }
    }

    fn parse_token(input: &mut &str) -> Result<Token> {
        let motor = Self::parse_motor.parse_next(input)?;
        let suffix = rest.parse_next(input)?;
        Ok(match suffix {
            "min" => Token::MinLimit(motor),
            "max" => Token::MaxLimit(motor),
            _ => Token::Done(motor),
        })
    }

    fn parse_motor(input: &mut &str) -> Result<Motor> {
        alt((
            literal("X1").map(|_| Motor::X1),
            literal("X2").map(|_| Motor::X2),
            literal("Y").map(|_| Motor::Y),
            literal("Z").map(|_| Motor::Z),
        ))
        .parse_next(input)
    }
}

/// Which tokens complete a wait.
#[derive(Debug, uDebug, PartialEq, Eq, Copy, Clone)]
pub enum TokenClass {
    /// Only this exact token, eg. `Ymin` at the end of a homing move.
    Exact(Token),
    /// Any token from the motor, including its limit tokens.
    AnyFrom(Motor),
}
impl TokenClass {
    /// Class that completes an ordinary move of `axis`.
    pub fn move_of(axis: Axis) -> TokenClass {
        TokenClass::AnyFrom(Motor::leading(axis))
    }

    /// Class that completes a move of `axis` onto its minimum limit.
    pub fn min_limit_of(axis: Axis) -> TokenClass {
        TokenClass::Exact(Token::MinLimit(Motor::leading(axis)))
    }

    /// Checks if `token` completes a wait for this class.
    pub fn matches(&self, token: Token) -> bool {
        match self {
            TokenClass::Exact(expected) => {
                token != Token::Unrecognized && token == *expected
            }
            TokenClass::AnyFrom(motor) => token.motor() == Some(*motor),
        }
    }
}
