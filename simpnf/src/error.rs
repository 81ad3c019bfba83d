//! Common error type.

use crate::env::Error as EnvError;
use crate::scope::Error as ScopeError;
use crate::Symbol;
use alloc::boxed::Box;
use core::fmt::{self, Display};

/// Side of a rewrite rule.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Common error type.
#[derive(Debug)]
pub enum Error {
    Parse(simpnf_parse::Error),
    Scope(ScopeError),
    Env(EnvError),
    /// a step budget was exhausted
    Timeout,
    /// no equation could be extracted from the type of the declaration
    NotAnEquation(Symbol),
    UnknownDeclaration(Symbol),
    /// normalising one side of a rule failed
    Normalize(Side, Box<Error>),
}

impl From<simpnf_parse::Error> for Error {
    fn from(err: simpnf_parse::Error) -> Self {
        Self::Parse(err)
    }
}

impl From<ScopeError> for Error {
    fn from(err: ScopeError) -> Self {
        Self::Scope(err)
    }
}

impl From<EnvError> for Error {
    fn from(err: EnvError) -> Self {
        Self::Env(err)
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Left => "left".fmt(f),
            Self::Right => "right".fmt(f),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "parse error: {}", e),
            Self::Scope(e) => write!(f, "scope error: {}", e),
            Self::Env(e) => write!(f, "environment error: {}", e),
            Self::Timeout => write!(f, "step limit exceeded"),
            Self::NotAnEquation(s) => write!(f, "{} is not an equation", s),
            Self::UnknownDeclaration(s) => write!(f, "unknown declaration {}", s),
            Self::Normalize(side, e) => write!(f, "simplify fails on {}-hand side: {}", side, e),
        }
    }
}
