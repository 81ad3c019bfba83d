//! Parser for rewrite rule databases in a Dedukti-like syntax.
//!
//! Example usage:
//!
//! ~~~
//! use simpnf_parse::{CmdIter, Command, Error};
//!
//! let cmds = "nat : Type. @[simp] add_zero : a : nat -> eq nat (add a zero) a.";
//! let cmds = CmdIter::new(&cmds);
//! let cmds: Result<Vec<_>, _> = cmds.collect();
//! assert_eq!(cmds?.len(), 2);
//! # Ok::<_, Error>(())
//! ~~~
#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod cmd;
mod cmditer;
pub mod lex;
mod period;
pub mod term;

pub use cmd::{Command, Head, Intro, Param, Rule};
pub use cmditer::{CmdIter, Error};
pub use lex::Token;
pub use period::Period;
pub use term::{BinderKind, Term};

use logos::Logos;

/// Lex a string, omitting whitespace and comments.
pub fn lex(s: &str) -> impl Iterator<Item = Token<'_>> {
    Token::lexer(s).filter(|token| *token != Token::Space)
}
