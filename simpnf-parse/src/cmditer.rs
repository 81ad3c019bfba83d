use crate::cmd::{self, CmdError};
use crate::term::{self, Parser};
use crate::{Command, Period, Token};
use alloc::vec::Vec;
use core::fmt::{self, Display};

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    Command(cmd::Error),
    Term(term::Error),
    /// unrecognised input at the given byte offset
    Lex(usize),
    /// tokens after the end of a command or term
    TrailingInput,
    /// input ended before the period of a command
    ExpectedInput,
}

impl From<CmdError> for Error {
    fn from(e: CmdError) -> Self {
        match e {
            CmdError::Cmd(e) => Self::Command(e),
            CmdError::Term(e) => Self::Term(e),
        }
    }
}

impl From<term::Error> for Error {
    fn from(e: term::Error) -> Self {
        Self::Term(e)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Command(e) => e.fmt(f),
            Self::Term(e) => e.fmt(f),
            Self::Lex(pos) => write!(f, "unrecognised input at byte {}", pos),
            Self::TrailingInput => "unexpected input after end".fmt(f),
            Self::ExpectedInput => "unexpected end of input".fmt(f),
        }
    }
}

/// Iterator over the commands of a string.
pub struct CmdIter<'s> {
    tokens: Period<'s>,
}

impl<'s> CmdIter<'s> {
    pub fn new(s: &'s str) -> Self {
        let tokens = Period::new(s);
        Self { tokens }
    }
}

impl<'s> Iterator for CmdIter<'s> {
    type Item = Result<Command<&'s str>, Error>;
    fn next(&mut self) -> Option<Self::Item> {
        let mut tokens = Vec::new();
        loop {
            match self.tokens.next() {
                Some((Token::Dot, _)) => break,
                Some((Token::Error, pos)) => return Some(Err(Error::Lex(pos))),
                Some((tok, _)) => tokens.push(tok),
                None if tokens.is_empty() => return None,
                None => return Some(Err(Error::ExpectedInput)),
            }
        }
        let mut parser = Parser::new(tokens);
        let cmd = match parser.command() {
            Ok(cmd) => cmd,
            Err(e) => return Some(Err(e.into())),
        };
        if parser.at_end() {
            Some(Ok(cmd))
        } else {
            Some(Err(Error::TrailingInput))
        }
    }
}

impl<'s> Command<&'s str> {
    pub fn parse_str(s: &'s str) -> Result<Self, Error> {
        let err = Err(Error::ExpectedInput);
        CmdIter::new(s).next().unwrap_or(err)
    }
}

#[test]
fn positive() -> Result<(), Error> {
    Command::parse_str("nat : Type.")?;
    Command::parse_str("add : nat -> nat -> nat.")?;
    Command::parse_str("def len : list -> nat.")?;
    Command::parse_str("[x, l] len (cons x l) --> succ (len l).")?;
    Command::parse_str("[] len nil --> zero [x] f x --> x.")?;
    Command::parse_str("thm t (x : nat) : eq nat x x := eq.refl nat x.")?;
    Command::parse_str("@[simp] add_zero : a : nat -> eq nat (add a zero) a.")?;
    Command::parse_str("@[simp, pre] mul_one [m : Monoid A] : a : A -> eq A (mul a one) a.")?;
    Command::parse_str("@[reducible] def ge := x : nat => y : nat => le y x.")?;
    Ok(())
}

#[test]
fn shape() -> Result<(), Error> {
    use crate::Intro;
    match Command::parse_str("@[simp, pre] list.foo (x : nat) [i : C x] : p x.")? {
        Command::Intro(head, Intro::Declaration(_)) => {
            assert_eq!(head.name, "list.foo");
            assert_eq!(head.attrs, ["simp", "pre"]);
            assert_eq!(head.params.len(), 2);
            assert_eq!(head.params[1].kind, term::BinderKind::Instance);
        }
        _ => panic!("declaration expected"),
    }
    match Command::parse_str("[x : nat, l] len (cons x l) --> succ (len l).")? {
        Command::Rules(rules) => assert_eq!(rules[0].ctx.len(), 2),
        _ => panic!("rules expected"),
    }
    Ok(())
}

#[test]
fn display() -> Result<(), Error> {
    use alloc::string::ToString;
    let s = "@[simp] thm t (x : nat) : (eq nat x x) := (eq.refl nat x).";
    assert_eq!(Command::parse_str(s)?.to_string(), s);
    Ok(())
}

#[test]
fn negative() {
    use cmd::Error::*;
    let parse_err = |s: &str| match Command::parse_str(s) {
        Err(Error::Command(e)) => e,
        _ => panic!("command error expected"),
    };
    assert_eq!(parse_err("."), ExpectedCmd);
    assert_eq!(parse_err("x -> y."), ExpectedColon);
    assert_eq!(parse_err("def : a."), ExpectedIdent);
    assert_eq!(parse_err("def d -> a."), ExpectedColonOrColonEq);
    assert_eq!(parse_err("thm t := tm."), ExpectedColon);
    assert_eq!(parse_err("thm t :  ty."), ExpectedColonEq);
    assert_eq!(parse_err("thm t (-> a."), ExpectedIdent);
    assert_eq!(parse_err("thm t (x -> a."), ExpectedColon);
    assert_eq!(parse_err("thm t (x : a --> b."), ExpectedRPar);
    assert_eq!(parse_err("[-> a."), ExpectedCommaOrRBrk);
    assert_eq!(parse_err("[x -> a."), ExpectedCommaOrRBrk);
    assert_eq!(parse_err("[x] l."), ExpectedLongArrow);
    assert_eq!(parse_err("@[simp] [x] l --> r."), AttributesOnRules);
    assert_eq!(parse_err("@[simp x : a."), ExpectedCommaOrRBrk);
    assert_eq!(Command::parse_str("x : a"), Err(Error::ExpectedInput));
    assert_eq!(Command::parse_str("x : a ) ."), Err(Error::TrailingInput));
}
