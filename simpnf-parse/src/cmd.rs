//! Commands of the surface syntax.

use crate::term::{self, BinderKind, Parser};
use crate::{Term, Token};
use alloc::vec::Vec;
use core::fmt::{self, Display};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command<S, Tm = Term<S>> {
    /// Introduce a new symbol with attributes and parameters
    Intro(Head<S, Tm>, Intro<Tm>),
    /// Add definitional rewrite rules
    Rules(Vec<Rule<S, Tm>>),
}

/// Name, attributes, and parameters of an introduced symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Head<S, Tm = Term<S>> {
    pub name: S,
    /// attributes from `@[a, b]`
    pub attrs: Vec<S>,
    /// parameters `(x : A)` and `[x : A]`
    pub params: Vec<Param<S, Tm>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Param<S, Tm = Term<S>> {
    pub id: S,
    pub kind: BinderKind,
    pub ty: Tm,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intro<Ty, Tm = Ty> {
    Definition(Option<Ty>, Option<Tm>),
    Theorem(Ty, Tm),
    Declaration(Ty),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule<S, Tm = Term<S>> {
    /// context (bound variables)
    pub ctx: Vec<(S, Option<Tm>)>,
    /// left-hand side (pattern to match with)
    pub lhs: Tm,
    /// right-hand side (term to replace with)
    pub rhs: Tm,
}

impl<S: Display> Display for Command<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Intro(head, it) => {
                if !head.attrs.is_empty() {
                    write!(f, "@[")?;
                    let mut attrs = head.attrs.iter().peekable();
                    while let Some(a) = attrs.next() {
                        write!(f, "{}", a)?;
                        if attrs.peek().is_some() {
                            write!(f, ", ")?;
                        }
                    }
                    write!(f, "] ")?;
                }
                match it {
                    Intro::Theorem(_, _) => write!(f, "thm ")?,
                    Intro::Definition(_, _) => write!(f, "def ")?,
                    Intro::Declaration(_) => (),
                };
                write!(f, "{}", head.name)?;
                head.params.iter().try_for_each(|p| match p.kind {
                    BinderKind::Explicit => write!(f, " ({} : {})", p.id, p.ty),
                    BinderKind::Instance => write!(f, " [{} : {}]", p.id, p.ty),
                })?;
                match it {
                    Intro::Definition(ty, tm) => {
                        ty.iter().try_for_each(|ty| write!(f, " : {}", ty))?;
                        tm.iter().try_for_each(|tm| write!(f, " := {}", tm))?
                    }
                    Intro::Theorem(ty, tm) => write!(f, " : {} := {}", ty, tm)?,
                    Intro::Declaration(ty) => write!(f, " : {}", ty)?,
                }
                write!(f, ".")
            }
            Self::Rules(rules) => rules.iter().try_for_each(|rule| rule.fmt(f)),
        }
    }
}

impl<S: Display> Display for Rule<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        let mut ctx = self.ctx.iter().peekable();
        while let Some((x, ty)) = ctx.next() {
            write!(f, "{}", x)?;
            ty.iter().try_for_each(|ty| write!(f, " : {}", ty))?;
            if ctx.peek().is_some() {
                write!(f, ", ")?;
            }
        }
        write!(f, "] {} --> {}.", self.lhs, self.rhs)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    ExpectedColon,
    ExpectedColonEq,
    ExpectedColonOrColonEq,
    ExpectedLongArrow,
    ExpectedIdent,
    ExpectedCommaOrRBrk,
    ExpectedRPar,
    ExpectedLBrk,
    ExpectedCmd,
    AttributesOnRules,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Self::ExpectedColon => "expected `:`",
            Self::ExpectedColonEq => "expected `:=`",
            Self::ExpectedColonOrColonEq => "expected `:` or `:=`",
            Self::ExpectedLongArrow => "expected `-->`",
            Self::ExpectedIdent => "expected identifier",
            Self::ExpectedCommaOrRBrk => "expected `,` or `]`",
            Self::ExpectedRPar => "expected `)`",
            Self::ExpectedLBrk => "expected `[`",
            Self::ExpectedCmd => "expected command",
            Self::AttributesOnRules => "rewrite rules cannot carry attributes",
        };
        s.fmt(f)
    }
}

/// Error while parsing a command, which may stem from one of its terms.
#[derive(Debug, PartialEq, Eq)]
pub enum CmdError {
    Cmd(Error),
    Term(term::Error),
}

impl From<Error> for CmdError {
    fn from(e: Error) -> Self {
        Self::Cmd(e)
    }
}

impl From<term::Error> for CmdError {
    fn from(e: term::Error) -> Self {
        Self::Term(e)
    }
}

type Result<T> = core::result::Result<T, CmdError>;

impl<'s> Parser<'s> {
    /// Parse a command from the tokens preceding its period.
    pub fn command(&mut self) -> Result<Command<&'s str>> {
        let attrs = self.attrs()?;
        match self.peek() {
            Some(Token::LBrk) if attrs.is_empty() => Ok(Command::Rules(self.rules()?)),
            Some(Token::LBrk) => Err(Error::AttributesOnRules.into()),
            Some(Token::Def) => {
                self.advance();
                let head = self.head(attrs)?;
                let ty = if self.eat(Token::Colon) {
                    Some(self.term()?)
                } else {
                    None
                };
                let tm = if self.eat(Token::ColonEq) {
                    Some(self.term()?)
                } else {
                    None
                };
                if ty.is_none() && tm.is_none() {
                    return Err(Error::ExpectedColonOrColonEq.into());
                }
                Ok(Command::Intro(head, Intro::Definition(ty, tm)))
            }
            Some(Token::Thm) => {
                self.advance();
                let head = self.head(attrs)?;
                if !self.eat(Token::Colon) {
                    return Err(Error::ExpectedColon.into());
                }
                let ty = self.term()?;
                if !self.eat(Token::ColonEq) {
                    return Err(Error::ExpectedColonEq.into());
                }
                let tm = self.term()?;
                Ok(Command::Intro(head, Intro::Theorem(ty, tm)))
            }
            Some(Token::Ident(_)) => {
                let head = self.head(attrs)?;
                if !self.eat(Token::Colon) {
                    return Err(Error::ExpectedColon.into());
                }
                Ok(Command::Intro(head, Intro::Declaration(self.term()?)))
            }
            _ => Err(Error::ExpectedCmd.into()),
        }
    }

    /// Parse `@[a, b, ...]`, if present.
    fn attrs(&mut self) -> Result<Vec<&'s str>> {
        let mut attrs = Vec::new();
        if !self.eat(Token::At) {
            return Ok(attrs);
        }
        if !self.eat(Token::LBrk) {
            return Err(Error::ExpectedLBrk.into());
        }
        loop {
            attrs.push(self.ident().ok_or(Error::ExpectedIdent)?);
            match self.advance() {
                Some(Token::Comma) => continue,
                Some(Token::RBrk) => return Ok(attrs),
                _ => return Err(Error::ExpectedCommaOrRBrk.into()),
            }
        }
    }

    fn head(&mut self, attrs: Vec<&'s str>) -> Result<Head<&'s str>> {
        let name = self.ident().ok_or(Error::ExpectedIdent)?;
        let mut params = Vec::new();
        loop {
            let (kind, close, err) = match self.peek() {
                Some(Token::LPar) => (BinderKind::Explicit, Token::RPar, Error::ExpectedRPar),
                Some(Token::LBrk) => (BinderKind::Instance, Token::RBrk, Error::ExpectedCommaOrRBrk),
                _ => break,
            };
            self.advance();
            let id = self.ident().ok_or(Error::ExpectedIdent)?;
            if !self.eat(Token::Colon) {
                return Err(Error::ExpectedColon.into());
            }
            let ty = self.term()?;
            if !self.eat(close) {
                return Err(err.into());
            }
            params.push(Param { id, kind, ty });
        }
        Ok(Head {
            name,
            attrs,
            params,
        })
    }

    fn rules(&mut self) -> Result<Vec<Rule<&'s str>>> {
        let mut rules = Vec::new();
        while self.eat(Token::LBrk) {
            let mut ctx = Vec::new();
            if !self.eat(Token::RBrk) {
                loop {
                    let x = self.ident().ok_or(Error::ExpectedCommaOrRBrk)?;
                    let ty = if self.eat(Token::Colon) {
                        Some(self.term()?)
                    } else {
                        None
                    };
                    ctx.push((x, ty));
                    match self.advance() {
                        Some(Token::Comma) => continue,
                        Some(Token::RBrk) => break,
                        _ => return Err(Error::ExpectedCommaOrRBrk.into()),
                    }
                }
            }
            let lhs = self.term()?;
            if !self.eat(Token::LongArrow) {
                return Err(Error::ExpectedLongArrow.into());
            }
            let rhs = self.term()?;
            rules.push(Rule { ctx, lhs, rhs });
        }
        Ok(rules)
    }
}
