//! Scoping of parse structures, distinguishing variables from constants.

use crate::env::{Attrs, Decl, Env};
use crate::pattern::{Pattern, TopPattern};
use crate::{Arg, BinderInfo, Command, Intro, Rule, Stack, Symbol, Term, TermC};
use alloc::{boxed::Box, string::String, string::ToString, sync::Arc, vec::Vec};
use core::fmt::{self, Display};
use simpnf_parse as parse;
use simpnf_parse::BinderKind;

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    UndeclaredSymbol(String),
    /// `_` outside the left-hand side of a rewrite rule
    Underscore,
    /// argument of a rule left-hand side that is not a pattern
    NoPattern,
    /// rule left-hand side that is not a symbol application
    NoTopPattern,
    UnknownAttribute(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::UndeclaredSymbol(s) => write!(f, "undeclared symbol {}", s),
            Self::Underscore => write!(f, "`_` is only allowed in rule left-hand sides"),
            Self::NoPattern => write!(f, "rule left-hand side contains a non-pattern"),
            Self::NoTopPattern => write!(f, "rule left-hand side is not a symbol application"),
            Self::UnknownAttribute(a) => write!(f, "unknown attribute {}", a),
        }
    }
}

type Bound<'s> = Stack<&'s str>;

pub trait Scope<Target> {
    fn scope(self, env: &Env) -> Result<Target, Error>;
}

pub trait Scopen<'s, Target> {
    /// Scope an open structure using supplied bound variables.
    fn scopen(self, env: &Env, bnd: &mut Bound<'s>) -> Result<Target, Error>;
}

impl<'s, Target, T: Scopen<'s, Target>> Scope<Target> for T {
    fn scope(self, env: &Env) -> Result<Target, Error> {
        self.scopen(env, &mut Stack::new())
    }
}

fn constant(env: &Env, name: &str) -> Result<Symbol, Error> {
    let sym = Symbol::new(name);
    match env.lookup(&sym) {
        Some(_) => Ok(sym),
        None => Err(Error::UndeclaredSymbol(name.to_string())),
    }
}

fn info(kind: BinderKind) -> BinderInfo {
    match kind {
        BinderKind::Explicit => BinderInfo::Default,
        BinderKind::Instance => BinderInfo::Instance,
    }
}

impl<'s> Scopen<'s, Term> for parse::Term<&'s str> {
    fn scopen(self, env: &Env, bnd: &mut Bound<'s>) -> Result<Term, Error> {
        match self {
            Self::Symb("Type") => Ok(Term::Type),
            Self::Symb("_") => Err(Error::Underscore),
            Self::Symb(x) => match bnd.iter().position(|y| *y == x) {
                Some(idx) => Ok(Term::BVar(idx)),
                None => Ok(Term::Const(constant(env, x)?)),
            },
            Self::Appl(head, args) => {
                let head: Term = (*head).scopen(env, bnd)?;
                let args = args.into_iter().map(|a| a.scopen(env, bnd));
                Ok(head.apply(args.collect::<Result<_, _>>()?))
            }
            Self::Prod(x, kind, ty, tm) => {
                let x = x.unwrap_or("_");
                let ty: Term = (*ty).scopen(env, bnd)?;
                let tm: Term = bnd.with_pushed(x, |bnd| (*tm).scopen(env, bnd))?;
                let arg = Arg {
                    id: Arc::from(x),
                    ty,
                    info: info(kind),
                };
                Ok(TermC::Prod(arg, tm).into())
            }
            Self::Abst(x, ty, tm) => {
                let ty: Option<Term> = ty.map(|ty| (*ty).scopen(env, bnd)).transpose()?;
                let tm: Term = bnd.with_pushed(x, |bnd| (*tm).scopen(env, bnd))?;
                Ok(TermC::Abst(Arg::new(x, ty), tm).into())
            }
        }
    }
}

impl<'s> Scopen<'s, Pattern> for parse::Term<&'s str> {
    fn scopen(self, env: &Env, bnd: &mut Bound<'s>) -> Result<Pattern, Error> {
        match self {
            Self::Symb("_") => Ok(Pattern::Joker),
            Self::Symb(x) => match bnd.iter().position(|y| *y == x) {
                Some(m) => Ok(Pattern::MVar(m)),
                None => Ok(Pattern::Symb(constant(env, x)?, Vec::new())),
            },
            Self::Appl(head, args2) => match Scopen::<Pattern>::scopen(*head, env, bnd)? {
                Pattern::Symb(s, mut args) => {
                    for a in args2 {
                        args.push(a.scopen(env, bnd)?)
                    }
                    Ok(Pattern::Symb(s, args))
                }
                _ => Err(Error::NoPattern),
            },
            Self::Prod(..) | Self::Abst(..) => Err(Error::NoPattern),
        }
    }
}

impl<'s> Scope<Rule> for parse::Rule<&'s str> {
    fn scope(self, env: &Env) -> Result<Rule, Error> {
        let mut bnd = Bound::new();
        let mut ctx = Vec::new();
        for (id, ty) in self.ctx {
            // context types are only checked for undeclared symbols
            if let Some(ty) = ty {
                let _: Term = ty.scopen(env, &mut bnd)?;
            }
            bnd.push(id);
            ctx.push(Arc::from(id));
        }

        let lhs: Pattern = self.lhs.scopen(env, &mut bnd)?;
        let lhs = TopPattern::try_from(lhs).map_err(|_| Error::NoTopPattern)?;
        let rhs: Term = self.rhs.scopen(env, &mut bnd)?;
        Ok(Rule { ctx, lhs, rhs })
    }
}

impl<'s> Scope<Command> for parse::Command<&'s str> {
    fn scope(self, env: &Env) -> Result<Command, Error> {
        match self {
            Self::Intro(head, it) => {
                use parse::Term::{Abst, Prod};
                let attrs = Attrs::parse(head.attrs.iter().copied())?;
                let it = head.params.into_iter().rev().fold(it, |it, p| {
                    let prod = |ty| Prod(Some(p.id), p.kind, Box::new(p.ty.clone()), Box::new(ty));
                    let abst = |tm| Abst(p.id, Some(Box::new(p.ty.clone())), Box::new(tm));
                    match it {
                        parse::Intro::Definition(ty, tm) => {
                            parse::Intro::Definition(ty.map(prod), tm.map(abst))
                        }
                        parse::Intro::Theorem(ty, tm) => parse::Intro::Theorem(prod(ty), abst(tm)),
                        parse::Intro::Declaration(ty) => parse::Intro::Declaration(prod(ty)),
                    }
                });
                let intro: Intro<Term> = match it {
                    parse::Intro::Definition(ty, tm) => Intro::Definition(
                        ty.map(|ty| ty.scope(env)).transpose()?,
                        tm.map(|tm| tm.scope(env)).transpose()?,
                    ),
                    parse::Intro::Theorem(ty, tm) => Intro::Theorem(ty.scope(env)?, tm.scope(env)?),
                    parse::Intro::Declaration(ty) => Intro::Declaration(ty.scope(env)?),
                };
                let name = Symbol::new(head.name);
                Ok(Command::Intro(Decl { name, intro, attrs }))
            }
            Self::Rules(rules) => {
                let rules = rules.into_iter().map(|r| r.scope(env));
                Ok(Command::Rules(rules.collect::<Result<_, _>>()?))
            }
        }
    }
}
