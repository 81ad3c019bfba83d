//! Terms of the surface syntax and their parser.

use crate::Token;
use alloc::{boxed::Box, vec::Vec};
use core::fmt::{self, Display};

/// Binder kind of a product.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinderKind {
    /// `x : A -> B` or `A -> B`
    Explicit,
    /// `[x : A] -> B`, solved by instance search
    Instance,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Term<S> {
    /// Symbol name, possibly qualified (`a.b.c`)
    Symb(S),
    /// Application
    Appl(Box<Self>, Vec<Self>),
    /// Abstraction (`x : A => t` or `x => t`)
    Abst(S, Option<Box<Self>>, Box<Self>),
    /// Dependent product (`x : A -> t`, `A -> t`, or `[x : A] -> t`)
    Prod(Option<S>, BinderKind, Box<Self>, Box<Self>),
}

impl<S> Term<S> {
    pub fn map<T>(self, f: &impl Fn(S) -> T) -> Term<T> {
        let mapb = |tm: Box<Self>| Box::new(tm.map(f));
        match self {
            Self::Symb(s) => Term::Symb(f(s)),
            Self::Appl(head, args) => {
                let args = args.into_iter().map(|a| a.map(f)).collect();
                Term::Appl(mapb(head), args)
            }
            Self::Abst(x, ty, tm) => Term::Abst(f(x), ty.map(mapb), mapb(tm)),
            Self::Prod(x, k, ty, tm) => Term::Prod(x.map(f), k, mapb(ty), mapb(tm)),
        }
    }
}

impl<S: Display> Display for Term<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Symb(s) => s.fmt(f),
            Self::Appl(head, args) => {
                write!(f, "({}", head)?;
                args.iter().try_for_each(|a| write!(f, " {}", a))?;
                write!(f, ")")
            }
            Self::Abst(x, Some(ty), tm) => write!(f, "({} : {} => {})", x, ty, tm),
            Self::Abst(x, None, tm) => write!(f, "({} => {})", x, tm),
            Self::Prod(None, _, ty, tm) => write!(f, "({} -> {})", ty, tm),
            Self::Prod(Some(x), BinderKind::Explicit, ty, tm) => {
                write!(f, "({} : {} -> {})", x, ty, tm)
            }
            Self::Prod(Some(x), BinderKind::Instance, ty, tm) => {
                write!(f, "([{} : {}] -> {})", x, ty, tm)
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    ExpectedIdentOrLPar,
    ExpectedIdent,
    ExpectedColon,
    ExpectedRBrk,
    ExpectedArrow,
    AbstractionWithoutRhs,
    UnclosedLPar,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Self::ExpectedIdentOrLPar => "expected identifier or `(`",
            Self::ExpectedIdent => "expected identifier",
            Self::ExpectedColon => "expected `:`",
            Self::ExpectedRBrk => "expected `]`",
            Self::ExpectedArrow => "expected `->`",
            Self::AbstractionWithoutRhs => "expected `->` or `=>` after binder",
            Self::UnclosedLPar => "unclosed `(`",
        };
        s.fmt(f)
    }
}

type Result<T> = core::result::Result<T, Error>;

/// Recursive-descent parser over the tokens of a single command.
pub struct Parser<'s> {
    tokens: Vec<Token<'s>>,
    pos: usize,
}

impl<'s> Parser<'s> {
    pub fn new(tokens: Vec<Token<'s>>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub(crate) fn peek(&self) -> Option<Token<'s>> {
        self.peek_at(0)
    }

    pub(crate) fn peek_at(&self, i: usize) -> Option<Token<'s>> {
        self.tokens.get(self.pos + i).copied()
    }

    pub(crate) fn advance(&mut self) -> Option<Token<'s>> {
        let tok = self.peek()?;
        self.pos += 1;
        Some(tok)
    }

    /// Consume the next token if it equals `tok`.
    pub(crate) fn eat(&mut self, tok: Token<'s>) -> bool {
        let eq = self.peek() == Some(tok);
        if eq {
            self.pos += 1;
        }
        eq
    }

    pub(crate) fn ident(&mut self) -> Option<&'s str> {
        match self.peek()? {
            Token::Ident(s) => {
                self.pos += 1;
                Some(s)
            }
            _ => None,
        }
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Parse a term, including binders.
    pub fn term(&mut self) -> Result<Term<&'s str>> {
        match (self.peek(), self.peek_at(1)) {
            (Some(Token::LBrk), _) => {
                self.advance();
                let x = self.ident().ok_or(Error::ExpectedIdent)?;
                if !self.eat(Token::Colon) {
                    return Err(Error::ExpectedColon);
                }
                let ty = self.app()?;
                if !self.eat(Token::RBrk) {
                    return Err(Error::ExpectedRBrk);
                }
                if !self.eat(Token::Arrow) {
                    return Err(Error::ExpectedArrow);
                }
                let tm = self.term()?;
                Ok(Term::Prod(Some(x), BinderKind::Instance, Box::new(ty), Box::new(tm)))
            }
            (Some(Token::Ident(x)), Some(Token::Colon)) => {
                self.pos += 2;
                let ty = Box::new(self.app()?);
                if self.eat(Token::Arrow) {
                    let tm = Box::new(self.term()?);
                    Ok(Term::Prod(Some(x), BinderKind::Explicit, ty, tm))
                } else if self.eat(Token::FatArrow) {
                    Ok(Term::Abst(x, Some(ty), Box::new(self.term()?)))
                } else {
                    Err(Error::AbstractionWithoutRhs)
                }
            }
            (Some(Token::Ident(x)), Some(Token::FatArrow)) => {
                self.pos += 2;
                Ok(Term::Abst(x, None, Box::new(self.term()?)))
            }
            _ => {
                let ty = self.app()?;
                if self.eat(Token::Arrow) {
                    let tm = self.term()?;
                    Ok(Term::Prod(None, BinderKind::Explicit, Box::new(ty), Box::new(tm)))
                } else {
                    Ok(ty)
                }
            }
        }
    }

    /// Parse an application of atoms.
    fn app(&mut self) -> Result<Term<&'s str>> {
        let head = self.atom()?;
        let mut args = Vec::new();
        while matches!(self.peek(), Some(Token::Ident(_)) | Some(Token::LPar)) {
            args.push(self.atom()?);
        }
        if args.is_empty() {
            Ok(head)
        } else {
            Ok(Term::Appl(Box::new(head), args))
        }
    }

    fn atom(&mut self) -> Result<Term<&'s str>> {
        match self.peek() {
            Some(Token::Ident(s)) => {
                self.pos += 1;
                Ok(Term::Symb(s))
            }
            Some(Token::LPar) => {
                self.pos += 1;
                let tm = self.term()?;
                if self.eat(Token::RPar) {
                    Ok(tm)
                } else {
                    Err(Error::UnclosedLPar)
                }
            }
            _ => Err(Error::ExpectedIdentOrLPar),
        }
    }
}

impl<'s> Term<&'s str> {
    /// Parse a term that spans the whole input.
    ///
    /// ~~~
    /// use simpnf_parse::Term;
    /// let tm = Term::parse_str("x : nat -> eq nat (add x zero) x")?;
    /// assert_eq!(tm.to_string(), "(x : nat -> (eq nat (add x zero) x))");
    /// # Ok::<_, simpnf_parse::Error>(())
    /// ~~~
    pub fn parse_str(s: &'s str) -> core::result::Result<Self, crate::Error> {
        let tokens = crate::Period::new(s)
            .map(|(tok, pos)| match tok {
                Token::Error => Err(crate::Error::Lex(pos)),
                tok => Ok(tok),
            })
            .collect::<core::result::Result<_, _>>()?;
        let mut parser = Parser::new(tokens);
        let tm = parser.term()?;
        match parser.peek() {
            None => Ok(tm),
            Some(_) => Err(crate::Error::TrailingInput),
        }
    }
}

#[test]
fn binders() -> core::result::Result<(), crate::Error> {
    use alloc::string::ToString;
    let tm = Term::parse_str("[i : Monoid A] -> a : A -> eq A (mul a one) a")?;
    assert!(matches!(tm, Term::Prod(Some("i"), BinderKind::Instance, _, _)));
    let tm = Term::parse_str("x => y : nat => f x y")?;
    assert_eq!(tm.to_string(), "(x => (y : nat => (f x y)))");
    let tm = Term::parse_str("nat -> (nat -> nat) -> nat")?;
    assert_eq!(tm.to_string(), "(nat -> ((nat -> nat) -> nat))");
    Ok(())
}

#[test]
fn errors() {
    let err = |s: &str| match Term::parse_str(s) {
        Err(crate::Error::Term(e)) => e,
        _ => panic!("term error expected"),
    };
    assert_eq!(err("(f x"), Error::UnclosedLPar);
    assert_eq!(err("x : nat"), Error::AbstractionWithoutRhs);
    assert_eq!(err("-> x"), Error::ExpectedIdentOrLPar);
    assert_eq!(err("[x : A -> B"), Error::ExpectedRBrk);
}
