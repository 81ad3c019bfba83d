//! Tokens of the rule file syntax.

use core::fmt::{self, Display};
use logos::{Lexer, Logos};

#[derive(Logos, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token<'s> {
    #[token("def")]
    Def,

    #[token("thm")]
    Thm,

    #[token("@")]
    At,

    #[token("[")]
    LBrk,

    #[token("]")]
    RBrk,

    #[token("(")]
    LPar,

    #[token(")")]
    RPar,

    #[token(":")]
    Colon,

    #[token(":=")]
    ColonEq,

    #[token("->")]
    Arrow,

    #[token("=>")]
    FatArrow,

    #[token("-->")]
    LongArrow,

    #[token(",")]
    Comma,

    /// Either a path separator or the end of a command,
    /// as decided by [`Period`](crate::Period).
    #[token(".")]
    Dot,

    #[regex("[a-zA-Z0-9_!?][a-zA-Z0-9_!?']*")]
    #[token("{|", ident)]
    Ident(&'s str),

    #[regex(r"[ \t\r\n\f]+")]
    #[token("(;", comment)]
    Space,

    #[error]
    Error,
}

impl<'s> Display for Token<'s> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Def => "def",
            Self::Thm => "thm",
            Self::At => "@",
            Self::LBrk => "[",
            Self::RBrk => "]",
            Self::LPar => "(",
            Self::RPar => ")",
            Self::Colon => ":",
            Self::ColonEq => ":=",
            Self::Arrow => "->",
            Self::FatArrow => "=>",
            Self::LongArrow => "-->",
            Self::Comma => ",",
            Self::Dot => ".",
            Self::Ident(s) => s,
            Self::Space => " ",
            Self::Error => "<error>",
        };
        s.fmt(f)
    }
}

/// Consume a `{| ... |}` identifier, yielding it with its delimiters.
fn ident<'s>(lex: &mut Lexer<'s, Token<'s>>) -> Option<&'s str> {
    let end = lex.remainder().find("|}")? + "|}".len();
    lex.bump(end);
    Some(lex.slice())
}

/// Consume a possibly nested `(; ... ;)` comment.
fn comment<'s>(lex: &mut Lexer<'s, Token<'s>>) -> Option<()> {
    let mut depth = 1usize;
    let rest = lex.remainder();
    let mut chars = rest.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match (c, chars.peek().map(|(_, c)| *c)) {
            ('(', Some(';')) => depth += 1,
            (';', Some(')')) => depth -= 1,
            _ => continue,
        }
        chars.next();
        if depth == 0 {
            lex.bump(i + 2);
            return Some(());
        }
    }
    None
}

#[test]
fn nested_comment() {
    let toks: alloc::vec::Vec<_> = Token::lexer("a (; b (; c ;) ;) d").collect();
    let expected = [
        Token::Ident("a"),
        Token::Space,
        Token::Space,
        Token::Space,
        Token::Ident("d"),
    ];
    assert_eq!(toks, expected);
}

#[test]
fn long_arrow_wins() {
    let toks: alloc::vec::Vec<_> = Token::lexer("f-->g").collect();
    assert_eq!(toks, [Token::Ident("f"), Token::LongArrow, Token::Ident("g")]);
}
