use crate::Token;
use alloc::collections::VecDeque;
use core::ops::Range;
use logos::{Logos, SpannedIter};

/// Token stream without whitespace, where adjacent `a.b.c` become one identifier.
///
/// Every remaining [`Token::Dot`] terminates a command.
/// Each token is yielded together with its byte offset in the input.
pub struct Period<'s> {
    src: &'s str,
    iter: SpannedIter<'s, Token<'s>>,
    buf: VecDeque<(Token<'s>, Range<usize>)>,
}

impl<'s> Period<'s> {
    pub fn new(src: &'s str) -> Self {
        let iter = Token::lexer(src).spanned();
        let buf = VecDeque::new();
        Self { src, iter, buf }
    }

    fn raw(&mut self, i: usize) -> Option<&(Token<'s>, Range<usize>)> {
        while self.buf.len() <= i {
            let next = self.iter.next()?;
            self.buf.push_back(next);
        }
        self.buf.get(i)
    }

    /// Extend an identifier ending at `end` by adjacent `.ident` suffixes.
    fn qualify(&mut self, mut end: usize) -> usize {
        loop {
            let dot_adjacent = matches!(self.raw(0), Some((Token::Dot, r)) if r.start == end);
            if !dot_adjacent {
                return end;
            }
            let dot_end = self.buf[0].1.end;
            match self.raw(1) {
                Some((Token::Ident(_), r)) if r.start == dot_end => {
                    end = r.end;
                    self.buf.drain(..2);
                }
                _ => return end,
            }
        }
    }
}

impl<'s> Iterator for Period<'s> {
    type Item = (Token<'s>, usize);
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.raw(0)?;
            let (token, span) = self.buf.pop_front()?;
            match token {
                Token::Space => continue,
                Token::Ident(s) if !s.starts_with("{|") => {
                    let end = self.qualify(span.end);
                    return Some((Token::Ident(&self.src[span.start..end]), span.start));
                }
                _ => return Some((token, span.start)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn tokens(s: &str) -> Vec<Token> {
        Period::new(s).map(|(tok, _)| tok).collect()
    }

    #[test]
    fn qualified() {
        let toks = tokens("list.length.equations._eqn_1 x.");
        let expected = [
            Token::Ident("list.length.equations._eqn_1"),
            Token::Ident("x"),
            Token::Dot,
        ];
        assert_eq!(toks, expected);
    }

    #[test]
    fn spaced_dot_ends_command() {
        let toks = tokens("a . b.(; c ;)");
        let expected = [
            Token::Ident("a"),
            Token::Dot,
            Token::Ident("b"),
            Token::Dot,
        ];
        assert_eq!(toks, expected);
    }
}
