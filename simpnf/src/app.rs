use alloc::vec::Vec;
use core::fmt::{self, Display};

/// Application of a list of arguments to a symbol.
#[derive(Clone, Debug)]
pub struct App<S, A> {
    pub symbol: S,
    pub args: Vec<A>,
}

impl<S: Display, A: Display> Display for App<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        format(&self.symbol, &self.args, f)
    }
}

/// Print `head` applied to `tail`, parenthesised if `tail` is not empty.
pub fn format<H: Display, T: Display>(head: &H, tail: &[T], f: &mut fmt::Formatter) -> fmt::Result {
    if tail.is_empty() {
        return head.fmt(f);
    }
    write!(f, "({}", head)?;
    tail.iter().try_for_each(|t| write!(f, " {}", t))?;
    write!(f, ")")
}
