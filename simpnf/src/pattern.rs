//! Left-hand sides of definitional rewrite rules.

use crate::app::format as fmt_appl;
use crate::{App, Symbol};
use alloc::vec::Vec;
use core::fmt::{self, Display};

/// Miller variable.
///
/// This refers to the variables appearing in a rewrite pattern
/// bound by the rewrite rule's context.
/// The variable `i` is the `i`-th last variable of the context,
/// matching the de Bruijn index of the same variable in the right-hand side.
pub type Miller = usize;

/// Rewrite pattern.
///
/// This may be nonlinear; e.g. `eq A X X` is a valid pattern.
#[derive(Clone, Debug)]
pub enum Pattern {
    /// matches an application of a symbol to as many arguments as given
    Symb(Symbol, Vec<Pattern>),
    /// matches any term, variable may appear multiple times in
    /// both left-hand and right-hand sides of rewrite rule
    MVar(Miller),
    /// matches any term
    Joker,
}

/// Pattern at the left-hand side of a rewrite rule.
///
/// The top pattern of a rule must be an application of patterns to a symbol.
/// This is to exclude rules matching any term, such as `[X] X --> f`.
pub type TopPattern = App<Symbol, Pattern>;

impl TryFrom<Pattern> for TopPattern {
    type Error = ();

    fn try_from(p: Pattern) -> Result<Self, Self::Error> {
        match p {
            Pattern::Symb(symbol, args) => Ok(TopPattern { symbol, args }),
            _ => Err(()),
        }
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Symb(s, pats) => fmt_appl(s, pats, f),
            Self::MVar(m) => write!(f, "μ{}", m),
            Self::Joker => write!(f, "_"),
        }
    }
}
