use crate::pattern::TopPattern;
use crate::Term;
use alloc::{sync::Arc, vec::Vec};
use core::fmt::{self, Display};

/// Definitional rewrite rule, such as `[x, l] len (cons x l) --> succ (len l)`.
#[derive(Clone, Debug)]
pub struct Rule {
    /// names of the context variables
    pub ctx: Vec<Arc<str>>,
    /// left-hand side (pattern to match with)
    pub lhs: TopPattern,
    /// right-hand side, referring to the context by de Bruijn indices
    pub rhs: Term,
}

impl Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ⟶ {}", self.lhs, self.rhs)
    }
}
