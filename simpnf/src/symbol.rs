//! Global names.

use alloc::{string::String, sync::Arc};
use core::fmt::{self, Display};

/// Immutable, cheaply clonable global name such as `list.length.equations._eqn_1`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(Arc<str>);

/// Component marking a generated equation lemma of a definition.
pub const EQUATIONS: &str = "equations";

impl Symbol {
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Dot-separated components of the name.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Last component of the name.
    pub fn last(&self) -> &str {
        self.components().last().unwrap_or("")
    }

    /// Return the prefix preceding an `equations` component, if there is one.
    ///
    /// ~~~
    /// # use simpnf::Symbol;
    /// let eqn = Symbol::new("list.length.equations._eqn_1");
    /// assert_eq!(eqn.eqn_owner(), Some(Symbol::new("list.length")));
    /// assert_eq!(Symbol::new("eq.trans").eqn_owner(), None);
    /// ~~~
    pub fn eqn_owner(&self) -> Option<Self> {
        let mut prefix = String::new();
        for c in self.components() {
            if c == EQUATIONS {
                return (!prefix.is_empty()).then(|| Self::new(&prefix));
            }
            if !prefix.is_empty() {
                prefix.push('.');
            }
            prefix.push_str(c);
        }
        None
    }

    /// The `i`-th equation lemma of a definition, counting from one.
    pub fn eqn(&self, i: usize) -> Self {
        Self::new(&alloc::format!("{}.{}._eqn_{}", self, EQUATIONS, i))
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Names with a fixed meaning.
pub mod names {
    pub const PROP: &str = "Prop";
    pub const TRUE: &str = "true";
    pub const FALSE: &str = "false";
    pub const NOT: &str = "not";
    pub const AND: &str = "and";
    pub const IFF: &str = "iff";
    pub const EQ: &str = "eq";
    pub const NE: &str = "ne";

    // proof plumbing, never declared
    pub const EQ_REFL: &str = "eq.refl";
    pub const EQ_TRANS: &str = "eq.trans";
    pub const EQ_CONGR: &str = "eq.congr";
    pub const EQ_CONGR_FUN: &str = "eq.congr_fun";
    pub const EQ_FUNEXT: &str = "eq.funext";
    pub const EQ_PI_CONGR: &str = "eq.pi_congr";
    pub const EQ_DELTA: &str = "eq.delta";
    pub const OF_EQ_TRUE: &str = "of_eq_true";
    pub const TRUE_INTRO: &str = "true.intro";
    pub const PROPEXT: &str = "propext";
    pub const AND_LEFT: &str = "and.left";
    pub const AND_RIGHT: &str = "and.right";
    pub const EQ_TRUE: &str = "eq_true";
    pub const EQ_FALSE: &str = "eq_false";
    pub const SORRY: &str = "sorry";

    /// Prefix of auxiliary lemmas standing for preprocessed statements.
    pub const AUX_LEMMA: &str = "_aux_lemma";
}
