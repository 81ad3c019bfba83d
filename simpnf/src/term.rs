//! Terms with global constants, bound and free variables, and placeholders.

use crate::app::format as fmt_appl;
use crate::{Arg, BinderInfo, Symbol};
use alloc::{collections::BTreeSet, sync::Arc, vec::Vec};
use core::fmt::{self, Display};
use core::hash::{Hash, Hasher};
use core::ops::Deref;

/// De Bruijn variable.
pub type DeBruijn = usize;

/// Free variable, standing for an opened binder.
///
/// Two free variables are equal iff they have the same identity;
/// the name only serves for printing.
#[derive(Clone, Debug)]
pub struct FVar {
    pub id: usize,
    pub name: Arc<str>,
}

impl PartialEq for FVar {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FVar {}

impl Hash for FVar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state)
    }
}

/// Unification variable, assigned in a [`MCtx`](crate::kernel::MCtx).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MVar(pub usize);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Term {
    Type,
    Const(Symbol),
    BVar(DeBruijn),
    FVar(FVar),
    MVar(MVar),
    Comb(RTerm),
}

/// Shared pointer to a combined term.
#[derive(Clone, Debug)]
pub struct RTerm(Arc<TermC>);

/// Combined term.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TermC {
    /// application of a non-application head to a non-empty list of arguments
    Appl(Term, Vec<Term>),
    Prod(Arg<Term>, Term),
    Abst(Arg<Option<Term>>, Term),
}

impl RTerm {
    pub fn new(c: TermC) -> Self {
        Self(Arc::new(c))
    }

    /// Return true if both terms point to the same memory.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}

impl Deref for RTerm {
    type Target = TermC;
    fn deref(&self) -> &TermC {
        &self.0
    }
}

impl PartialEq for RTerm {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.0 == *other.0
    }
}

impl Eq for RTerm {}

impl From<TermC> for Term {
    fn from(c: TermC) -> Self {
        Self::Comb(RTerm::new(c))
    }
}

impl From<Symbol> for Term {
    fn from(s: Symbol) -> Self {
        Self::Const(s)
    }
}

impl From<FVar> for Term {
    fn from(x: FVar) -> Self {
        Self::FVar(x)
    }
}

impl From<MVar> for Term {
    fn from(m: MVar) -> Self {
        Self::MVar(m)
    }
}

impl Term {
    pub fn constant(name: &str) -> Self {
        Self::Const(Symbol::new(name))
    }

    /// Cheap equality test that does not descend into combined terms.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Comb(c1), Self::Comb(c2)) => c1.ptr_eq(c2),
            (Self::Comb(_), _) | (_, Self::Comb(_)) => false,
            _ => self == other,
        }
    }

    /// Apply the term to arguments, merging nested applications.
    pub fn apply(self, mut args: Vec<Term>) -> Self {
        if args.is_empty() {
            return self;
        }
        match self {
            Self::Comb(c) => match &*c {
                TermC::Appl(head, args0) => {
                    let mut all = args0.clone();
                    all.append(&mut args);
                    TermC::Appl(head.clone(), all).into()
                }
                _ => TermC::Appl(Self::Comb(c), args).into(),
            },
            head => TermC::Appl(head, args).into(),
        }
    }

    /// Split the term into head and arguments.
    pub fn get_app(&self) -> (&Term, &[Term]) {
        match self {
            Self::Comb(c) => match &**c {
                TermC::Appl(head, args) => (head, args),
                _ => (self, &[]),
            },
            _ => (self, &[]),
        }
    }

    /// Return the global symbol at the head of the term, if any.
    pub fn head_const(&self) -> Option<&Symbol> {
        match self.get_app().0 {
            Self::Const(c) => Some(c),
            _ => None,
        }
    }

    /// If the term is `name` applied to exactly `n` arguments, return these.
    pub fn app_of(&self, name: &str, n: usize) -> Option<&[Term]> {
        let (head, args) = self.get_app();
        match head {
            Self::Const(c) if c.as_str() == name && args.len() == n => Some(args),
            _ => None,
        }
    }

    pub fn get_abst(&self) -> Option<(&Arg<Option<Term>>, &Term)> {
        match self {
            Self::Comb(c) => match &**c {
                TermC::Abst(arg, tm) => Some((arg, tm)),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn get_prod(&self) -> Option<(&Arg<Term>, &Term)> {
        match self {
            Self::Comb(c) => match &**c {
                TermC::Prod(arg, tm) => Some((arg, tm)),
                _ => None,
            },
            _ => None,
        }
    }

    /// Return true if some subterm satisfies `f`.
    ///
    /// Subterms shared in memory are visited only once.
    pub fn any(&self, f: &impl Fn(&Term) -> bool) -> bool {
        let mut visited = BTreeSet::new();
        let mut todo = Vec::from([self]);
        while let Some(tm) = todo.pop() {
            if f(tm) {
                return true;
            }
            if let Self::Comb(c) = tm {
                if !visited.insert(c.addr()) {
                    continue;
                }
                match &**c {
                    TermC::Appl(head, args) => {
                        todo.push(head);
                        todo.extend(args.iter());
                    }
                    TermC::Prod(arg, body) => todo.extend([&arg.ty, body]),
                    TermC::Abst(arg, body) => {
                        todo.extend(arg.ty.iter());
                        todo.push(body)
                    }
                }
            }
        }
        false
    }

    /// Global symbols occurring in the term, in ascending order.
    pub fn consts(&self) -> BTreeSet<Symbol> {
        let consts = core::cell::RefCell::new(BTreeSet::new());
        self.any(&|tm| {
            if let Self::Const(c) = tm {
                consts.borrow_mut().insert(c.clone());
            }
            false
        });
        consts.into_inner()
    }

    pub fn has_fvar(&self, x: &FVar) -> bool {
        self.any(&|tm| matches!(tm, Self::FVar(y) if y == x))
    }

    pub fn has_mvar(&self, m: MVar) -> bool {
        self.any(&|tm| *tm == Self::MVar(m))
    }

    pub fn has_mvars(&self) -> bool {
        self.any(&|tm| matches!(tm, Self::MVar(_)))
    }

    /// Return true if the term contains a de Bruijn index not bound inside it.
    pub fn has_loose_bvars(&self) -> bool {
        self.has_loose_bvars_from(0)
    }

    fn has_loose_bvars_from(&self, k: usize) -> bool {
        match self {
            Self::BVar(n) => *n >= k,
            Self::Comb(c) => match &**c {
                TermC::Appl(head, args) => {
                    head.has_loose_bvars_from(k) || args.iter().any(|a| a.has_loose_bvars_from(k))
                }
                TermC::Prod(arg, body) => {
                    arg.ty.has_loose_bvars_from(k) || body.has_loose_bvars_from(k + 1)
                }
                TermC::Abst(arg, body) => {
                    arg.ty.iter().any(|ty| ty.has_loose_bvars_from(k))
                        || body.has_loose_bvars_from(k + 1)
                }
            },
            _ => false,
        }
    }
}

impl Display for FVar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.name.fmt(f)
    }
}

impl Display for MVar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "?m{}", self.0)
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Type => write!(f, "Type"),
            Self::Const(c) => c.fmt(f),
            Self::BVar(x) => write!(f, "β{}", x),
            Self::FVar(x) => x.fmt(f),
            Self::MVar(m) => m.fmt(f),
            Self::Comb(c) => c.fmt(f),
        }
    }
}

impl Display for RTerm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Display for TermC {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Appl(head, args) => fmt_appl(head, args, f),
            Self::Prod(arg, tm) => match arg.info {
                BinderInfo::Default => write!(f, "(Π {} : {}. {})", arg.id, arg.ty, tm),
                BinderInfo::Instance => write!(f, "(Π [{} : {}]. {})", arg.id, arg.ty, tm),
            },
            Self::Abst(arg, tm) => match &arg.ty {
                None => write!(f, "(λ {}. {})", arg.id, tm),
                Some(ty) => write!(f, "(λ {} : {}. {})", arg.id, ty, tm),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn c(s: &str) -> Term {
        Term::constant(s)
    }

    #[test]
    fn apply_flattens() {
        let fx = c("f").apply(Vec::from([c("x")]));
        let fxy = fx.apply(Vec::from([c("y")]));
        assert_eq!(fxy.get_app().1.len(), 2);
        assert_eq!(fxy.to_string(), "(f x y)");
        assert_eq!(fxy.head_const(), Some(&Symbol::new("f")));
    }

    #[test]
    fn consts_of_shared() {
        let gx = c("g").apply(Vec::from([c("x")]));
        let tm = c("f").apply(Vec::from([gx.clone(), gx]));
        let consts: Vec<_> = tm.consts().into_iter().map(|s| s.to_string()).collect();
        assert_eq!(consts, ["f", "g", "x"]);
    }

    #[test]
    fn loose() {
        let arg = Arg::new("x", c("nat"));
        let bound: Term = TermC::Abst(arg.clone().map_ty(Some), Term::BVar(0)).into();
        let loose: Term = TermC::Abst(arg.map_ty(Some), Term::BVar(1)).into();
        assert!(!bound.has_loose_bvars());
        assert!(loose.has_loose_bvars());
    }
}
