//! Substitution and shifting for terms.

use crate::term::{FVar, MVar, RTerm, Term, TermC};
use alloc::vec::Vec;

impl RTerm {
    /// Replace leaves of the term, keeping unchanged subterms shared.
    ///
    /// `f` receives each leaf and the number of binders above it.
    pub fn replace<F>(self, f: &F, k: usize) -> Self
    where
        F: Fn(&Term, usize) -> Option<Term>,
    {
        let sub = |tm: &Term| tm.clone().replace(f, k);
        match &*self {
            TermC::Appl(head, args) => {
                let head2 = sub(head);
                let args2: Vec<Term> = args.iter().map(sub).collect();
                if !head.ptr_eq(&head2) || !args.iter().zip(args2.iter()).all(|(a, a2)| a.ptr_eq(a2)) {
                    // the head may have become an application, so flatten
                    if let Term::Comb(c) = head2.apply(args2) {
                        return c;
                    }
                }
            }
            TermC::Abst(arg, body) => {
                let ty2 = arg.ty.as_ref().map(sub);
                let body2 = body.clone().replace(f, k + 1);
                let ty_same = match (&arg.ty, &ty2) {
                    (Some(ty), Some(ty2)) => ty.ptr_eq(ty2),
                    _ => true,
                };
                if !ty_same || !body.ptr_eq(&body2) {
                    let arg2 = arg.clone().map_ty(|_| ty2);
                    return Self::new(TermC::Abst(arg2, body2));
                }
            }
            TermC::Prod(arg, body) => {
                let ty2 = sub(&arg.ty);
                let body2 = body.clone().replace(f, k + 1);
                if !arg.ty.ptr_eq(&ty2) || !body.ptr_eq(&body2) {
                    let arg2 = arg.clone().map_ty(|_| ty2);
                    return Self::new(TermC::Prod(arg2, body2));
                }
            }
        };
        self
    }
}

impl Term {
    pub fn replace<F>(self, f: &F, k: usize) -> Self
    where
        F: Fn(&Term, usize) -> Option<Term>,
    {
        match self {
            Self::Comb(c) => Self::Comb(c.replace(f, k)),
            leaf => f(&leaf, k).unwrap_or(leaf),
        }
    }

    pub fn apply_subst<S>(self, subst: &S, k: usize) -> Self
    where
        S: Fn(usize, usize) -> Term,
    {
        self.replace(
            &|tm, k| match tm {
                Self::BVar(n) if *n >= k => Some(subst(*n, k)),
                _ => None,
            },
            k,
        )
    }

    /// Replace the de Bruijn index 0 by `u`, as in beta reduction.
    pub fn subst(self, u: &Term) -> Self {
        self.apply_subst(&u.psubst_single(), 0)
    }

    fn psubst_single(&self) -> impl Fn(usize, usize) -> Term + '_ {
        move |n: usize, k: usize| {
            if n == k {
                self.clone() << k
            } else {
                Term::BVar(n - 1)
            }
        }
    }

    /// Replace the de Bruijn index `i` by `args[i]`.
    ///
    /// Indices beyond `args` are lowered by the length of `args`.
    pub fn psubst(self, args: &[Term]) -> Self {
        if args.is_empty() {
            return self;
        }
        self.apply_subst(
            &|n, k| match args.get(n - k) {
                Some(arg) => arg.clone() << k,
                None => Term::BVar(n - args.len()),
            },
            0,
        )
    }

    /// Replace the free variables `xs` by de Bruijn indices,
    /// where the last variable becomes index 0.
    ///
    /// The result is to be put under as many binders as there are variables.
    pub fn abstract_fvars(self, xs: &[FVar]) -> Self {
        if xs.is_empty() {
            return self;
        }
        self.replace(
            &|tm, k| match tm {
                Self::FVar(x) => {
                    let i = xs.iter().rposition(|y| y == x)?;
                    Some(Self::BVar(k + xs.len() - 1 - i))
                }
                _ => None,
            },
            0,
        )
    }

    /// Replace assigned unification variables.
    pub fn instantiate_mvars(self, f: &impl Fn(MVar) -> Option<Term>) -> Self {
        self.replace(
            &|tm, _k| match tm {
                Self::MVar(m) => f(*m),
                _ => None,
            },
            0,
        )
    }
}

/// Definition of `<<` for terms, shifting loose de Bruijn indices.
#[allow(clippy::suspicious_arithmetic_impl)]
impl core::ops::Shl<usize> for Term {
    type Output = Self;

    fn shl(self, rhs: usize) -> Self::Output {
        if rhs == 0 {
            self
        } else {
            self.apply_subst(&|n, _k| Term::BVar(n + rhs), 0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Arg;
    use alloc::sync::Arc;

    fn fvar(id: usize, name: &str) -> FVar {
        let name = Arc::from(name);
        FVar { id, name }
    }

    fn lam(body: Term) -> Term {
        TermC::Abst(Arg::new("y", None), body).into()
    }

    #[test]
    fn subst_under_binder() {
        // (λ y. β1 β0)[β0 := a] = λ y. a β0
        let a = Term::constant("a");
        let tm = lam(Term::BVar(1).apply(Vec::from([Term::BVar(0)])));
        let expected = lam(a.clone().apply(Vec::from([Term::BVar(0)])));
        assert_eq!(tm.subst(&a), expected);
    }

    #[test]
    fn abstract_then_psubst() {
        let (x, y) = (fvar(0, "x"), fvar(1, "y"));
        let f = Term::constant("f");
        let tm = f.apply(Vec::from([x.clone().into(), y.clone().into()]));
        let abs = tm.clone().abstract_fvars(&[x.clone(), y.clone()]);
        assert_eq!(abs.get_app().1, [Term::BVar(1), Term::BVar(0)]);
        // psubst numbers arguments by index, so the last variable comes first
        assert_eq!(abs.psubst(&[y.into(), x.into()]), tm);
    }

    #[test]
    fn psubst_lowers_remaining() {
        let tm = Term::BVar(3);
        assert_eq!(tm.psubst(&[Term::Type, Term::Type]), Term::BVar(1));
    }
}
