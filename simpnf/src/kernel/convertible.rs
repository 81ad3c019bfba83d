//! Convertibility checking.

use super::{Kernel, Transparency};
use crate::term::{Term, TermC};
use crate::Error;
use alloc::vec::Vec;

/// Constraint of the shape `t1 ~ t2`.
type Constraint = (Term, Term);

/// Decompose a constraint between terms in weak head normal form.
///
/// Return false if the constraint is unsatisfiable,
/// otherwise add the constraints that remain to be checked.
fn step(cn: Constraint, cns: &mut Vec<Constraint>, eta: bool) -> bool {
    use Term::*;
    match cn {
        (Type, Type) => true,
        (Const(s1), Const(s2)) => s1 == s2,
        (BVar(v1), BVar(v2)) => v1 == v2,
        (FVar(x1), FVar(x2)) => x1 == x2,
        (MVar(m1), MVar(m2)) => m1 == m2,
        (Comb(c1), Comb(c2)) => {
            let decomposed = match (&*c1, &*c2) {
                (TermC::Abst(_, t1), TermC::Abst(_, t2)) => {
                    cns.push((t1.clone(), t2.clone()));
                    true
                }
                (TermC::Prod(a1, t1), TermC::Prod(a2, t2)) => {
                    cns.push((a1.ty.clone(), a2.ty.clone()));
                    cns.push((t1.clone(), t2.clone()));
                    true
                }
                (TermC::Appl(f1, args1), TermC::Appl(f2, args2)) if args1.len() == args2.len() => {
                    cns.push((f1.clone(), f2.clone()));
                    cns.extend(args1.iter().cloned().zip(args2.iter().cloned()));
                    true
                }
                _ => false,
            };
            decomposed || (eta && eta_step((Comb(c1), Comb(c2)), cns))
        }
        cn => eta && eta_step(cn, cns),
    }
}

/// Compare an abstraction with another term `t` by
/// comparing its body with `t` applied to the bound variable.
fn eta_step((cn1, cn2): Constraint, cns: &mut Vec<Constraint>) -> bool {
    let expand = |tm: Term| (tm << 1).apply(Vec::from([Term::BVar(0)]));
    match (cn1.get_abst(), cn2.get_abst()) {
        (Some((_, t1)), None) => cns.push((t1.clone(), expand(cn2))),
        (None, Some((_, t2))) => cns.push((expand(cn1), t2.clone())),
        _ => return false,
    }
    true
}

impl<'a> Kernel<'a> {
    /// Return true if the given terms are equal modulo reduction.
    pub fn is_def_eq(&self, tm1: &Term, tm2: &Term, tr: Transparency) -> Result<bool, Error> {
        let mut cns = Vec::from([(tm1.clone(), tm2.clone())]);
        while let Some((cn1, cn2)) = cns.pop() {
            trace!("convertible: {} ~? {}", cn1, cn2);
            if cn1 != cn2 {
                let cn1 = self.whnf(cn1, tr)?;
                let cn2 = self.whnf(cn2, tr)?;
                if !step((cn1, cn2), &mut cns, self.cfg.eta) {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }
}
