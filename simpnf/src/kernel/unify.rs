//! First-order unification modulo reduction.

use super::{Kernel, Transparency};
use crate::term::{MVar, Term, TermC};
use crate::Error;
use alloc::vec::Vec;

/// Assignment of unification variables.
#[derive(Clone, Debug, Default)]
pub struct MCtx {
    assign: Vec<Option<Term>>,
    /// variables below this index are treated as constants
    frozen: usize,
}

impl MCtx {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new unassigned variable.
    pub fn fresh(&mut self) -> MVar {
        self.assign.push(None);
        MVar(self.assign.len() - 1)
    }

    pub fn get(&self, m: MVar) -> Option<&Term> {
        self.assign.get(m.0)?.as_ref()
    }

    pub fn is_assigned(&self, m: MVar) -> bool {
        self.get(m).is_some()
    }

    fn is_assignable(&self, m: MVar) -> bool {
        m.0 >= self.frozen && matches!(self.assign.get(m.0), Some(None))
    }

    /// Assign a term to an unassigned variable.
    pub fn assign(&mut self, m: MVar, tm: Term) {
        if let Some(slot) = self.assign.get_mut(m.0) {
            trace!("assign {} := {}", m, tm);
            *slot = Some(tm)
        }
    }

    /// Prevent all existing variables from being assigned.
    pub fn freeze(&mut self) {
        self.frozen = self.assign.len()
    }

    /// Replace assigned variables in a term, recursively.
    pub fn instantiate(&self, tm: Term) -> Term {
        if !tm.has_mvars() {
            return tm;
        }
        tm.instantiate_mvars(&|m| self.get(m).map(|tm| self.instantiate(tm.clone())))
    }

    /// Assign a term to a variable if this does not create a cycle.
    fn assign_checked(&mut self, m: MVar, tm: &Term) -> bool {
        if tm.has_mvar(m) || tm.has_loose_bvars() {
            return false;
        }
        self.assign(m, tm.clone());
        true
    }
}

impl<'a> Kernel<'a> {
    /// Unify two terms, assigning unification variables in `mctx`.
    ///
    /// If unification fails, `mctx` may contain partial assignments.
    pub fn unify(&self, mctx: &mut MCtx, tm1: &Term, tm2: &Term, tr: Transparency) -> Result<bool, Error> {
        self.tick()?;
        let tm1 = mctx.instantiate(tm1.clone());
        let tm2 = mctx.instantiate(tm2.clone());
        trace!("unify: {} =?= {}", tm1, tm2);
        if tm1 == tm2 {
            return Ok(true);
        }
        match (&tm1, &tm2) {
            (Term::MVar(m), tm) | (tm, Term::MVar(m)) if mctx.is_assignable(*m) => {
                return Ok(mctx.assign_checked(*m, tm))
            }
            _ => (),
        }

        let saved = mctx.clone();
        if self.unify_args(mctx, &tm1, &tm2, tr)? {
            return Ok(true);
        }
        *mctx = saved;

        let whnf1 = self.whnf(tm1.clone(), tr)?;
        let whnf2 = self.whnf(tm2.clone(), tr)?;
        if whnf1 == tm1 && whnf2 == tm2 {
            return Ok(false);
        }
        self.unify(mctx, &whnf1, &whnf2, tr)
    }

    /// Unify terms with the same structure component-wise.
    fn unify_args(&self, mctx: &mut MCtx, tm1: &Term, tm2: &Term, tr: Transparency) -> Result<bool, Error> {
        let (c1, c2) = match (tm1, tm2) {
            (Term::Comb(c1), Term::Comb(c2)) => (c1, c2),
            _ => return Ok(false),
        };
        let pairs: Vec<(&Term, &Term)> = match (&**c1, &**c2) {
            (TermC::Appl(f1, args1), TermC::Appl(f2, args2)) if args1.len() == args2.len() => {
                core::iter::once((f1, f2)).chain(args1.iter().zip(args2)).collect()
            }
            (TermC::Prod(a1, t1), TermC::Prod(a2, t2)) => Vec::from([(&a1.ty, &a2.ty), (t1, t2)]),
            (TermC::Abst(_, t1), TermC::Abst(_, t2)) => Vec::from([(t1, t2)]),
            _ => return Ok(false),
        };
        for (t1, t2) in pairs {
            if !self.unify(mctx, t1, t2, tr)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Unify two terms without assigning any variable that exists in `mctx`.
    ///
    /// The context itself is left unchanged.
    pub fn unify_isolated(&self, mctx: &MCtx, tm1: &Term, tm2: &Term, tr: Transparency) -> Result<bool, Error> {
        let mut mctx = mctx.clone();
        mctx.freeze();
        self.unify(&mut mctx, tm1, tm2, tr)
    }
}
