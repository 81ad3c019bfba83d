//! Reduction, conversion, and unification.
//!
//! A [`Kernel`] is created per check.
//! It carries the fresh-name counter and the step budget of that check,
//! so that checks neither interfere with each other nor depend on
//! the order in which they are run.

mod convertible;
mod matching;
mod unify;
mod whnf;

pub use unify::MCtx;

use crate::env::{Decl, Env};
use crate::simp::{NormalizeResult, RuleDatabase, Simp};
use crate::{BinderInfo, Config, Error, FVar, MVar, Term};
use alloc::{sync::Arc, vec::Vec};
use core::cell::Cell;

/// Which definitions may be unfolded by reduction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Transparency {
    /// beta reduction only
    None,
    /// unfold definitions tagged `reducible`
    Reducible,
    /// unfold all definitions, by their bodies or their rewrite rules
    Default,
}

impl Transparency {
    pub fn unfolds(self, decl: &Decl) -> bool {
        decl.is_definition()
            && match self {
                Self::None => false,
                Self::Reducible => decl.attrs.reducible,
                Self::Default => true,
            }
    }
}

/// Hypothesis obtained by opening a binder.
#[derive(Clone, Debug)]
pub struct Hypothesis {
    pub fvar: FVar,
    pub ty: Term,
    pub info: BinderInfo,
}

/// Return true if some hypothesis is neither instance-style nor
/// occurs in any later hypothesis or in the equation.
pub fn is_conditional(hyps: &[Hypothesis], lhs: &Term, rhs: &Term) -> bool {
    hyps.iter().enumerate().any(|(i, h)| {
        let x = &h.fvar;
        h.info != BinderInfo::Instance
            && !hyps[i + 1..].iter().any(|later| later.ty.has_fvar(x))
            && !lhs.has_fvar(x)
            && !rhs.has_fvar(x)
    })
}

pub struct Kernel<'a> {
    pub env: &'a Env,
    pub cfg: &'a Config,
    fresh: Cell<usize>,
    fuel: Cell<usize>,
}

impl<'a> Kernel<'a> {
    pub fn new(env: &'a Env, cfg: &'a Config) -> Self {
        Self {
            env,
            cfg,
            fresh: Cell::new(0),
            fuel: Cell::new(cfg.kernel_steps),
        }
    }

    /// Consume one step of the budget.
    pub(crate) fn tick(&self) -> Result<(), Error> {
        match self.fuel.get().checked_sub(1) {
            Some(fuel) => {
                self.fuel.set(fuel);
                Ok(())
            }
            None => Err(Error::Timeout),
        }
    }

    pub fn fresh_fvar(&self, name: &Arc<str>) -> FVar {
        let id = self.fresh.get();
        self.fresh.set(id + 1);
        let name = name.clone();
        FVar { id, name }
    }

    /// Replace the outer products of a type by fresh free variables.
    pub fn open_pis(&self, ty: &Term) -> (Vec<Hypothesis>, Term) {
        let mut hyps = Vec::new();
        let mut ty = ty.clone();
        loop {
            let (hyp, body) = match ty.get_prod() {
                Some((arg, body)) => {
                    let fvar = self.fresh_fvar(&arg.id);
                    let body = body.clone().subst(&Term::FVar(fvar.clone()));
                    let hyp = Hypothesis {
                        fvar,
                        ty: arg.ty.clone(),
                        info: arg.info,
                    };
                    (hyp, body)
                }
                None => return (hyps, ty),
            };
            hyps.push(hyp);
            ty = body;
        }
    }

    /// Replace the outer products of a type by fresh unification variables.
    pub fn open_pis_mvars(&self, ty: &Term, mctx: &mut MCtx) -> (Vec<MVar>, Term) {
        let mut mvars = Vec::new();
        let mut ty = ty.clone();
        loop {
            let body = match ty.get_prod() {
                Some((_, body)) => {
                    let m = mctx.fresh();
                    mvars.push(m);
                    body.clone().subst(&Term::MVar(m))
                }
                None => return (mvars, ty),
            };
            ty = body;
        }
    }

    /// Rewrite a term to normal form with the rules of the database.
    pub fn normalize(&self, tm: Term, db: &RuleDatabase) -> Result<NormalizeResult, Error> {
        Simp::new(self, db).normalize(tm)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{scope::Scope, Env};
    use alloc::string::ToString;

    /// Parse and scope a closed term.
    pub fn term(env: &Env, s: &str) -> Term {
        let tm = simpnf_parse::Term::parse_str(s).unwrap();
        tm.scope(env).unwrap()
    }

    pub fn nat() -> Env {
        let mut env = Env::new();
        let cmds = r"
            nat : Type. zero : nat. one : nat. succ : nat -> nat.
            add : nat -> nat -> nat.
            def pred : nat -> nat.
            [] pred zero --> zero.
            [n] pred (succ n) --> n.
            [m, n] pred (add m (succ n)) --> add m n.
            def double := x : nat => add x x.
            @[reducible] def twice := f : (nat -> nat) => x : nat => f (f x).
        ";
        env.load(cmds).unwrap();
        env
    }

    #[test]
    fn open_pis() {
        let env = nat();
        let cfg = Config::default();
        let kernel = Kernel::new(&env, &cfg);
        let ty = term(&env, "x : nat -> y : nat -> eq nat (add x y) (add y x)");
        let (hyps, stmt) = kernel.open_pis(&ty);
        assert_eq!(hyps.len(), 2);
        assert!(hyps[0].fvar.id < hyps[1].fvar.id);
        assert_eq!(stmt.to_string(), "(eq nat (add x y) (add y x))");
        assert!(!stmt.has_loose_bvars());

        let mut mctx = MCtx::new();
        let (mvars, stmt) = kernel.open_pis_mvars(&ty, &mut mctx);
        assert_eq!(mvars, [MVar(0), MVar(1)]);
        assert_eq!(stmt.to_string(), "(eq nat (add ?m0 ?m1) (add ?m1 ?m0))");
    }

    #[test]
    fn timeout() {
        let mut env = Env::new();
        env.load("nat : Type. def loop : nat -> nat. [x] loop x --> loop x.")
            .unwrap();
        let cfg = Config {
            kernel_steps: 100,
            ..Config::default()
        };
        let kernel = Kernel::new(&env, &cfg);
        let tm = term(&env, "x : nat => loop x");
        let (_, body) = tm.get_abst().unwrap();
        let x = kernel.fresh_fvar(&Arc::from("x"));
        let tm = body.clone().subst(&x.into());
        let res = kernel.whnf(tm, Transparency::Default);
        assert!(matches!(res, Err(Error::Timeout)));
    }
}
