//! Rewriting terms to normal form, recording proofs.
//!
//! The simplifier rewrites a term bottom-up:
//! it first tries `pre` rules at the root, then simplifies
//! the arguments of applications and the bodies of binders, and
//! finally tries `post` rules and unfolds definitions at the root.
//! If anything was rewritten at the root, the process is repeated.
//!
//! Every rewrite step yields a proof term that
//! the step preserves equality; proofs of consecutive steps
//! are combined with `eq.trans`.
//! Steps that only perform beta reduction do not produce proofs.

mod db;
mod order;
mod preprocess;

pub use db::{RuleDatabase, SimpRule};
pub use preprocess::{preprocess, Equation, Reduction};

use crate::env::Phase;
use crate::kernel::{Hypothesis, Kernel, MCtx, Transparency};
use crate::symbol::names;
use crate::term::{MVar, Term, TermC};
use crate::{BinderInfo, Error, Symbol};
use alloc::vec::Vec;

/// Result of simplification.
#[derive(Clone, Debug)]
pub struct NormalizeResult {
    pub result: Term,
    /// proof that the original term equals the result,
    /// present only if some rewriting occurred
    pub proof: Option<Term>,
}

fn app(name: &str, args: Vec<Term>) -> Term {
    Term::constant(name).apply(args)
}

impl NormalizeResult {
    fn refl(result: Term) -> Self {
        Self { result, proof: None }
    }

    /// Combine with a step starting from the result.
    fn trans(self, next: Self) -> Self {
        let proof = match (self.proof, next.proof) {
            (None, p) | (p, None) => p,
            (Some(p1), Some(p2)) => Some(app(names::EQ_TRANS, Vec::from([p1, p2]))),
        };
        Self {
            result: next.result,
            proof,
        }
    }
}

/// Simplifier state.
pub struct Simp<'k, 'a> {
    kernel: &'k Kernel<'a>,
    db: &'k RuleDatabase,
    /// hypotheses available to instance search
    locals: Vec<Hypothesis>,
    steps: usize,
    depth: usize,
}

impl<'k, 'a> Simp<'k, 'a> {
    pub fn new(kernel: &'k Kernel<'a>, db: &'k RuleDatabase) -> Self {
        Self {
            kernel,
            db,
            locals: Vec::new(),
            steps: 0,
            depth: 0,
        }
    }

    /// Make instance-style hypotheses available to instance search.
    pub fn with_locals<'h>(mut self, hyps: impl IntoIterator<Item = &'h Hypothesis>) -> Self {
        let instances = hyps.into_iter().filter(|h| h.info == BinderInfo::Instance);
        self.locals.extend(instances.cloned());
        self
    }

    /// Rewrite a term to normal form.
    pub fn normalize(&mut self, tm: Term) -> Result<NormalizeResult, Error> {
        debug!("simp: {}", tm);
        let res = self.visit(tm)?;
        debug!("simp result: {}", res.result);
        Ok(res)
    }

    fn tick(&mut self) -> Result<(), Error> {
        self.steps += 1;
        if self.steps > self.kernel.cfg.simp_steps {
            return Err(Error::Timeout);
        }
        Ok(())
    }

    fn visit(&mut self, tm: Term) -> Result<NormalizeResult, Error> {
        let mut res = NormalizeResult::refl(tm);
        loop {
            self.tick()?;
            res.result = self.kernel.whnf(res.result, Transparency::None)?;
            while let Some(step) = self.rewrite(&res.result, Phase::Pre)? {
                self.tick()?;
                res = res.trans(step)
            }
            let step = self.congr(&res.result)?;
            res = res.trans(step);
            let post = match self.rewrite(&res.result, Phase::Post)? {
                Some(step) => Some(step),
                None => self.unfold(&res.result)?,
            };
            match post {
                Some(step) => res = res.trans(step),
                None => return Ok(res),
            }
        }
    }

    /// Simplify the arguments of an application or the body of a binder.
    fn congr(&mut self, tm: &Term) -> Result<NormalizeResult, Error> {
        let c = match tm {
            Term::Comb(c) => c,
            _ => return Ok(NormalizeResult::refl(tm.clone())),
        };
        match &**c {
            TermC::Appl(head, args) => {
                let mut changed = false;
                let mut proved = false;
                let mut new_args = Vec::with_capacity(args.len());
                let mut proofs = Vec::with_capacity(args.len());
                for arg in args {
                    let res = self.visit(arg.clone())?;
                    changed = changed || !res.result.ptr_eq(arg);
                    proved = proved || res.proof.is_some();
                    let refl = || app(names::EQ_REFL, Vec::from([arg.clone()]));
                    proofs.push(res.proof.unwrap_or_else(refl));
                    new_args.push(res.result);
                }
                if !changed {
                    return Ok(NormalizeResult::refl(tm.clone()));
                }
                let result = head.clone().apply(new_args);
                if !proved {
                    return Ok(NormalizeResult::refl(result));
                }
                let congr = match head {
                    Term::Const(c) => self.db.congr_for(c),
                    _ => None,
                };
                let proof = match congr {
                    Some(lemma) => Term::Const(lemma.clone()).apply(proofs),
                    None => app(names::EQ_CONGR, core::iter::once(head.clone()).chain(proofs).collect()),
                };
                let proof = Some(proof);
                Ok(NormalizeResult { result, proof })
            }
            TermC::Abst(arg, body) => {
                let x = self.kernel.fresh_fvar(&arg.id);
                let res = self.visit(body.clone().subst(&x.clone().into()))?;
                let xs = [x];
                let body2 = res.result.abstract_fvars(&xs);
                if body2 == *body {
                    return Ok(NormalizeResult::refl(tm.clone()));
                }
                let result = TermC::Abst(arg.clone(), body2).into();
                let proof = res.proof.map(|p| {
                    let p = TermC::Abst(arg.clone(), p.abstract_fvars(&xs)).into();
                    app(names::EQ_FUNEXT, Vec::from([p]))
                });
                Ok(NormalizeResult { result, proof })
            }
            TermC::Prod(arg, body) => {
                let x = self.kernel.fresh_fvar(&arg.id);
                let res = self.visit(body.clone().subst(&x.clone().into()))?;
                let xs = [x];
                let body2 = res.result.abstract_fvars(&xs);
                if body2 == *body {
                    return Ok(NormalizeResult::refl(tm.clone()));
                }
                let result = TermC::Prod(arg.clone(), body2).into();
                let proof = res.proof.map(|p| {
                    let arg = arg.clone().map_ty(Some);
                    let p = TermC::Abst(arg, p.abstract_fvars(&xs)).into();
                    app(names::EQ_PI_CONGR, Vec::from([p]))
                });
                Ok(NormalizeResult { result, proof })
            }
        }
    }

    /// Rewrite the root of a term with the first applicable rule of a phase.
    fn rewrite(&mut self, tm: &Term, phase: Phase) -> Result<Option<NormalizeResult>, Error> {
        let head = match tm.head_const() {
            Some(head) => head.clone(),
            None => return Ok(None),
        };
        let db = self.db;
        for rule in db.candidates(phase, &head) {
            let res = match self.try_rule(rule, tm)? {
                Some(res) => res,
                None => continue,
            };
            if rule.perm && order::compare(&res.result, tm).is_ge() {
                trace!("{} does not decrease {}", rule.origin, tm);
                continue;
            }
            trace!("{}: {} ⟶ {}", rule.origin, tm, res.result);
            return Ok(Some(res));
        }
        Ok(None)
    }

    fn try_rule(&mut self, rule: &SimpRule, tm: &Term) -> Result<Option<NormalizeResult>, Error> {
        let (head, args) = tm.get_app();
        let arity = rule.lhs.get_app().1.len();
        if args.len() < arity {
            return Ok(None);
        }
        let (args, extra) = args.split_at(arity);
        let target = head.clone().apply(args.to_vec());

        let mut mctx = MCtx::new();
        let mvars: Vec<MVar> = rule.hyps.iter().map(|_| mctx.fresh()).collect();
        // the last hypothesis has the de Bruijn index 0
        let bound = |n: usize| -> Vec<Term> { mvars[..n].iter().rev().map(|m| Term::MVar(*m)).collect() };
        let lhs = rule.lhs.clone().psubst(&bound(mvars.len()));
        if !self.kernel.unify(&mut mctx, &lhs, &target, Transparency::Reducible)? {
            return Ok(None);
        }

        for (i, (hyp, m)) in rule.hyps.iter().zip(&mvars).enumerate() {
            if mctx.is_assigned(*m) {
                continue;
            }
            let ty = mctx.instantiate(hyp.ty.clone().psubst(&bound(i)));
            // only side conditions are discharged by simplification
            if !rule.conditional && hyp.info == BinderInfo::Default {
                trace!("{}: {} is not determined by matching", rule.origin, ty);
                return Ok(None);
            }
            match self.discharge(&ty, hyp.info)? {
                Some(proof) => mctx.assign(*m, proof),
                None => {
                    trace!("{}: cannot discharge {}", rule.origin, ty);
                    return Ok(None);
                }
            }
        }

        let vals: Vec<Term> = mvars.iter().map(|m| mctx.instantiate(Term::MVar(*m))).collect();
        if vals.iter().any(|v| v.has_mvars()) {
            return Ok(None);
        }
        let rev: Vec<Term> = vals.iter().rev().cloned().collect();
        let result = rule.rhs.clone().psubst(&rev).apply(extra.to_vec());
        let proof = rule.proof.clone().apply(vals);
        Ok(Some(NormalizeResult {
            result,
            proof: Some(congr_fun(proof, extra)),
        }))
    }

    /// Find a proof of a hypothesis that is not determined by matching.
    fn discharge(&mut self, ty: &Term, info: BinderInfo) -> Result<Option<Term>, Error> {
        if ty.has_mvars() {
            return Ok(None);
        }
        match info {
            BinderInfo::Instance => {
                for local in &self.locals {
                    if self.kernel.is_def_eq(&local.ty, ty, Transparency::Default)? {
                        return Ok(Some(Term::FVar(local.fvar.clone())));
                    }
                }
                for decl in self.kernel.env.instances() {
                    match decl.ty() {
                        Some(dty) if self.kernel.is_def_eq(dty, ty, Transparency::Default)? => {
                            return Ok(Some(Term::Const(decl.name.clone())))
                        }
                        _ => (),
                    }
                }
                Ok(None)
            }
            BinderInfo::Default => {
                if self.depth >= self.kernel.cfg.discharge_depth {
                    return Ok(None);
                }
                let mut nested = Simp {
                    kernel: self.kernel,
                    db: self.db,
                    locals: self.locals.clone(),
                    steps: self.steps,
                    depth: self.depth + 1,
                };
                let res = nested.visit(ty.clone());
                self.steps = nested.steps;
                let res = res?;
                if res.result != Term::constant(names::TRUE) {
                    return Ok(None);
                }
                Ok(Some(match res.proof {
                    Some(p) => app(names::OF_EQ_TRUE, Vec::from([p])),
                    None => Term::constant(names::TRUE_INTRO),
                }))
            }
        }
    }

    /// Unfold a definition at the root.
    fn unfold(&mut self, tm: &Term) -> Result<Option<NormalizeResult>, Error> {
        let (head, args) = tm.get_app();
        let c = match head {
            Term::Const(c) if self.db.is_unfold(c) => c,
            _ => return Ok(None),
        };
        let env = self.kernel.env;
        if let Some(value) = env.value_of(c) {
            trace!("unfold {}", c);
            let result = value.clone().apply(args.to_vec());
            let proof = app(names::EQ_DELTA, Vec::from([Term::Const(c.clone())]));
            let proof = Some(congr_fun(proof, args));
            return Ok(Some(NormalizeResult { result, proof }));
        }
        for (i, rule) in env.rules_of(c).iter().enumerate() {
            let arity = rule.lhs.args.len();
            if args.len() < arity {
                continue;
            }
            let (args, extra) = args.split_at(arity);
            if let Some(subst) = self.kernel.match_rule(rule, args, Transparency::Reducible)? {
                trace!("unfold {} with {}", c, rule);
                let result = rule.rhs.clone().psubst(&subst).apply(extra.to_vec());
                let eqn: Symbol = c.eqn(i + 1);
                let proof = Term::Const(eqn).apply(subst.into_iter().rev().collect());
                let proof = Some(congr_fun(proof, extra));
                return Ok(Some(NormalizeResult { result, proof }));
            }
        }
        Ok(None)
    }
}

/// Extend a proof of `f = g` to a proof of `f args = g args`.
fn congr_fun(proof: Term, args: &[Term]) -> Term {
    if args.is_empty() {
        return proof;
    }
    app(names::EQ_CONGR_FUN, core::iter::once(proof).chain(args.iter().cloned()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::tests::term;
    use crate::{Config, Env};
    use alloc::string::{String, ToString};

    const NAT: &str = r"
        nat : Type. zero : nat. one : nat. succ : nat -> nat.
        add : nat -> nat -> nat. mul : nat -> nat -> nat.
        list : Type. nil : list. cons : nat -> list -> list.
    ";

    fn simp(cmds: &str, tm: &str) -> Result<(String, Option<String>), Error> {
        simp_with(&Config::default(), cmds, tm)
    }

    fn simp_with(cfg: &Config, cmds: &str, tm: &str) -> Result<(String, Option<String>), Error> {
        let mut env = Env::new();
        env.load(&[NAT, cmds].concat())?;
        let db = RuleDatabase::from_env(&env, cfg)?;
        let kernel = Kernel::new(&env, cfg);
        let res = kernel.normalize(term(&env, tm), &db)?;
        Ok((res.result.to_string(), res.proof.map(|p| p.to_string())))
    }

    #[test]
    fn congruence() -> Result<(), Error> {
        let cmds = "@[simp] add_zero (a : nat) : eq nat (add a zero) a.";
        let (res, proof) = simp(cmds, "succ (add one zero)")?;
        assert_eq!(res, "(succ one)");
        assert_eq!(proof.unwrap(), "(eq.congr succ (add_zero one))");

        let (res, proof) = simp(cmds, "mul one (add one zero)")?;
        assert_eq!(res, "(mul one one)");
        assert_eq!(proof.unwrap(), "(eq.congr mul (eq.refl one) (add_zero one))");

        let (res, proof) = simp(cmds, "add (add one zero) zero")?;
        assert_eq!(res, "one");
        assert_eq!(proof.unwrap(), "(eq.trans (eq.congr add (add_zero one) (eq.refl zero)) (add_zero one))");

        let (res, proof) = simp(cmds, "mul one one")?;
        assert_eq!(res, "(mul one one)");
        assert!(proof.is_none());
        Ok(())
    }

    #[test]
    fn congruence_lemma() -> Result<(), Error> {
        let cmds = r"
            @[simp] add_zero (a : nat) : eq nat (add a zero) a.
            @[congr] succ_congr (a : nat) (b : nat) (e : eq nat a b) : eq nat (succ a) (succ b).
        ";
        let (res, proof) = simp(cmds, "succ (add one zero)")?;
        assert_eq!(res, "(succ one)");
        assert_eq!(proof.unwrap(), "(succ_congr (add_zero one))");
        Ok(())
    }

    #[test]
    fn binders() -> Result<(), Error> {
        let cmds = "@[simp] add_zero (a : nat) : eq nat (add a zero) a.";
        let (res, proof) = simp(cmds, "x : nat => add x zero")?;
        assert_eq!(res, "(λ x : nat. β0)");
        assert_eq!(proof.unwrap(), "(eq.funext (λ x : nat. (add_zero β0)))");
        Ok(())
    }

    #[test]
    fn extra_args() -> Result<(), Error> {
        let cmds = r"
            compose : (nat -> nat) -> (nat -> nat) -> nat -> nat.
            @[simp] compose_succ (f : nat -> nat) : eq (nat -> nat) (compose f succ) f.
        ";
        let (res, proof) = simp(cmds, "compose succ succ zero")?;
        assert_eq!(res, "(succ zero)");
        assert_eq!(proof.unwrap(), "(eq.congr_fun (compose_succ succ) zero)");
        Ok(())
    }

    #[test]
    fn unfold() -> Result<(), Error> {
        let cmds = r"
            @[simp] def double := x : nat => add x x.
            @[simp] def len : list -> nat.
            [] len nil --> zero.
            [x, l] len (cons x l) --> succ (len l).
        ";
        let (res, proof) = simp(cmds, "double one")?;
        assert_eq!(res, "(add one one)");
        assert_eq!(proof.unwrap(), "(eq.congr_fun (eq.delta double) one)");

        let (res, proof) = simp(cmds, "len (cons one nil)")?;
        assert_eq!(res, "(succ zero)");
        let proof = proof.unwrap();
        assert!(proof.contains("(len.equations._eqn_2 one nil)"));
        assert!(proof.contains("len.equations._eqn_1"));
        Ok(())
    }

    #[test]
    fn pre_and_post() -> Result<(), Error> {
        // a pre rule fires before the arguments are simplified
        let cmds = r"
            @[simp, pre] mul_zero (a : nat) : eq nat (mul a zero) zero.
            @[simp] add_zero (a : nat) : eq nat (add a zero) a.
        ";
        let (res, proof) = simp(cmds, "mul (add one zero) zero")?;
        assert_eq!(res, "zero");
        assert_eq!(proof.unwrap(), "(mul_zero (add one zero))");
        Ok(())
    }

    #[test]
    fn permutation() -> Result<(), Error> {
        let cmds = r"
            @[simp] add_comm (a : nat) (b : nat) : eq nat (add a b) (add b a).
        ";
        let (res, proof) = simp(cmds, "add one zero")?;
        assert_eq!(res, "(add one zero)");
        assert!(proof.is_none());

        let (res, proof) = simp(cmds, "add zero one")?;
        assert_eq!(res, "(add one zero)");
        assert_eq!(proof.unwrap(), "(add_comm zero one)");
        Ok(())
    }

    #[test]
    fn side_conditions() -> Result<(), Error> {
        let cmds = r"
            le : nat -> nat -> Prop.
            sub : nat -> nat -> nat.
            @[simp] le_zero (a : nat) : le zero a.
            @[simp] sub_add (a : nat) (b : nat) (h : le b a) : eq nat (add (sub a b) b) a.
        ";
        let (res, proof) = simp(cmds, "add (sub one zero) zero")?;
        assert_eq!(res, "one");
        let expected = "(sub_add one zero (of_eq_true (_aux_lemma.1 one)))";
        assert_eq!(proof.unwrap(), expected);

        let (res, proof) = simp(cmds, "add (sub zero one) one")?;
        assert_eq!(res, "(add (sub zero one) one)");
        assert!(proof.is_none());

        let cfg = Config {
            discharge_depth: 0,
            ..Config::default()
        };
        let (res, _) = simp_with(&cfg, cmds, "add (sub one zero) zero")?;
        assert_eq!(res, "(add (sub one zero) zero)");
        Ok(())
    }

    #[test]
    fn unmatched_data() -> Result<(), Error> {
        // `h` occurs on the right, so it is no side condition and is not discharged
        let cmds = r"
            le : nat -> nat -> Prop.
            pf : a : nat -> le zero a -> nat.
            @[simp] le_zero (a : nat) : le zero a.
            @[simp] mul_one (a : nat) (h : le zero a) : eq nat (mul a one) (pf a h).
        ";
        let (res, proof) = simp(cmds, "mul one one")?;
        assert_eq!(res, "(mul one one)");
        assert!(proof.is_none());
        Ok(())
    }

    #[test]
    fn nonterminating_beta() {
        let cfg = Config {
            kernel_steps: 1000,
            ..Config::default()
        };
        let res = simp_with(&cfg, "", "succ ((x => x x) (x => x x))");
        assert!(matches!(res, Err(Error::Timeout)));
    }

    #[test]
    fn instances() -> Result<(), Error> {
        let cmds = r"
            Monoid : Type -> Type.
            op : A : Type -> A -> A -> A.
            unit : A : Type -> A.
            @[instance] nat_monoid : Monoid nat.
            @[simp] op_unit (A : Type) [m : Monoid A] (a : A) : eq A (op A a (unit A)) a.
        ";
        let (res, proof) = simp(cmds, "op nat one (unit nat)")?;
        assert_eq!(res, "one");
        assert_eq!(proof.unwrap(), "(op_unit nat nat_monoid one)");

        let (res, _) = simp(cmds, "op list nil (unit list)")?;
        assert_eq!(res, "(op list nil (unit list))");
        Ok(())
    }

    #[test]
    fn timeout() {
        let cmds = r"
            @[simp] loop (a : nat) : eq nat (succ a) (succ (succ a)).
        ";
        let cfg = Config {
            simp_steps: 50,
            ..Config::default()
        };
        let res = simp_with(&cfg, cmds, "succ zero");
        assert!(matches!(res, Err(Error::Timeout)));
    }
}
