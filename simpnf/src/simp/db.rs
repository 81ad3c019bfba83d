//! Databases of simplification rules.

use crate::env::{Decl, Env, Phase};
use crate::kernel::{is_conditional, Hypothesis, Kernel};
use crate::symbol::names;
use crate::term::{FVar, Term, TermC};
use crate::{Arg, Config, Error, Symbol};
use alloc::collections::BTreeSet;
use alloc::{format, vec::Vec};

type FnvHashMap<K, V> = im::hashmap::HashMap<K, V, fnv::FnvBuildHasher>;

/// Equation used by the simplifier.
#[derive(Clone, Debug)]
pub struct SimpRule {
    /// declaration from which the rule was obtained
    pub origin: Symbol,
    /// proof of the equation when applied to the hypotheses
    pub proof: Term,
    /// telescope of hypotheses
    pub hyps: Vec<Arg<Term>>,
    /// left-hand side, referring to the hypotheses by de Bruijn indices
    pub lhs: Term,
    pub rhs: Term,
    pub phase: Phase,
    /// rhs is lhs with some variables permuted
    pub perm: bool,
    /// some hypothesis is a side condition
    pub conditional: bool,
}

impl SimpRule {
    /// Return the global symbol at the head of the left-hand side, if any.
    pub fn head(&self) -> Option<&Symbol> {
        self.lhs.head_const()
    }
}

/// Simplification rules indexed by the head symbols of their left-hand sides.
///
/// ~~~
/// # use simpnf::{Config, Env, RuleDatabase, Symbol};
/// # use simpnf::env::Phase;
/// let mut env = Env::new();
/// env.load(r"
///     nat : Type. zero : nat. add : nat -> nat -> nat.
///     @[simp] add_zero (a : nat) : eq nat (add a zero) a.
///     @[simp] def double := x : nat => add x x.
/// ")?;
/// let db = RuleDatabase::from_env(&env, &Config::default())?;
/// let add = Symbol::new("add");
/// assert_eq!(db.candidates(Phase::Post, &add).count(), 1);
/// assert!(db.is_unfold(&Symbol::new("double")));
/// # Ok::<_, simpnf::Error>(())
/// ~~~
#[derive(Clone, Debug, Default)]
pub struct RuleDatabase {
    rules: Vec<SimpRule>,
    pre: FnvHashMap<Symbol, Vec<usize>>,
    post: FnvHashMap<Symbol, Vec<usize>>,
    unfold: BTreeSet<Symbol>,
    /// congruence lemmas by head symbol
    congr: FnvHashMap<Symbol, Symbol>,
    /// number of auxiliary lemmas
    aux: usize,
}

impl RuleDatabase {
    /// Collect the simplification rules, definitions to unfold,
    /// and congruence lemmas of an environment.
    ///
    /// Declarations that cannot be used as rules are skipped with a warning.
    pub fn from_env(env: &Env, cfg: &Config) -> Result<Self, Error> {
        let kernel = Kernel::new(env, cfg);
        let mut db = Self::default();
        for decl in env.decls() {
            if let Some(phase) = decl.attrs.simp {
                if decl.is_definition() {
                    debug!("unfold {}", decl.name);
                    db.unfold.insert(decl.name.clone());
                } else {
                    match db.add_decl(&kernel, decl, phase) {
                        Err(Error::NotAnEquation(name)) => warn!("{} is not an equation, ignoring it", name),
                        res => res?,
                    }
                }
            }
            if decl.attrs.congr {
                db.add_congr(&kernel, decl)
            }
        }
        Ok(db)
    }

    fn add_decl(&mut self, kernel: &Kernel, decl: &Decl, phase: Phase) -> Result<(), Error> {
        let name = &decl.name;
        let ty = decl.ty().ok_or_else(|| Error::NotAnEquation(name.clone()))?;
        let (hyps, stmt) = kernel.open_pis(ty);
        let fvars: Vec<FVar> = hyps.iter().map(|h| h.fvar.clone()).collect();
        let subject = Term::Const(name.clone()).apply(fvars.iter().cloned().map(Term::FVar).collect());
        let eqs = super::preprocess(kernel, name, &stmt, subject)?;
        let literal = stmt.app_of(names::EQ, 3).is_some();

        let tele: Vec<Arg<Term>> = hyps
            .iter()
            .enumerate()
            .map(|(i, h)| Arg {
                id: h.fvar.name.clone(),
                ty: h.ty.clone().abstract_fvars(&fvars[..i]),
                info: h.info,
            })
            .collect();

        for eq in eqs {
            let proof = if literal {
                Term::Const(name.clone())
            } else {
                self.aux += 1;
                let aux = Symbol::new(&format!("{}.{}", names::AUX_LEMMA, self.aux));
                debug!("{} stands for {}", aux, eq.proof);
                Term::Const(aux)
            };
            let conditional = is_conditional(&hyps, &eq.lhs, &eq.rhs);
            let perm = is_perm(&hyps, &eq.lhs, &eq.rhs);
            let rule = SimpRule {
                origin: name.clone(),
                proof,
                hyps: tele.clone(),
                lhs: eq.lhs.abstract_fvars(&fvars),
                rhs: eq.rhs.abstract_fvars(&fvars),
                phase,
                perm,
                conditional,
            };
            self.insert(rule)
        }
        Ok(())
    }

    fn insert(&mut self, rule: SimpRule) {
        let idx = self.rules.len();
        match rule.head().cloned() {
            Some(head) => {
                debug!("rule {}: {} ⟶ {}", rule.origin, rule.lhs, rule.rhs);
                let index = match rule.phase {
                    Phase::Pre => &mut self.pre,
                    Phase::Post => &mut self.post,
                };
                let mut idxs = index.get(&head).cloned().unwrap_or_default();
                idxs.push(idx);
                index.insert(head, idxs);
            }
            None => {
                warn!("left-hand side of {} has no head symbol, it will never be used", rule.origin);
                return;
            }
        }
        self.rules.push(rule)
    }

    fn add_congr(&mut self, kernel: &Kernel, decl: &Decl) {
        let head = decl.ty().and_then(|ty| {
            let (_, stmt) = kernel.open_pis(ty);
            let args = stmt.app_of(names::EQ, 3)?;
            args[1].head_const().cloned()
        });
        match head {
            Some(head) => {
                debug!("congruence lemma {} for {}", decl.name, head);
                self.congr.insert(head, decl.name.clone());
            }
            None => warn!("{} is not a congruence lemma, ignoring it", decl.name),
        }
    }

    /// Indexed rules, first those of the pre phase, then those of the post phase,
    /// in declaration order.
    pub fn rules(&self) -> impl Iterator<Item = &SimpRule> {
        let phase = move |phase: Phase| self.rules.iter().filter(move |r| r.phase == phase);
        phase(Phase::Pre).chain(phase(Phase::Post))
    }

    /// Rules of a phase whose left-hand side has the given head, in declaration order.
    pub fn candidates<'a>(&'a self, phase: Phase, head: &Symbol) -> impl Iterator<Item = &'a SimpRule> {
        let index = match phase {
            Phase::Pre => &self.pre,
            Phase::Post => &self.post,
        };
        let idxs = index.get(head).map_or(&[][..], |idxs| &idxs[..]);
        idxs.iter().filter_map(move |i| self.rules.get(*i))
    }

    /// Return true if the definition is unfolded by the simplifier.
    pub fn is_unfold(&self, name: &Symbol) -> bool {
        self.unfold.contains(name)
    }

    /// Return true if the name is a registered congruence lemma.
    pub fn is_congr(&self, name: &Symbol) -> bool {
        self.congr.values().any(|c| c == name)
    }

    /// Congruence lemma for a head symbol.
    pub fn congr_for(&self, head: &Symbol) -> Option<&Symbol> {
        self.congr.get(head)
    }
}

/// Return true if `rhs` equals `lhs` up to a permutation of the hypotheses.
fn is_perm(hyps: &[Hypothesis], lhs: &Term, rhs: &Term) -> bool {
    let mut renaming = Vec::new();
    lhs != rhs && perm_eq(hyps, lhs, rhs, &mut renaming)
}

fn perm_eq<'t>(hyps: &[Hypothesis], tm1: &'t Term, tm2: &'t Term, renaming: &mut Vec<(&'t FVar, &'t FVar)>) -> bool {
    let is_hyp = |x: &FVar| hyps.iter().any(|h| h.fvar == *x);
    match (tm1, tm2) {
        (Term::FVar(x), Term::FVar(y)) if is_hyp(x) && is_hyp(y) => {
            match renaming.iter().find(|(x1, y1)| *x1 == x || *y1 == y) {
                Some((x1, y1)) => *x1 == x && *y1 == y,
                None => {
                    renaming.push((x, y));
                    true
                }
            }
        }
        (Term::Comb(c1), Term::Comb(c2)) => match (&**c1, &**c2) {
            (TermC::Appl(f1, args1), TermC::Appl(f2, args2)) => {
                args1.len() == args2.len()
                    && perm_eq(hyps, f1, f2, renaming)
                    && args1.iter().zip(args2).all(|(a1, a2)| perm_eq(hyps, a1, a2, renaming))
            }
            (TermC::Prod(a1, t1), TermC::Prod(a2, t2)) => {
                perm_eq(hyps, &a1.ty, &a2.ty, renaming) && perm_eq(hyps, t1, t2, renaming)
            }
            (TermC::Abst(_, t1), TermC::Abst(_, t2)) => perm_eq(hyps, t1, t2, renaming),
            _ => false,
        },
        _ => tm1 == tm2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn db(cmds: &str) -> (Env, RuleDatabase) {
        let mut env = Env::new();
        env.load(cmds).unwrap();
        let db = RuleDatabase::from_env(&env, &Config::default()).unwrap();
        (env, db)
    }

    const NAT: &str = r"
        nat : Type. zero : nat. one : nat.
        add : nat -> nat -> nat. mul : nat -> nat -> nat.
        le : nat -> nat -> Prop.
    ";

    #[test]
    fn literal() {
        let cmds = "@[simp] add_zero (a : nat) : eq nat (add a zero) a.";
        let (_, db) = db(&[NAT, cmds].concat());
        let rules: Vec<_> = db.rules().collect();
        assert_eq!(rules.len(), 1);
        let rule = rules[0];
        assert_eq!(rule.proof, Term::constant("add_zero"));
        assert_eq!(rule.lhs.to_string(), "(add β0 zero)");
        assert_eq!(rule.rhs.to_string(), "β0");
        assert!(!rule.perm && !rule.conditional);
        assert_eq!(rule.phase, Phase::Post);
    }

    #[test]
    fn aux_lemmas() {
        let cmds = r"
            @[simp] le_refl (a : nat) : le a a.
            @[simp, pre] both (a : nat) : and (eq nat (mul a one) a) (iff (le a zero) (eq nat a zero)).
        ";
        let (_, db) = db(&[NAT, cmds].concat());
        let names: Vec<_> = db.rules().map(|r| (r.origin.to_string(), r.proof.to_string())).collect();
        let expected = [("both", "_aux_lemma.2"), ("both", "_aux_lemma.3"), ("le_refl", "_aux_lemma.1")];
        let expected: Vec<_> = expected.iter().map(|(o, p)| (o.to_string(), p.to_string())).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn perm() {
        let cmds = r"
            @[simp] add_comm (a : nat) (b : nat) : eq nat (add a b) (add b a).
            @[simp] add_idem (a : nat) (b : nat) : eq nat (add a a) (add a b).
            @[simp] mul_add (a : nat) (b : nat) : eq nat (mul a b) (add a b).
        ";
        let (_, db) = db(&[NAT, cmds].concat());
        let perms: Vec<_> = db.rules().map(|r| r.perm).collect();
        assert_eq!(perms, [true, false, false]);
    }

    #[test]
    fn conditional() {
        let cmds = r"
            d : nat -> nat -> nat.
            Monoid : Type -> Type.
            op : A : Type -> A -> A -> A.
            unit : A : Type -> A.
            @[simp] d_self (x : nat) (h : ne nat x zero) : eq nat (d x x) one.
            @[simp] d_zero (x : nat) : eq nat (d x zero) zero.
            @[simp] d_one (x : nat) (y : nat) : eq nat (d x one) (add x y).
            @[simp] op_unit (A : Type) [m : Monoid A] (a : A) : eq A (op A a (unit A)) a.
        ";
        let (_, db) = db(&[NAT, cmds].concat());
        // hypotheses used only on the right or by instance search are no side conditions
        let conds: Vec<_> = db.rules().map(|r| r.conditional).collect();
        assert_eq!(conds, [true, false, false, false]);
        let rule = db.rules().next().unwrap();
        assert_eq!(rule.hyps[1].ty.to_string(), "(ne nat β0 zero)");
        assert_eq!(rule.lhs.to_string(), "(d β1 β1)");
    }

    #[test]
    fn indexing() {
        let cmds = r"
            @[simp] var_head (f : nat -> nat) (x : nat) : eq nat (f x) x.
            @[simp] def double := x : nat => add x x.
            @[congr] add_congr (a : nat) (b : nat) (c : nat) (d : nat) (e1 : eq nat a b) (e2 : eq nat c d) :
              eq nat (add a c) (add b d).
            @[congr] bad : le zero zero.
            @[simp] bad_rule : Type.
        ";
        let (_, db) = db(&[NAT, cmds].concat());
        assert_eq!(db.rules().count(), 0);
        assert!(db.is_unfold(&Symbol::new("double")));
        let add = Symbol::new("add");
        assert_eq!(db.congr_for(&add), Some(&Symbol::new("add_congr")));
        assert!(db.is_congr(&Symbol::new("add_congr")));
        assert!(!db.is_congr(&Symbol::new("bad")));
    }
}
