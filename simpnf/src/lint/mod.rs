//! Checks for simplification rules.
//!
//! Every check takes the name of a declaration tagged as simplification rule
//! and returns a [`Report`] if it finds a problem with the rule.
//! A declaration may yield several equations (see [`decompose`]);
//! these are checked independently and their findings are reported together.

pub mod comm;
pub mod decompose;
pub mod equiv;
pub mod fired;
pub mod normal_form;
mod report;
pub mod var_head;

pub use fired::{extract_fired, FiredRules};
pub use report::{Finding, Report};

use crate::kernel::Kernel;
use crate::simp::RuleDatabase;
use crate::{Config, Env, Error, Symbol};
use alloc::vec::Vec;

/// A check of a single rule declaration.
pub trait Check {
    /// Name of the check, used for logging.
    const NAME: &'static str;

    /// Return the problems found with the rule.
    fn check(kernel: &Kernel, db: &RuleDatabase, name: &Symbol) -> Result<Vec<Finding>, Error>;
}

/// Runs checks on the rules of an environment.
///
/// The linter only reads the environment and the database,
/// so it can be shared between threads.
pub struct Linter<'a> {
    env: &'a Env,
    db: &'a RuleDatabase,
    cfg: &'a Config,
}

impl<'a> Linter<'a> {
    pub fn new(env: &'a Env, db: &'a RuleDatabase, cfg: &'a Config) -> Self {
        Self { env, db, cfg }
    }

    /// Run a check on a declaration.
    ///
    /// Declarations that are not tagged as simplification rules pass every check.
    pub fn test<C: Check>(&self, name: &Symbol) -> Result<Option<Report>, Error> {
        if self.env.lookup(name).is_none() {
            return Err(Error::UnknownDeclaration(name.clone()));
        }
        if !self.env.is_tagged_rule(name) {
            debug!("{}: {} is not a simplification rule", C::NAME, name);
            return Ok(None);
        }
        let kernel = Kernel::new(self.env, self.cfg);
        let report = Report::new(name, C::check(&kernel, self.db, name)?);
        match &report {
            Some(report) => info!("{} check fails for {}: {}", C::NAME, name, report),
            None => debug!("{} check passes for {}", C::NAME, name),
        }
        Ok(report)
    }

    pub fn normal_form(&self, name: &Symbol) -> Result<Option<Report>, Error> {
        self.test::<normal_form::NormalForm>(name)
    }

    pub fn var_head(&self, name: &Symbol) -> Result<Option<Report>, Error> {
        self.test::<var_head::VarHead>(name)
    }

    pub fn comm(&self, name: &Symbol) -> Result<Option<Report>, Error> {
        self.test::<comm::Comm>(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Side;
    use alloc::string::{String, ToString};
    use alloc::{format, vec::Vec};

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    const NAT: &str = r"
        nat : Type. zero : nat. one : nat. succ : nat -> nat.
        add : nat -> nat -> nat.
        f : nat -> nat. g : nat -> nat. h : nat -> nat. k : nat -> nat.
        d : nat -> nat -> nat.
        list : Type. nil : list. cons : nat -> list -> list.
    ";

    struct Fixture {
        env: Env,
        db: RuleDatabase,
        cfg: Config,
    }

    impl Fixture {
        fn new(cmds: &str) -> Self {
            Self::with_config(cmds, Config::default())
        }

        fn with_config(cmds: &str, cfg: Config) -> Self {
            init();
            let mut env = Env::new();
            env.load(&[NAT, cmds].concat()).unwrap();
            let db = RuleDatabase::from_env(&env, &cfg).unwrap();
            Self { env, db, cfg }
        }

        fn linter(&self) -> Linter {
            Linter::new(&self.env, &self.db, &self.cfg)
        }

        /// Run a check and return its report as string.
        fn run<C: Check>(&self, name: &str) -> Result<Option<String>, Error> {
            let report = self.linter().test::<C>(&Symbol::new(name))?;
            Ok(report.map(|r| r.to_string()))
        }

        fn normal_form(&self, name: &str) -> Result<Option<String>, Error> {
            self.run::<normal_form::NormalForm>(name)
        }
    }

    #[test]
    fn idempotent() -> Result<(), Error> {
        let fx = Fixture::new("@[simp] add_zero (a : nat) : eq nat (add a zero) a.");
        assert_eq!(fx.normal_form("add_zero")?, None);
        Ok(())
    }

    #[test]
    fn redundant() -> Result<(), Error> {
        let fx = Fixture::new(
            r"
            @[simp] r1 (x : nat) : eq nat (f x) (g x).
            @[simp] r2 (x : nat) : eq nat (g x) (h x).
            @[simp] r3 (x : nat) : eq nat (f x) (h x).
        ",
        );
        assert_eq!(fx.normal_form("r1")?, None);
        assert_eq!(fx.normal_form("r2")?, None);
        let report = fx.normal_form("r3")?;
        assert_eq!(report.as_deref(), Some("simp can prove this using r1, r2"));
        Ok(())
    }

    #[test]
    fn sizeof_spec() -> Result<(), Error> {
        let fx = Fixture::new(
            r"
            @[simp] r1 (x : nat) : eq nat (f x) (g x).
            @[simp] r2 (x : nat) : eq nat (g x) (h x).
            @[simp] list.cons.sizeof_spec (x : nat) : eq nat (f x) (h x).
        ",
        );
        assert_eq!(fx.normal_form("list.cons.sizeof_spec")?, None);
        Ok(())
    }

    #[test]
    fn lhs_reduces() -> Result<(), Error> {
        let fx = Fixture::new(
            r"
            @[simp] r1 (x : nat) : eq nat (f x) (g x).
            @[simp] r2 (x : nat) : eq nat (f x) (k (f x)).
        ",
        );
        let report = fx.normal_form("r2")?;
        assert_eq!(report.as_deref(), Some("left-hand side reduces to (g x) using r1"));
        Ok(())
    }

    #[test]
    fn lhs_no_simp() -> Result<(), Error> {
        let fx = Fixture::new("@[simp] var_head (P : nat -> nat) (x : nat) : eq nat (P x) x.");
        let report = fx.normal_form("var_head")?;
        let expected = "left-hand side does not simplify when using the rule on itself";
        assert_eq!(report.as_deref(), Some(expected));
        Ok(())
    }

    #[test]
    fn conditional() -> Result<(), Error> {
        let fx = Fixture::new("@[simp] d_self (x : nat) (h : ne nat x zero) : eq nat (d x x) one.");
        assert_eq!(fx.normal_form("d_self")?, None);
        Ok(())
    }

    #[test]
    fn preprocessed() -> Result<(), Error> {
        let fx = Fixture::new(
            r"
            le : nat -> nat -> Prop.
            @[simp] le_zero (x : nat) : le zero x.
            @[simp] both (x : nat) : and (eq nat (f x) (g x)) (iff (le x x) (le zero x)).
        ",
        );
        assert_eq!(fx.normal_form("le_zero")?, None);
        // the second equation rewrites `le x x` itself before `le_zero` applies
        assert_eq!(fx.normal_form("both")?, None);
        Ok(())
    }

    #[test]
    fn several_findings() -> Result<(), Error> {
        let fx = Fixture::new(
            r"
            @[simp] r1 (x : nat) : eq nat (f x) (g x).
            @[simp] r2 (x : nat) : eq nat (g x) (h x).
            @[simp] r3 (x : nat) : and (eq nat (f x) (h x)) (eq nat (k (f x)) x).
        ",
        );
        let report = fx.normal_form("r3")?.unwrap();
        let lines: Vec<_> = report.lines().collect();
        let expected = ["simp can prove this using r1, r2", "left-hand side reduces to (k (h x)) using r1, r2"];
        assert_eq!(lines, expected);
        Ok(())
    }

    #[test]
    fn equation_lemmas() -> Result<(), Error> {
        let fx = Fixture::new(
            r"
            @[simp] def len : list -> nat.
            [] len nil --> zero.
            [x, l] len (cons x l) --> succ (len l).
            @[simp] len_one (x : nat) : eq nat (add (len (cons x nil)) zero) (add (succ zero) zero).
            double : list -> list.
            @[simp] len_double (l : list) : eq nat (len (double l)) (add (len l) (len l)).
        ",
        );
        // the arguments are simplified before the rule is tried
        let report = fx.normal_form("len_one")?;
        assert_eq!(report.as_deref(), Some("simp can prove this using len"));
        // the rule fires before `len` is unfolded
        assert_eq!(fx.normal_form("len_double")?, None);
        Ok(())
    }

    #[test]
    fn local_instances() -> Result<(), Error> {
        let fx = Fixture::new(
            r"
            Monoid : Type -> Type.
            op : A : Type -> A -> A -> A.
            unit : A : Type -> A.
            @[simp] op_unit (A : Type) [m : Monoid A] (a : A) : eq A (op A a (unit A)) a.
        ",
        );
        assert_eq!(fx.normal_form("op_unit")?, None);
        Ok(())
    }

    #[test]
    fn var_head() -> Result<(), Error> {
        let fx = Fixture::new(
            r"
            @[simp] var_head (P : nat -> nat) (x : nat) : eq nat (P x) x.
            @[simp] add_zero (a : nat) : eq nat (add a zero) a.
        ",
        );
        let report = fx.linter().var_head(&Symbol::new("var_head"))?;
        let report = report.map(|r| r.to_string());
        assert_eq!(report.as_deref(), Some("left-hand side has variable P as head symbol"));
        assert!(fx.linter().var_head(&Symbol::new("add_zero"))?.is_none());
        Ok(())
    }

    #[test]
    fn comm() -> Result<(), Error> {
        let fx = Fixture::new(
            r"
            @[simp] add_comm (a : nat) (b : nat) : eq nat (add a b) (add b a).
            @[simp] add_zero (a : nat) : eq nat (add a zero) a.
            @[simp] add_self (a : nat) : eq nat (add a a) (add a a).
            @[simp] add_succ (a : nat) (b : nat) : eq nat (add (succ a) b) (add a (succ b)).
        ",
        );
        let linter = fx.linter();
        let comm = |s: &str| linter.comm(&Symbol::new(s));
        let report = comm("add_comm")?.map(|r| r.to_string());
        let expected = "commutativity lemma should not be marked as a rewrite rule";
        assert_eq!(report.as_deref(), Some(expected));
        assert!(comm("add_zero")?.is_none());
        assert!(comm("add_self")?.is_none());
        assert!(comm("add_succ")?.is_none());

        // permutation rules only fire when they decrease the term
        assert_eq!(fx.normal_form("add_comm")?, None);
        Ok(())
    }

    #[test]
    fn untagged_and_unknown() -> Result<(), Error> {
        let fx = Fixture::new("thm r (x : nat) : eq nat (f x) (f x) := x.");
        assert_eq!(fx.normal_form("r")?, None);
        assert_eq!(fx.normal_form("f")?, None);
        let err = fx.normal_form("missing");
        assert!(matches!(err, Err(Error::UnknownDeclaration(_))));
        Ok(())
    }

    #[test]
    fn not_an_equation() {
        let fx = Fixture::new("@[simp] bad : Type.");
        assert!(matches!(fx.normal_form("bad"), Err(Error::NotAnEquation(_))));
    }

    #[test]
    fn timeout() {
        let cfg = Config {
            simp_steps: 100,
            ..Config::default()
        };
        let fx = Fixture::with_config("@[simp] loop (x : nat) : eq nat (f x) (f (f x)).", cfg);
        let err = fx.normal_form("loop");
        assert!(matches!(err, Err(Error::Normalize(Side::Left, e)) if matches!(*e, Error::Timeout)));
    }

    fn small_kernel() -> Config {
        Config {
            kernel_steps: 1000,
            ..Config::default()
        }
    }

    #[test]
    fn nonterminating_beta() {
        let cmds = "@[simp] om : eq nat (f ((x => x x) (x => x x))) zero.";
        let fx = Fixture::with_config(cmds, small_kernel());
        let err = fx.normal_form("om");
        assert!(matches!(err, Err(Error::Normalize(Side::Left, e)) if matches!(*e, Error::Timeout)));
    }

    #[test]
    fn rhs_timeout() {
        let cmds = r"
            p : nat -> Prop.
            @[simp] om (x : nat) (h : p x) : eq nat (f x) (g ((y => y y) (y => y y))).
        ";
        let fx = Fixture::with_config(cmds, small_kernel());
        let err = fx.normal_form("om");
        assert!(matches!(err, Err(Error::Normalize(Side::Right, e)) if matches!(*e, Error::Timeout)));
    }

    #[test]
    fn equivalence_timeout() {
        let cmds = r"
            p : nat -> Prop.
            @[reducible] def spin : nat -> nat.
            [x] spin x --> spin x.
            @[simp] spin_g (x : nat) (h : p x) : eq nat (spin x) (g x).
        ";
        let fx = Fixture::with_config(cmds, small_kernel());
        // the simplifier does not unfold `spin`, but the stability check does
        assert!(matches!(fx.normal_form("spin_g"), Err(Error::Timeout)));
    }

    #[test]
    fn comm_conditional() -> Result<(), Error> {
        let fx = Fixture::new(
            r"
            @[simp] add_comm (a : nat) (b : nat) : eq nat (add a b) (add b a).
            @[simp] add_comm_ne (a : nat) (b : nat) (h : ne nat a b) : eq nat (add a b) (add b a).
        ",
        );
        let linter = fx.linter();
        assert!(linter.comm(&Symbol::new("add_comm"))?.is_some());
        assert!(linter.comm(&Symbol::new("add_comm_ne"))?.is_none());
        Ok(())
    }

    #[test]
    fn concurrent() {
        use rayon::prelude::*;
        let fx = Fixture::new(
            r"
            @[simp] r1 (x : nat) : eq nat (f x) (g x).
            @[simp] r2 (x : nat) : eq nat (g x) (h x).
            @[simp] r3 (x : nat) : eq nat (f x) (h x).
            @[simp] r4 (x : nat) : eq nat (f x) (k (f x)).
            @[simp] add_comm (a : nat) (b : nat) : eq nat (add a b) (add b a).
            @[simp] var_head (P : nat -> nat) (x : nat) : eq nat (P x) x.
        ",
        );
        let linter = fx.linter();
        let names: Vec<Symbol> = fx.env.decls().map(|d| d.name.clone()).collect();
        let lint = |name: &Symbol| {
            let show = |r: Result<Option<Report>, Error>| match r {
                Ok(Some(report)) => report.to_string(),
                Ok(None) => String::new(),
                Err(e) => e.to_string(),
            };
            let nf = show(linter.normal_form(name));
            let vh = show(linter.var_head(name));
            let cm = show(linter.comm(name));
            format!("{}: {} | {} | {}", name, nf, vh, cm)
        };
        let sequential: Vec<String> = names.iter().map(lint).collect();
        for _ in 0..4 {
            let parallel: Vec<String> = names.par_iter().map(lint).collect();
            assert_eq!(parallel, sequential);
        }
        assert!(sequential.iter().any(|s| s.starts_with("r3: simp can prove this")));
    }
}
