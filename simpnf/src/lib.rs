#![no_std]
#![forbid(unsafe_code)]

//! Normal-form linting for databases of conditional rewrite rules.
//!
//! A rewrite rule is a theorem tagged with `@[simp]` whose statement,
//! after stripping its hypotheses, is an equation (or can be turned into one).
//! A database of such rules drives a simplifier that rewrites terms to normal form.
//! Rules that never fire, or that are subsumed by other rules,
//! slow down the simplifier and make its behaviour hard to predict.
//! This library detects such rules.
//!
//! # Usage
//!
//! Commands are loaded into an [`Env`], from which a [`RuleDatabase`] is built.
//! A [`Linter`] then runs checks on single rules, returning
//! a [`Report`] if the check fails:
//!
//! * [`Linter::normal_form`] verifies that the left-hand side of a rule
//!   is in normal form with respect to the other rules and that
//!   the rule is not provable by simplification alone;
//! * [`Linter::var_head`] verifies that the head of the left-hand side is
//!   not a variable;
//! * [`Linter::comm`] verifies that the rule is not a commutativity rule.
//!
//! ~~~
//! # use simpnf::{Config, Env, Linter, RuleDatabase, Symbol};
//! let mut env = Env::new();
//! env.load(r"
//!     nat : Type.
//!     f : nat -> nat. g : nat -> nat. h : nat -> nat.
//!     @[simp] f_g (x : nat) : eq nat (f x) (g x).
//!     @[simp] g_h (x : nat) : eq nat (g x) (h x).
//!     @[simp] f_h (x : nat) : eq nat (f x) (h x).
//! ")?;
//! let cfg = Config::default();
//! let db = RuleDatabase::from_env(&env, &cfg)?;
//! let linter = Linter::new(&env, &db, &cfg);
//!
//! assert!(linter.normal_form(&Symbol::new("f_g"))?.is_none());
//! let report = linter.normal_form(&Symbol::new("f_h"))?.unwrap();
//! assert_eq!(report.to_string(), "simp can prove this using f_g, g_h");
//! # Ok::<_, simpnf::Error>(())
//! ~~~
//!
//! # Organisation
//!
//! * The [`env`] module stores declarations together with
//!   their attributes and definitional rewrite rules.
//! * The [`kernel`] module reduces, compares, and unifies terms.
//! * The [`simp`] module builds rule databases and rewrites terms with them,
//!   recording a proof term for every rewrite.
//! * The [`lint`] module contains the checks.
//!
//! Checks neither modify the environment nor the database,
//! so several checks can run in parallel.

extern crate alloc;
#[macro_use]
extern crate log;

mod app;
mod arg;
mod command;
mod config;
pub mod env;
pub mod error;
mod intro;
pub mod kernel;
pub mod lint;
pub mod pattern;
mod rule;
pub mod scope;
pub mod simp;
mod stack;
mod subst;
pub mod symbol;
pub mod term;

pub use app::App;
pub use arg::{Arg, BinderInfo};
pub use command::Command;
pub use config::Config;
pub use env::{Decl, Env};
pub use error::{Error, Side};
pub use intro::Intro;
pub use kernel::{Kernel, Transparency};
pub use lint::{Finding, Linter, Report};
pub use rule::Rule;
pub use simp::{NormalizeResult, RuleDatabase};
pub use stack::Stack;
pub use symbol::Symbol;
pub use term::{FVar, MVar, RTerm, Term, TermC};
