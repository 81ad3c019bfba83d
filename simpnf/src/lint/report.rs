//! Findings of the checks and their display.

use super::FiredRules;
use crate::{FVar, Symbol, Term};
use alloc::vec::Vec;
use core::fmt::{self, Display};

/// Problem found with a rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Finding {
    /// the rule can be proved by simplification with other rules
    Redundant(FiredRules),
    /// the left-hand side simplifies to a different term
    LhsReduces { to: Term, using: FiredRules },
    /// the left-hand side does not simplify, not even by the rule itself
    LhsNoSimp,
    /// the left-hand side is headed by a hypothesis
    VarHead(FVar),
    /// the rule rewrites a term to an instance of itself with swapped arguments
    Comm,
}

/// Findings of a check for a declaration.
#[derive(Clone, Debug)]
pub struct Report {
    pub decl: Symbol,
    pub findings: Vec<Finding>,
}

impl Report {
    /// Create a report if there are findings.
    pub fn new(decl: &Symbol, findings: Vec<Finding>) -> Option<Self> {
        let decl = decl.clone();
        (!findings.is_empty()).then(|| Self { decl, findings })
    }
}

fn using(fired: &FiredRules, f: &mut fmt::Formatter) -> fmt::Result {
    if fired.is_empty() {
        Ok(())
    } else {
        write!(f, " using {}", fired)
    }
}

impl Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Redundant(fired) => {
                write!(f, "simp can prove this")?;
                using(fired, f)
            }
            Self::LhsReduces { to, using: fired } => {
                write!(f, "left-hand side reduces to {}", to)?;
                using(fired, f)
            }
            Self::LhsNoSimp => write!(f, "left-hand side does not simplify when using the rule on itself"),
            Self::VarHead(x) => write!(f, "left-hand side has variable {} as head symbol", x),
            Self::Comm => write!(f, "commutativity lemma should not be marked as a rewrite rule"),
        }
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut iter = self.findings.iter();
        if let Some(first) = iter.next() {
            first.fmt(f)?;
        }
        iter.try_for_each(|finding| write!(f, "\n{}", finding))
    }
}
