//! Extraction of the rules that took part in a simplification.
//!
//! Proofs produced by the simplifier mention the proofs of the rules it used,
//! together with plumbing lemmas such as `eq.trans`.
//! We recover the used rules from the global names occurring in a proof.
//! This may report too many rules if a name occurs in a proof by coincidence,
//! and too few if a rewrite step leaves no trace in the proof.

use crate::simp::RuleDatabase;
use crate::{Symbol, Term};
use alloc::collections::{BTreeMap, BTreeSet};
use core::fmt::{self, Display};

/// Names of the rules used in a proof, ordered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FiredRules(BTreeSet<Symbol>);

impl FiredRules {
    pub fn contains(&self, name: &Symbol) -> bool {
        self.0.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.0.iter()
    }
}

impl FromIterator<Symbol> for FiredRules {
    fn from_iter<I: IntoIterator<Item = Symbol>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Symbol> for FiredRules {
    fn extend<I: IntoIterator<Item = Symbol>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}

impl IntoIterator for FiredRules {
    type Item = Symbol;
    type IntoIter = alloc::collections::btree_set::IntoIter<Symbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Display for FiredRules {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut iter = self.0.iter();
        if let Some(first) = iter.next() {
            first.fmt(f)?;
        }
        iter.try_for_each(|name| write!(f, ", {}", name))
    }
}

/// Role of a global name in a proof.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Class {
    /// definition unfolded by the simplifier
    Unfold,
    /// congruence lemma
    Congr,
    /// proof of a simplification rule, obtained from the given declaration
    Rule(Symbol),
    /// equation lemma of the given definition
    Equation(Symbol),
    /// anything else
    Plumbing,
}

impl Class {
    /// Name of the rule that the class stands for, if any.
    pub fn fired(self, name: &Symbol) -> Option<Symbol> {
        match self {
            Self::Unfold | Self::Congr => Some(name.clone()),
            Self::Rule(origin) | Self::Equation(origin) => Some(origin),
            Self::Plumbing => None,
        }
    }
}

/// Classification of the global names occurring in proofs.
pub struct Classifier<'d> {
    db: &'d RuleDatabase,
    /// heads of rule proofs mapped to the declarations they come from
    proof_names: BTreeMap<Symbol, Symbol>,
}

impl<'d> Classifier<'d> {
    pub fn new(db: &'d RuleDatabase) -> Self {
        let heads = db.rules().filter_map(|r| Some((r.proof.head_const()?.clone(), r.origin.clone())));
        let proof_names = heads.collect();
        Self { db, proof_names }
    }

    pub fn classify(&self, name: &Symbol) -> Class {
        if self.db.is_unfold(name) {
            Class::Unfold
        } else if self.db.is_congr(name) {
            Class::Congr
        } else if let Some(origin) = self.proof_names.get(name) {
            Class::Rule(origin.clone())
        } else if let Some(owner) = name.eqn_owner() {
            Class::Equation(owner)
        } else {
            Class::Plumbing
        }
    }

    /// Rules used in a proof.
    pub fn extract(&self, proof: &Term) -> FiredRules {
        let consts = proof.consts();
        consts.iter().filter_map(|c| self.classify(c).fired(c)).collect()
    }
}

/// Rules used in a proof produced with the given database.
pub fn extract_fired(db: &RuleDatabase, proof: &Term) -> FiredRules {
    Classifier::new(db).extract(proof)
}
