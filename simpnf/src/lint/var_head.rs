//! Check that left-hand sides are not headed by variables.

use super::decompose::decompose;
use super::{Check, Finding};
use crate::kernel::Kernel;
use crate::simp::RuleDatabase;
use crate::{Error, Symbol, Term};
use alloc::vec::Vec;

/// Variable-head check.
pub struct VarHead;

impl Check for VarHead {
    const NAME: &'static str = "variable head";

    fn check(kernel: &Kernel, _db: &RuleDatabase, name: &Symbol) -> Result<Vec<Finding>, Error> {
        let rules = decompose(kernel, name)?;
        let heads = rules.into_iter().filter_map(|info| match info.lhs.get_app().0 {
            Term::FVar(x) => Some(Finding::VarHead(x.clone())),
            _ => None,
        });
        Ok(heads.collect())
    }
}
