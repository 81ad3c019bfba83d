//! Check that commutativity rules are not used as rewrite rules.
//!
//! A rule such as `add a b = add b a` makes the simplifier loop
//! unless it is applied only in one direction.

use super::decompose::decompose;
use super::{Check, Finding};
use crate::kernel::{Kernel, MCtx, Transparency};
use crate::simp::{preprocess, RuleDatabase};
use crate::symbol::names;
use crate::{Error, Symbol, Term};
use alloc::vec::Vec;

/// Commutativity check.
pub struct Comm;

impl Check for Comm {
    const NAME: &'static str = "commutativity";

    fn check(kernel: &Kernel, _db: &RuleDatabase, name: &Symbol) -> Result<Vec<Finding>, Error> {
        let infos = decompose(kernel, name)?;
        let decl = kernel.env.lookup(name).ok_or_else(|| Error::UnknownDeclaration(name.clone()))?;
        let ty = decl.ty().ok_or_else(|| Error::NotAnEquation(name.clone()))?;
        let tr = Transparency::Default;

        let mut findings = Vec::new();
        for (i, info) in infos.iter().enumerate() {
            if info.conditional {
                continue;
            }
            match (info.lhs.head_const(), info.rhs.head_const()) {
                (Some(h1), Some(h2)) if h1 == h2 => (),
                _ => continue,
            }

            let mut mctx = MCtx::new();
            let (_, stmt) = kernel.open_pis_mvars(ty, &mut mctx);
            let eqs = preprocess(kernel, name, &stmt, Term::constant(names::SORRY))?;
            let eq = match eqs.get(i) {
                Some(eq) => eq,
                None => continue,
            };
            if !kernel.unify(&mut mctx, &info.rhs, &eq.lhs, tr)? {
                continue;
            }
            if !kernel.unify_isolated(&mctx, &info.rhs, &eq.lhs, tr)? {
                continue;
            }
            if kernel.unify_isolated(&mctx, &eq.lhs, &eq.rhs, tr)? {
                continue;
            }
            findings.push(Finding::Comm)
        }
        Ok(findings)
    }
}
