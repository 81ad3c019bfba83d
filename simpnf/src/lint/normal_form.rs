//! Check that rules are in normal form with respect to the other rules.

use super::decompose::{decompose, RuleInfo};
use super::equiv::is_equivalent;
use super::fired::{Classifier, FiredRules};
use super::{Check, Finding};
use crate::kernel::Kernel;
use crate::simp::{NormalizeResult, RuleDatabase, Simp};
use crate::{Error, Side, Symbol, Term};
use alloc::{boxed::Box, vec::Vec};

/// Last name component of rules that are exempt from the redundancy check.
///
/// Such rules are generated for every constructor and are
/// provable by simplification with the size definitions.
pub const SIZEOF_SPEC: &str = "sizeof_spec";

/// Normal-form check.
pub struct NormalForm;

impl Check for NormalForm {
    const NAME: &'static str = "normal form";

    fn check(kernel: &Kernel, db: &RuleDatabase, name: &Symbol) -> Result<Vec<Finding>, Error> {
        let classifier = Classifier::new(db);
        let mut findings = Vec::new();
        for info in decompose(kernel, name)? {
            findings.extend(check_rule(kernel, db, &classifier, name, &info)?)
        }
        Ok(findings)
    }
}

fn normalize(kernel: &Kernel, db: &RuleDatabase, info: &RuleInfo, tm: &Term, side: Side) -> Result<NormalizeResult, Error> {
    let mut simp = Simp::new(kernel, db).with_locals(&info.hyps);
    simp.normalize(tm.clone()).map_err(|e| Error::Normalize(side, Box::new(e)))
}

fn check_rule(
    kernel: &Kernel,
    db: &RuleDatabase,
    classifier: &Classifier,
    name: &Symbol,
    info: &RuleInfo,
) -> Result<Option<Finding>, Error> {
    let lhs = normalize(kernel, db, info, &info.lhs, Side::Left)?;
    let fired_lhs: Option<FiredRules> = lhs.proof.as_ref().map(|p| classifier.extract(p));
    if fired_lhs.as_ref().map_or(false, |fired| fired.contains(name)) {
        debug!("{} simplifies its own left-hand side", name);
        return Ok(None);
    }

    let rhs = normalize(kernel, db, info, &info.rhs, Side::Right)?;
    let tr = info.reduction.transparency();
    let collapsed = is_equivalent(kernel, &lhs.result, &rhs.result, false, tr)?;
    let lhs_stable = is_equivalent(kernel, &lhs.result, &info.lhs, true, tr)?;

    if collapsed {
        let mut fired = match fired_lhs {
            Some(fired) => fired,
            None => return Ok(None),
        };
        if name.last() == SIZEOF_SPEC {
            debug!("{} is exempt from the redundancy check", name);
            return Ok(None);
        }
        if let Some(proof) = &rhs.proof {
            fired.extend(classifier.extract(proof))
        }
        Ok(Some(Finding::Redundant(fired)))
    } else if !lhs_stable {
        let using = fired_lhs.unwrap_or_default();
        Ok(Some(Finding::LhsReduces { to: lhs.result, using }))
    } else if !info.conditional && info.lhs == lhs.result {
        Ok(Some(Finding::LhsNoSimp))
    } else {
        Ok(None)
    }
}
