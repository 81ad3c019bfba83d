//! Decomposition of rule declarations into equations with hypotheses.

use crate::kernel::{is_conditional, Hypothesis, Kernel};
use crate::simp::{preprocess, Reduction};
use crate::symbol::names;
use crate::{Error, Symbol, Term};
use alloc::vec::Vec;

/// Equation obtained from a rule declaration.
#[derive(Clone, Debug)]
pub struct RuleInfo {
    pub hyps: Vec<Hypothesis>,
    /// some hypothesis is a side condition
    pub conditional: bool,
    pub lhs: Term,
    pub rhs: Term,
    pub reduction: Reduction,
}

/// Open the hypotheses of a declaration and turn its statement into equations.
pub fn decompose(kernel: &Kernel, name: &Symbol) -> Result<Vec<RuleInfo>, Error> {
    let decl = kernel.env.lookup(name);
    let decl = decl.ok_or_else(|| Error::UnknownDeclaration(name.clone()))?;
    let ty = decl.ty().ok_or_else(|| Error::NotAnEquation(name.clone()))?;
    let (hyps, stmt) = kernel.open_pis(ty);
    let eqs = preprocess(kernel, name, &stmt, Term::constant(names::SORRY))?;
    if eqs.is_empty() {
        return Err(Error::NotAnEquation(name.clone()));
    }
    let info = |eq: crate::simp::Equation| RuleInfo {
        conditional: is_conditional(&hyps, &eq.lhs, &eq.rhs),
        hyps: hyps.clone(),
        lhs: eq.lhs,
        rhs: eq.rhs,
        reduction: eq.reduction,
    };
    Ok(eqs.into_iter().map(info).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, Env};
    use alloc::string::ToString;

    #[test]
    fn decompose_rules() -> Result<(), Error> {
        let mut env = Env::new();
        env.load(
            r"
            nat : Type. zero : nat. one : nat.
            d : nat -> nat -> nat. le : nat -> nat -> Prop.
            Dec : Prop -> Type.
            ite : p : Prop -> [inst : Dec p] -> nat -> nat -> nat.
            @[simp] d_self (x : nat) (h : ne nat x zero) : eq nat (d x x) one.
            @[simp] d_le (x : nat) (y : nat) [h : le x y] : eq nat (d x x) zero.
            @[simp] ite_same (p : Prop) [inst : Dec p] (x : nat) : eq nat (ite p x x) x.
            @[simp] both (x : nat) : and (eq nat (d x zero) x) (le zero x).
            nothing : Type.
        ",
        )?;
        let cfg = Config::default();
        let kernel = Kernel::new(&env, &cfg);
        let rules = |name: &str| decompose(&kernel, &Symbol::new(name));

        let d_self = rules("d_self")?;
        assert_eq!(d_self.len(), 1);
        assert!(d_self[0].conditional);
        assert_eq!(d_self[0].lhs.to_string(), "(d x x)");
        assert_eq!(d_self[0].hyps.len(), 2);

        // `y` occurs in the type of `h`
        assert!(!rules("d_le")?[0].conditional);

        // instance hypotheses are not side conditions
        let ite_same = rules("ite_same")?;
        assert!(!ite_same[0].conditional);
        assert_eq!(ite_same[0].lhs.to_string(), "(ite p x x)");

        let both = rules("both")?;
        assert_eq!(both.len(), 2);
        assert_eq!(both[0].reduction, Reduction::Reducing);
        assert_eq!(both[1].reduction, Reduction::Preserving);
        assert_eq!(both[1].rhs.to_string(), "true");

        assert!(matches!(rules("nothing"), Err(Error::NotAnEquation(_))));
        assert!(matches!(rules("missing"), Err(Error::UnknownDeclaration(_))));
        Ok(())
    }
}
