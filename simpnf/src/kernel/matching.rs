//! Matching of terms against the left-hand sides of rewrite rules.

use super::{Kernel, Transparency};
use crate::pattern::Pattern;
use crate::{Error, Rule, Term};
use alloc::vec::Vec;

impl<'a> Kernel<'a> {
    /// Match arguments against the arguments of the left-hand side of a rule.
    ///
    /// On success, return the term for every rule variable,
    /// indexed like the de Bruijn indices of the right-hand side.
    pub fn match_rule(&self, rule: &Rule, args: &[Term], tr: Transparency) -> Result<Option<Vec<Term>>, Error> {
        let mut subst = Vec::new();
        subst.resize(rule.ctx.len(), Vec::new());
        for (pat, tm) in rule.lhs.args.iter().zip(args) {
            if !self.match_pattern(pat, tm.clone(), &mut subst, tr)? {
                return Ok(None);
            }
        }
        let mut result = Vec::with_capacity(subst.len());
        for tms in subst {
            match self.all_convertible(tms, tr)? {
                Some(tm) => result.push(tm),
                None => return Ok(None),
            }
        }
        Ok(Some(result))
    }

    fn match_pattern(&self, pat: &Pattern, tm: Term, subst: &mut [Vec<Term>], tr: Transparency) -> Result<bool, Error> {
        match pat {
            Pattern::Joker => Ok(true),
            Pattern::MVar(m) => match subst.get_mut(*m) {
                Some(tms) => {
                    tms.push(tm);
                    Ok(true)
                }
                None => Ok(false),
            },
            Pattern::Symb(s, pats) => {
                let tm = self.whnf(tm, tr)?;
                let (head, args) = tm.get_app();
                match head {
                    Term::Const(c) if c == s && args.len() == pats.len() => {
                        for (pat, arg) in pats.iter().zip(args) {
                            if !self.match_pattern(pat, arg.clone(), subst, tr)? {
                                return Ok(false);
                            }
                        }
                        Ok(true)
                    }
                    _ => Ok(false),
                }
            }
        }
    }

    /// Return the first term if all terms are convertible.
    ///
    /// Variables that occur several times in a pattern
    /// must be matched by convertible terms.
    fn all_convertible(&self, tms: Vec<Term>, tr: Transparency) -> Result<Option<Term>, Error> {
        let mut iter = tms.into_iter();
        let first = match iter.next() {
            Some(tm) => tm,
            None => return Ok(None),
        };
        for tm in iter {
            if !self.is_def_eq(&first, &tm, tr)? {
                return Ok(None);
            }
        }
        Ok(Some(first))
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::term;
    use super::*;
    use crate::{Config, Env, Symbol};
    use alloc::string::ToString;

    #[test]
    fn nonlinear() -> Result<(), Error> {
        let mut env = Env::new();
        env.load("nat : Type. zero : nat. one : nat. def d : nat -> nat -> nat. [x] d x x --> zero.")?;
        let cfg = Config::default();
        let kernel = Kernel::new(&env, &cfg);
        let rule = &env.rules_of(&Symbol::new("d"))[0];
        let tr = Transparency::Default;

        let args = [term(&env, "one"), term(&env, "one")];
        let subst = kernel.match_rule(rule, &args, tr)?.unwrap();
        assert_eq!(subst.len(), 1);
        assert_eq!(subst[0].to_string(), "one");

        let args = [term(&env, "one"), term(&env, "zero")];
        assert!(kernel.match_rule(rule, &args, tr)?.is_none());
        Ok(())
    }

    #[test]
    fn unused_variable() -> Result<(), Error> {
        let mut env = Env::new();
        env.load("nat : Type. zero : nat. def c : nat -> nat. [x, y] c x --> zero.")?;
        let cfg = Config::default();
        let kernel = Kernel::new(&env, &cfg);
        let rule = &env.rules_of(&Symbol::new("c"))[0];
        let args = [term(&env, "zero")];
        assert!(kernel.match_rule(rule, &args, Transparency::Default)?.is_none());
        Ok(())
    }
}
