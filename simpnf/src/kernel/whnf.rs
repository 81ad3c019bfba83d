//! Weak head normalisation.

use super::{Kernel, Transparency};
use crate::{Error, Rule, Symbol, Term};

impl<'a> Kernel<'a> {
    /// Return the weak head normal form of a term.
    pub fn whnf(&self, mut tm: Term, tr: Transparency) -> Result<Term, Error> {
        loop {
            self.tick()?;
            match self.whnf_step(&tm, tr)? {
                Some(next) => {
                    trace!("whnf: {} ⟶ {}", tm, next);
                    tm = next
                }
                None => return Ok(tm),
            }
        }
    }

    /// Perform a single head reduction step, if possible.
    pub fn whnf_step(&self, tm: &Term, tr: Transparency) -> Result<Option<Term>, Error> {
        let (head, args) = tm.get_app();
        if let Some((_, body)) = head.get_abst() {
            if let Some((arg, rest)) = args.split_first() {
                return Ok(Some(body.clone().subst(arg).apply(rest.to_vec())));
            }
        }
        match head {
            Term::Const(c) => self.delta(c, args, tr),
            _ => Ok(None),
        }
    }

    /// Unfold a symbol applied to arguments, by its body or by its first matching rule.
    fn delta(&self, c: &Symbol, args: &[Term], tr: Transparency) -> Result<Option<Term>, Error> {
        match self.env.lookup(c) {
            Some(decl) if tr.unfolds(decl) => (),
            _ => return Ok(None),
        }
        if let Some(value) = self.env.value_of(c) {
            return Ok(Some(value.clone().apply(args.to_vec())));
        }
        for rule in self.env.rules_of(c) {
            if let Some(tm) = self.rewrite(rule, args, tr)? {
                return Ok(Some(tm));
            }
        }
        Ok(None)
    }

    /// Rewrite with a rule whose left-hand side has the arguments `args`,
    /// possibly followed by further arguments.
    pub fn rewrite(&self, rule: &Rule, args: &[Term], tr: Transparency) -> Result<Option<Term>, Error> {
        let arity = rule.lhs.args.len();
        if args.len() < arity {
            return Ok(None);
        }
        let (args, rest) = args.split_at(arity);
        match self.match_rule(rule, args, tr)? {
            Some(subst) => Ok(Some(rule.rhs.clone().psubst(&subst).apply(rest.to_vec()))),
            None => Ok(None),
        }
    }
}
