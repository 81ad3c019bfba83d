//! Total order on terms, used to orient permutation rules.

use crate::term::{Term, TermC};
use core::cmp::Ordering;

/// Number of nodes of a term.
pub fn size(tm: &Term) -> usize {
    match tm {
        Term::Comb(c) => match &**c {
            TermC::Appl(head, args) => 1 + size(head) + args.iter().map(size).sum::<usize>(),
            TermC::Prod(arg, body) => 1 + size(&arg.ty) + size(body),
            TermC::Abst(arg, body) => 1 + arg.ty.as_ref().map_or(0, size) + size(body),
        },
        _ => 1,
    }
}

fn rank(tm: &Term) -> u8 {
    match tm {
        Term::Type => 0,
        Term::Const(_) => 1,
        Term::FVar(_) => 2,
        Term::MVar(_) => 3,
        Term::BVar(_) => 4,
        Term::Comb(c) => match &**c {
            TermC::Appl(..) => 5,
            TermC::Prod(..) => 6,
            TermC::Abst(..) => 7,
        },
    }
}

fn lex(tm1: &Term, tm2: &Term) -> Ordering {
    let all = |tms1: &[Term], tms2: &[Term]| {
        let mut cmps = tms1.iter().zip(tms2).map(|(t1, t2)| lex(t1, t2));
        let cmp = cmps.find(|o| o.is_ne());
        tms1.len().cmp(&tms2.len()).then(cmp.unwrap_or(Ordering::Equal))
    };
    match (tm1, tm2) {
        (Term::Const(c1), Term::Const(c2)) => c1.cmp(c2),
        (Term::FVar(x1), Term::FVar(x2)) => x1.id.cmp(&x2.id),
        (Term::MVar(m1), Term::MVar(m2)) => m1.cmp(m2),
        (Term::BVar(i1), Term::BVar(i2)) => i1.cmp(i2),
        (Term::Comb(c1), Term::Comb(c2)) => match (&**c1, &**c2) {
            (TermC::Appl(f1, args1), TermC::Appl(f2, args2)) => lex(f1, f2).then_with(|| all(args1, args2)),
            (TermC::Prod(a1, t1), TermC::Prod(a2, t2)) => lex(&a1.ty, &a2.ty).then_with(|| lex(t1, t2)),
            (TermC::Abst(_, t1), TermC::Abst(_, t2)) => lex(t1, t2),
            _ => rank(tm1).cmp(&rank(tm2)),
        },
        _ => rank(tm1).cmp(&rank(tm2)),
    }
}

/// Compare terms first by size, then lexicographically.
///
/// Free variables are ordered by the time of their creation.
pub fn compare(tm1: &Term, tm2: &Term) -> Ordering {
    size(tm1).cmp(&size(tm2)).then_with(|| lex(tm1, tm2))
}
