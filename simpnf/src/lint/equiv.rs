//! Comparison of simplification results.

use crate::kernel::{Kernel, Transparency};
use crate::{Error, Term};

/// Return true if two terms are considered equal.
///
/// If `reduce_first` holds, both terms are first reduced to weak head normal form.
/// Terms headed by global symbols are equal if they have the same head and
/// are definitionally equal; all other terms must be syntactically equal.
pub fn is_equivalent(kernel: &Kernel, tm1: &Term, tm2: &Term, reduce_first: bool, tr: Transparency) -> Result<bool, Error> {
    let (tm1, tm2) = if reduce_first {
        (kernel.whnf(tm1.clone(), tr)?, kernel.whnf(tm2.clone(), tr)?)
    } else {
        (tm1.clone(), tm2.clone())
    };
    let eq = match (tm1.head_const(), tm2.head_const()) {
        (Some(h1), Some(h2)) => h1 == h2 && kernel.is_def_eq(&tm1, &tm2, tr)?,
        _ => tm1 == tm2,
    };
    debug!("equivalent: {} ≡ {}: {}", tm1, tm2, eq);
    Ok(eq)
}
