//! Binder contexts indexed by de Bruijn indices.

use alloc::vec::Vec;

/// Binder context, innermost binder first.
///
/// `iter().nth(i)` yields the binder referred to by the de Bruijn index `i`.
#[derive(Clone, Debug)]
pub struct Stack<A>(Vec<A>);

impl<A> Stack<A> {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn push(&mut self, x: A) {
        self.0.push(x)
    }

    /// Run `f` under an additional binder `x`.
    ///
    /// The binder is removed afterwards, whether `f` succeeds or not.
    pub fn with_pushed<F, Y, E>(&mut self, x: A, f: F) -> Result<Y, E>
    where
        F: FnOnce(&mut Stack<A>) -> Result<Y, E>,
    {
        self.0.push(x);
        let y = f(self);
        self.0.pop();
        y
    }

    /// Binders from the innermost to the outermost.
    pub fn iter(&self) -> impl Iterator<Item = &A> {
        self.0.iter().rev()
    }
}

impl<A> Default for Stack<A> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<A> FromIterator<A> for Stack<A> {
    fn from_iter<I: IntoIterator<Item = A>>(iter: I) -> Self {
        Self(Vec::from_iter(iter))
    }
}

#[test]
fn with_pushed_restores() {
    let mut stack: Stack<_> = [1, 2].into_iter().collect();
    let top = stack.with_pushed(3, |s| Ok::<_, ()>(*s.iter().next().unwrap()));
    assert_eq!(top, Ok(3));
    let err = stack.with_pushed(4, |_| Err::<(), _>(()));
    assert_eq!(err, Err(()));
    assert_eq!(stack.iter().copied().collect::<Vec<_>>(), [2, 1]);
}
