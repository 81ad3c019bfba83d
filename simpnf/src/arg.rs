use alloc::sync::Arc;

/// How the argument of a binder is supplied.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinderInfo {
    Default,
    /// solved by instance search
    Instance,
}

/// Argument of a binder.
/// For example, the `x` and `A` in the term `x : A => t`.
///
/// Equality ignores the display name `id`.
#[derive(Clone, Debug)]
pub struct Arg<Ty> {
    pub id: Arc<str>,
    pub ty: Ty,
    pub info: BinderInfo,
}

impl<Ty> Arg<Ty> {
    pub fn new(id: &str, ty: Ty) -> Self {
        let id = Arc::from(id);
        let info = BinderInfo::Default;
        Self { id, ty, info }
    }

    pub fn map_ty<F, U>(self, f: F) -> Arg<U>
    where
        F: FnOnce(Ty) -> U,
    {
        let ty = f(self.ty);
        Arg {
            id: self.id,
            ty,
            info: self.info,
        }
    }
}

impl<Ty: PartialEq> PartialEq for Arg<Ty> {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty && self.info == other.info
    }
}

impl<Ty: Eq> Eq for Arg<Ty> {}
