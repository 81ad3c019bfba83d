/// The way we introduce a new name.
#[derive(Debug, Clone)]
pub enum Intro<Ty, Tm = Ty> {
    /// definition, possibly given by rewrite rules instead of a body
    Definition(Option<Ty>, Option<Tm>),
    Theorem(Ty, Tm),
    Declaration(Ty),
}

impl<Ty, Tm> Intro<Ty, Tm> {
    /// Return true if rewrite rules may be attached to the name.
    pub fn rewritable(&self) -> bool {
        matches!(self, Self::Definition(..))
    }

    pub fn ty(&self) -> Option<&Ty> {
        match self {
            Self::Definition(ty, _) => ty.as_ref(),
            Self::Theorem(ty, _) | Self::Declaration(ty) => Some(ty),
        }
    }

    /// Body of a definition or proof of a theorem.
    pub fn value(&self) -> Option<&Tm> {
        match self {
            Self::Definition(_, tm) => tm.as_ref(),
            Self::Theorem(_, tm) => Some(tm),
            Self::Declaration(_) => None,
        }
    }
}
