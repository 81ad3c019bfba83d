use crate::env::Decl;
use crate::Rule;
use alloc::vec::Vec;

/// Command that changes the environment.
#[derive(Clone, Debug)]
pub enum Command {
    /// Introduce a new name
    Intro(Decl),
    /// Add rewrite rules
    Rules(Vec<Rule>),
}
