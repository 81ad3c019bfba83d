//! Declarations and definitional rewrite rules.

use crate::scope::{Error as ScopeError, Scope};
use crate::symbol::names;
use crate::{Arg, Command, Intro, Rule, Symbol, Term, TermC};
use alloc::{string::ToString, sync::Arc, vec::Vec};
use core::fmt::{self, Display};

/// Immutable HashMap for fast cloning of environments.
type FnvHashMap<K, V> = im::hashmap::HashMap<K, V, fnv::FnvBuildHasher>;

/// When a simplification rule is tried relative to visiting subterms.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// before simplifying the arguments
    Pre,
    /// after simplifying the arguments
    Post,
}

/// Attributes given by `@[...]`.
#[derive(Clone, Debug, Default)]
pub struct Attrs {
    /// `simp` or `pre`: use as simplification rule, or unfold if a definition
    pub simp: Option<Phase>,
    /// congruence lemma
    pub congr: bool,
    /// candidate for instance search
    pub instance: bool,
    /// unfold also under reducible transparency
    pub reducible: bool,
}

impl Attrs {
    pub fn parse<'s>(names: impl IntoIterator<Item = &'s str>) -> Result<Self, ScopeError> {
        let mut attrs = Self::default();
        for name in names {
            match name {
                "simp" => attrs.simp = Some(attrs.simp.unwrap_or(Phase::Post)),
                "pre" => attrs.simp = Some(Phase::Pre),
                "congr" => attrs.congr = true,
                "instance" => attrs.instance = true,
                "reducible" => attrs.reducible = true,
                _ => return Err(ScopeError::UnknownAttribute(name.to_string())),
            }
        }
        Ok(attrs)
    }
}

/// A named declaration, definition, or theorem.
#[derive(Clone, Debug)]
pub struct Decl {
    pub name: Symbol,
    pub intro: Intro<Term>,
    pub attrs: Attrs,
}

impl Decl {
    fn new(name: &str, ty: Term) -> Self {
        let name = Symbol::new(name);
        let intro = Intro::Declaration(ty);
        let attrs = Attrs::default();
        Self { name, intro, attrs }
    }

    pub fn ty(&self) -> Option<&Term> {
        self.intro.ty()
    }

    pub fn is_definition(&self) -> bool {
        self.intro.rewritable()
    }
}

#[derive(Debug)]
pub enum Error {
    Reintroduction(Symbol),
    NonRewritable(Symbol),
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Reintroduction(s) => write!(f, "{} is already declared", s),
            Self::NonRewritable(s) => write!(f, "{} is not a definition", s),
        }
    }
}

/// Declarations with their definitional rewrite rules.
///
/// ~~~
/// # use simpnf::{Env, Symbol};
/// let mut env = Env::new();
/// env.load("nat : Type. zero : nat. @[simp] z : eq nat zero zero.")?;
/// assert!(env.is_tagged_rule(&Symbol::new("z")));
/// assert!(!env.is_tagged_rule(&Symbol::new("zero")));
/// # Ok::<_, simpnf::Error>(())
/// ~~~
#[derive(Clone)]
pub struct Env {
    decls: FnvHashMap<Symbol, Arc<Decl>>,
    rules: FnvHashMap<Symbol, Arc<Vec<Rule>>>,
    order: im::Vector<Symbol>,
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

impl Env {
    /// Construct an environment without any declaration.
    pub fn empty() -> Self {
        Self {
            decls: Default::default(),
            rules: Default::default(),
            order: Default::default(),
        }
    }

    /// Construct an environment with the logical prelude.
    ///
    /// The prelude declares `Prop`, `true`, `false`, `not`, `and`, `iff`,
    /// as well as `eq` and `ne`, which take the type of their operands
    /// as first argument.
    pub fn new() -> Self {
        let prop = || Term::constant(names::PROP);
        let pi = |x: &str, ty, tm| Term::from(TermC::Prod(Arg::new(x, ty), tm));
        let unary = pi("_", prop(), prop());
        let binary = pi("_", prop(), unary.clone());
        // A : Type -> A -> A -> Prop
        let relation = pi("A", Term::Type, pi("_", Term::BVar(0), pi("_", Term::BVar(1), prop())));

        let mut env = Self::empty();
        let prelude = [
            Decl::new(names::PROP, Term::Type),
            Decl::new(names::TRUE, prop()),
            Decl::new(names::FALSE, prop()),
            Decl::new(names::NOT, unary),
            Decl::new(names::AND, binary.clone()),
            Decl::new(names::IFF, binary),
            Decl::new(names::EQ, relation.clone()),
            Decl::new(names::NE, relation),
        ];
        for decl in prelude {
            env.order.push_back(decl.name.clone());
            env.decls.insert(decl.name.clone(), Arc::new(decl));
        }
        env
    }

    /// Parse commands from a string and add them to the environment.
    ///
    /// Commands are added one by one; on error,
    /// the commands preceding the erroneous one remain added.
    pub fn load(&mut self, s: &str) -> Result<(), crate::Error> {
        for cmd in simpnf_parse::CmdIter::new(s) {
            match cmd?.scope(self)? {
                Command::Intro(decl) => self.insert(decl)?,
                Command::Rules(rules) => {
                    for rule in rules {
                        self.add_rule(rule)?
                    }
                }
            }
        }
        Ok(())
    }

    /// Introduce a new name.
    pub fn insert(&mut self, decl: Decl) -> Result<(), Error> {
        if self.decls.contains_key(&decl.name) {
            return Err(Error::Reintroduction(decl.name));
        }
        debug!("introduce {}", decl.name);
        self.order.push_back(decl.name.clone());
        self.decls.insert(decl.name.clone(), Arc::new(decl));
        Ok(())
    }

    /// Add a rewrite rule to an existing definition.
    pub fn add_rule(&mut self, rule: Rule) -> Result<(), Error> {
        let head = &rule.lhs.symbol;
        match self.lookup(head) {
            Some(decl) if decl.is_definition() => (),
            _ => return Err(Error::NonRewritable(head.clone())),
        }
        debug!("add rule {}", rule);
        let head = head.clone();
        let mut rules = self.rules.get(&head).cloned().unwrap_or_default();
        Arc::make_mut(&mut rules).push(rule);
        self.rules.insert(head, rules);
        Ok(())
    }

    pub fn lookup(&self, name: &Symbol) -> Option<&Decl> {
        self.decls.get(name).map(|d| &**d)
    }

    /// Return true if the name is a simplification rule, i.e.
    /// a declaration or theorem tagged with `simp` or `pre`.
    pub fn is_tagged_rule(&self, name: &Symbol) -> bool {
        self.lookup(name)
            .map_or(false, |d| d.attrs.simp.is_some() && !d.is_definition())
    }

    /// Body of a definition.
    pub fn value_of(&self, name: &Symbol) -> Option<&Term> {
        self.lookup(name).filter(|d| d.is_definition())?.intro.value()
    }

    /// Definitional rewrite rules of a symbol, in the order they were added.
    pub fn rules_of(&self, name: &Symbol) -> &[Rule] {
        self.rules.get(name).map_or(&[], |rules| &rules[..])
    }

    /// Declarations in the order they were introduced.
    pub fn decls(&self) -> impl Iterator<Item = &Decl> {
        self.order.iter().filter_map(move |name| self.lookup(name))
    }

    /// Declarations tagged with `instance`, in the order they were introduced.
    pub fn instances(&self) -> impl Iterator<Item = &Decl> {
        self.decls().filter(|d| d.attrs.instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error as CError;

    #[test]
    fn reintroduction() {
        let mut env = Env::new();
        let err = env.load("nat : Type. nat : Type.");
        assert!(matches!(err, Err(CError::Env(Error::Reintroduction(_)))));
        let err = env.load("eq : Type.");
        assert!(matches!(err, Err(CError::Env(Error::Reintroduction(_)))));
    }

    #[test]
    fn rules_need_definition() {
        let mut env = Env::new();
        env.load("nat : Type. zero : nat. f : nat -> nat. def g : nat -> nat.")
            .unwrap();
        let err = env.load("[x] f x --> zero.");
        assert!(matches!(err, Err(CError::Env(Error::NonRewritable(_)))));
        env.load("[x] g x --> zero. [] g zero --> zero.").unwrap();
        assert_eq!(env.rules_of(&Symbol::new("g")).len(), 2);
    }

    #[test]
    fn attributes() {
        let mut env = Env::new();
        let err = env.load("@[simpp] t : Prop.");
        let unknown = ScopeError::UnknownAttribute("simpp".into());
        assert!(matches!(err, Err(CError::Scope(e)) if e == unknown));

        env.load("@[simp, pre] p : Prop. @[reducible, simp] def q := true.")
            .unwrap();
        let p = env.lookup(&Symbol::new("p")).unwrap();
        assert_eq!(p.attrs.simp, Some(Phase::Pre));
        // definitions are unfolded, not used as rules
        assert!(!env.is_tagged_rule(&Symbol::new("q")));
        assert!(env.value_of(&Symbol::new("q")).is_some());
    }

    #[test]
    fn params() {
        let mut env = Env::new();
        env.load("nat : Type. thm t (x : nat) : eq nat x x := x.").unwrap();
        let t = env.lookup(&Symbol::new("t")).unwrap();
        let ty = t.ty().unwrap().to_string();
        assert_eq!(ty, "(Π x : nat. (eq nat β0 β0))");
        let order: Vec<_> = env.decls().map(|d| d.name.to_string()).collect();
        assert_eq!(order.last().map(|s| s.as_str()), Some("t"));
    }
}
