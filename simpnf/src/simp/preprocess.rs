//! Conversion of rule statements to equations.

use crate::kernel::{Kernel, Transparency};
use crate::symbol::names;
use crate::{Error, Symbol, Term};
use alloc::vec::Vec;

/// Whether rewriting with an equation may need reducible unfolding
/// to be recognised as a rewrite.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Reduction {
    /// the statement was an equation or an equivalence
    Reducing,
    /// the statement was turned into an equation with `true` or `false`
    Preserving,
}

impl Reduction {
    /// Transparency used when comparing both sides of the equation.
    pub fn transparency(self) -> Transparency {
        match self {
            Self::Reducing => Transparency::Reducible,
            Self::Preserving => Transparency::None,
        }
    }
}

/// Equation derived from a rule statement.
#[derive(Clone, Debug)]
pub struct Equation {
    pub lhs: Term,
    pub rhs: Term,
    /// proof of `eq _ lhs rhs`, built from the proof of the statement
    pub proof: Term,
    pub reduction: Reduction,
}

/// Shape of a statement.
enum Shape {
    Eq(Term, Term),
    Iff(Term, Term),
    And(Term, Term),
    Not(Term),
    /// the arguments of `ne`
    Ne(Vec<Term>),
    /// any other proposition headed by a constant or a variable
    Pred,
}

impl Shape {
    fn of(stmt: &Term) -> Option<Self> {
        let two = |args: &[Term]| (args[0].clone(), args[1].clone());
        if let Some(args) = stmt.app_of(names::EQ, 3) {
            return Some(Self::Eq(args[1].clone(), args[2].clone()));
        }
        if let Some(args) = stmt.app_of(names::IFF, 2) {
            let (p, q) = two(args);
            return Some(Self::Iff(p, q));
        }
        if let Some(args) = stmt.app_of(names::AND, 2) {
            let (p, q) = two(args);
            return Some(Self::And(p, q));
        }
        if let Some(args) = stmt.app_of(names::NOT, 1) {
            return Some(Self::Not(args[0].clone()));
        }
        if let Some(args) = stmt.app_of(names::NE, 3) {
            return Some(Self::Ne(args.to_vec()));
        }
        match stmt.get_app().0 {
            Term::Const(_) | Term::FVar(_) => Some(Self::Pred),
            _ => None,
        }
    }
}

fn app(name: &str, args: Vec<Term>) -> Term {
    Term::constant(name).apply(args)
}

/// Turn the statement of a rule into equations.
///
/// The statement must not start with products.
/// `subject` is a proof of the statement, from which
/// the proofs of the equations are built.
/// Reducible definitions at the head of the statement are unfolded
/// if the statement does not have any other known shape.
pub fn preprocess(kernel: &Kernel, name: &Symbol, stmt: &Term, subject: Term) -> Result<Vec<Equation>, Error> {
    let mut eqs = Vec::new();
    preprocess_into(kernel, name, stmt.clone(), subject, &mut eqs)?;
    Ok(eqs)
}

fn preprocess_into(kernel: &Kernel, name: &Symbol, stmt: Term, subject: Term, eqs: &mut Vec<Equation>) -> Result<(), Error> {
    use Reduction::{Preserving, Reducing};
    let mut push = |lhs, rhs, proof, reduction| {
        eqs.push(Equation {
            lhs,
            rhs,
            proof,
            reduction,
        })
    };
    match Shape::of(&stmt) {
        Some(Shape::Eq(a, b)) => push(a, b, subject, Reducing),
        Some(Shape::Iff(p, q)) => push(p, q, app(names::PROPEXT, Vec::from([subject])), Reducing),
        Some(Shape::Not(p)) => {
            let proof = app(names::EQ_FALSE, Vec::from([subject]));
            push(p, Term::constant(names::FALSE), proof, Preserving)
        }
        Some(Shape::Ne(args)) => {
            let proof = app(names::EQ_FALSE, Vec::from([subject]));
            push(app(names::EQ, args), Term::constant(names::FALSE), proof, Preserving)
        }
        Some(Shape::And(p, q)) => {
            let left = app(names::AND_LEFT, Vec::from([subject.clone()]));
            let right = app(names::AND_RIGHT, Vec::from([subject]));
            preprocess_into(kernel, name, p, left, eqs)?;
            preprocess_into(kernel, name, q, right, eqs)?;
        }
        shape => {
            kernel.tick()?;
            match kernel.whnf_step(&stmt, Transparency::Reducible)? {
                Some(unfolded) => preprocess_into(kernel, name, unfolded, subject, eqs)?,
                None if shape.is_some() => {
                    let proof = app(names::EQ_TRUE, Vec::from([subject]));
                    push(stmt, Term::constant(names::TRUE), proof, Preserving)
                }
                None => return Err(Error::NotAnEquation(name.clone())),
            }
        }
    }
    Ok(())
}
