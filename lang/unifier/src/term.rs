use std::collections::BTreeSet;
use std::fmt;

use crate::UnificationStrategy;

/// A unification variable.
///
/// Variables are ordered by name; whenever the engine has to pick one variable out
/// of several equivalent ones it picks the greatest.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Var(String);

impl Var {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Var(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for Var {
    fn from(name: &str) -> Self {
        Var::new(name)
    }
}

// Term
//
//

/// A term as seen by the unification engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term<T> {
    /// A variable standing for a single term, or, below an expansion, for each
    /// element of a pack.
    Var(Var),
    /// `t...`: stands for zero or more terms, one for each element of the packs
    /// occurring in `t`.
    Expansion(Box<Term<T>>),
    /// A compound (or atomic) term whose structure is only known to the strategy.
    Node(T),
}

impl<T> Term<T> {
    pub fn var<S: Into<String>>(name: S) -> Self {
        Term::Var(Var::new(name))
    }

    pub fn expansion(inner: Term<T>) -> Self {
        Term::Expansion(Box::new(inner))
    }

    pub fn as_var(&self) -> Option<&Var> {
        match self {
            Term::Var(var) => Some(var),
            _ => None,
        }
    }

    /// The variable `x` if the term is `x...`.
    pub fn as_expanded_var(&self) -> Option<&Var> {
        match self {
            Term::Expansion(inner) => inner.as_var(),
            _ => None,
        }
    }

    pub fn is_expansion(&self) -> bool {
        matches!(self, Term::Expansion(_))
    }
}

/// An equation between two term sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eqn<T> {
    pub lhs: Vec<Term<T>>,
    pub rhs: Vec<Term<T>>,
}

impl<T> Eqn<T> {
    pub fn new(lhs: Vec<Term<T>>, rhs: Vec<Term<T>>) -> Self {
        Self { lhs, rhs }
    }

    /// An equation between two single terms.
    pub fn single(lhs: Term<T>, rhs: Term<T>) -> Self {
        Self::new(vec![lhs], vec![rhs])
    }
}

// Helpers that look through nodes
//
//

/// The variables occurring in `term`, including those below expansions.
pub fn free_vars<T, S: UnificationStrategy<T>>(strategy: &S, term: &Term<T>) -> BTreeSet<Var> {
    let mut out = BTreeSet::new();
    collect_free_vars(strategy, term, &mut out);
    out
}

fn collect_free_vars<T, S: UnificationStrategy<T>>(
    strategy: &S,
    term: &Term<T>,
    out: &mut BTreeSet<Var>,
) {
    match term {
        Term::Var(var) => {
            out.insert(var.clone());
        }
        Term::Expansion(inner) => collect_free_vars(strategy, inner, out),
        Term::Node(node) => {
            for arg in strategy.term_args(node) {
                collect_free_vars(strategy, &arg, out);
            }
        }
    }
}

/// Whether the two terms are identical, i.e. equal without knowing anything about the
/// variables.
pub fn syntactically_equal<T, S: UnificationStrategy<T>>(
    strategy: &S,
    lhs: &Term<T>,
    rhs: &Term<T>,
) -> bool {
    match (lhs, rhs) {
        (Term::Var(l), Term::Var(r)) => l == r,
        (Term::Expansion(l), Term::Expansion(r)) => syntactically_equal(strategy, l, r),
        (Term::Node(l), Term::Node(r)) => {
            if !strategy.is_same_term_excluding_args(l, r) {
                return false;
            }
            let l_args = strategy.term_args(l);
            let r_args = strategy.term_args(r);
            l_args.len() == r_args.len()
                && l_args.iter().zip(r_args.iter()).all(|(l, r)| syntactically_equal(strategy, l, r))
        }
        (_, _) => false,
    }
}

pub fn term_to_string<T, S: UnificationStrategy<T>>(strategy: &S, term: &Term<T>) -> String {
    match term {
        Term::Var(var) => var.to_string(),
        Term::Expansion(inner) => match inner.as_ref() {
            Term::Var(var) => format!("{var}..."),
            _ => format!("({})...", term_to_string(strategy, inner)),
        },
        Term::Node(node) => strategy.term_to_string(node),
    }
}

pub fn terms_to_string<T, S: UnificationStrategy<T>>(strategy: &S, terms: &[Term<T>]) -> String {
    let terms: Vec<_> = terms.iter().map(|term| term_to_string(strategy, term)).collect();
    format!("[{}]", terms.join(", "))
}
