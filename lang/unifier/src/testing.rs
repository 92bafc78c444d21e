//! A minimal term language for testing the engine: named nodes with arguments.

use std::collections::BTreeSet;

use crate::{
    Binding, CanonicalizationStrategy, Solution, Term, UnificationStrategy, Var, term_to_string,
    terms_to_string,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sym {
    pub name: String,
    pub args: Vec<Term<Sym>>,
}

#[derive(Debug, Default)]
pub struct SymStrategy {
    /// Names of nodes whose equality is not syntactic
    non_syntactic: BTreeSet<String>,
    /// Variables that may not be bound
    forbidden: BTreeSet<Var>,
    /// Variables that stand for packs
    packs: BTreeSet<Var>,
}

impl SymStrategy {
    pub fn with_non_syntactic(names: &[&str]) -> Self {
        Self { non_syntactic: names.iter().map(|name| name.to_string()).collect(), ..Default::default() }
    }

    pub fn with_forbidden(vars: &[&str]) -> Self {
        Self { forbidden: vars.iter().map(|var| Var::from(*var)).collect(), ..Default::default() }
    }

    pub fn packs(mut self, vars: &[&str]) -> Self {
        self.packs = vars.iter().map(|var| Var::from(*var)).collect();
        self
    }
}

impl UnificationStrategy<Sym> for SymStrategy {
    fn is_same_term_excluding_args(&self, lhs: &Sym, rhs: &Sym) -> bool {
        lhs.name == rhs.name
    }

    fn term_args(&self, term: &Sym) -> Vec<Term<Sym>> {
        term.args.clone()
    }

    fn term_to_string(&self, term: &Sym) -> String {
        if term.args.is_empty() {
            return term.name.clone();
        }
        let args: Vec<_> = term.args.iter().map(|arg| term_to_string(self, arg)).collect();
        format!("{}({})", term.name, args.join(", "))
    }

    fn equality_requires_syntactic_equality(&self, term: &Sym) -> bool {
        !self.non_syntactic.contains(&term.name)
    }

    fn may_be_equal(&self, _lhs: &Sym, _rhs: &Sym) -> bool {
        true
    }
}

impl CanonicalizationStrategy<Sym> for SymStrategy {
    fn term_with_args(&self, term: &Sym, args: Vec<Term<Sym>>) -> Option<Sym> {
        Some(Sym { name: term.name.clone(), args })
    }

    fn can_var_be_on_lhs(&self, var: &Var) -> bool {
        !self.forbidden.contains(var)
    }

    fn is_pack_var(&self, var: &Var) -> bool {
        self.packs.contains(var)
    }
}

pub fn var(name: &str) -> Term<Sym> {
    Term::var(name)
}

pub fn expanded(name: &str) -> Term<Sym> {
    Term::expansion(Term::var(name))
}

pub fn leaf(name: &str) -> Term<Sym> {
    node(name, vec![])
}

pub fn node(name: &str, args: Vec<Term<Sym>>) -> Term<Sym> {
    Term::Node(Sym { name: name.to_owned(), args })
}

pub fn show_scalars(solution: &Solution<Sym>) -> Vec<String> {
    let strategy = SymStrategy::default();
    solution
        .scalars
        .iter()
        .map(|(var, value)| format!("{var} := {}", term_to_string(&strategy, value)))
        .collect()
}

pub fn show_packs(solution: &Solution<Sym>) -> Vec<String> {
    let strategy = SymStrategy::default();
    solution
        .packs
        .iter()
        .map(|(var, values)| format!("{var}... := {}", terms_to_string(&strategy, values)))
        .collect()
}

/// Render bindings sorted by variable name.
pub fn show_bindings(bindings: &[Binding<Sym>]) -> Vec<String> {
    let strategy = SymStrategy::default();
    let mut out: Vec<_> = bindings
        .iter()
        .map(|binding| match binding {
            Binding::Scalar { var, value } => format!("{var} := {}", term_to_string(&strategy, value)),
            Binding::Pack { var, values } => {
                format!("{var}... := {}", terms_to_string(&strategy, values))
            }
        })
        .collect();
    out.sort();
    out
}
