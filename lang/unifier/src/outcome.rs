use std::collections::BTreeMap;

use miette::Diagnostic;
use thiserror::Error;

use crate::result::{CanonicalizationError, UnifyError};
use crate::{CanonicalizationStrategy, Eqn, Term, Var, canonicalize, unify};

/// A variable binding in canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding<T> {
    Scalar { var: Var, value: Term<T> },
    /// `var...` stands for `values`.
    Pack { var: Var, values: Vec<Term<T>> },
}

impl<T> Binding<T> {
    pub fn var(&self) -> &Var {
        match self {
            Binding::Scalar { var, .. } | Binding::Pack { var, .. } => var,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OutcomeKind {
    Certain,
    Possible,
    Impossible,
}

/// Whether two things are equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<B> {
    /// They are equal under the given bindings, and only under those.
    Certain(B),
    /// They may or may not be equal.
    Possible,
    /// They are never equal.
    Impossible,
}

impl<B> Outcome<B> {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Outcome::Certain(_) => OutcomeKind::Certain,
            Outcome::Possible => OutcomeKind::Possible,
            Outcome::Impossible => OutcomeKind::Impossible,
        }
    }

    pub fn map<C, F: FnOnce(B) -> C>(self, f: F) -> Outcome<C> {
        match self {
            Outcome::Certain(bindings) => Outcome::Certain(f(bindings)),
            Outcome::Possible => Outcome::Possible,
            Outcome::Impossible => Outcome::Impossible,
        }
    }

    pub fn certain(self) -> Option<B> {
        match self {
            Outcome::Certain(bindings) => Some(bindings),
            _ => None,
        }
    }

    pub fn is_certain(&self) -> bool {
        matches!(self, Outcome::Certain(_))
    }
}

impl<B, E: Into<SolveError>> From<Result<B, E>> for Outcome<B> {
    fn from(result: Result<B, E>) -> Self {
        match result {
            Ok(bindings) => Outcome::Certain(bindings),
            Err(err) => match err.into().outcome_kind() {
                OutcomeKind::Impossible => Outcome::Impossible,
                _ => Outcome::Possible,
            },
        }
    }
}

#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Unify(#[from] UnifyError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Canonicalize(#[from] CanonicalizationError),
}

impl SolveError {
    /// The outcome this error stands for: only a failed unification proves that the
    /// equations can not hold.
    pub fn outcome_kind(&self) -> OutcomeKind {
        match self {
            SolveError::Unify(UnifyError::Failed { .. }) => OutcomeKind::Impossible,
            SolveError::Unify(UnifyError::Ambiguous { .. }) | SolveError::Canonicalize(_) => {
                OutcomeKind::Possible
            }
        }
    }
}

/// [unify] the equations and [canonicalize] the solution.
pub fn solve<T: Clone, S: CanonicalizationStrategy<T>>(
    eqns: Vec<Eqn<T>>,
    context: &BTreeMap<Var, Term<T>>,
    strategy: &S,
) -> Result<Vec<Binding<T>>, SolveError> {
    let solution = unify(eqns, context, strategy)?;
    Ok(canonicalize(solution, strategy)?)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testing::*;

    fn outcome(eqns: Vec<Eqn<Sym>>, strategy: &SymStrategy) -> Outcome<Vec<String>> {
        Outcome::from(solve(eqns, &BTreeMap::new(), strategy)).map(|bindings| show_bindings(&bindings))
    }

    #[test]
    fn certain_with_bindings() {
        let strategy = SymStrategy::with_forbidden(&["a"]);
        let eqns = vec![Eqn::single(node("f", vec![var("a"), leaf("b")]), node("f", vec![leaf("c"), var("x")]))];
        // `a` may not be bound, so a := c can not be part of the canonical solution.
        assert_eq!(outcome(eqns, &strategy), Outcome::Possible);

        let strategy = SymStrategy::default();
        let eqns = vec![Eqn::single(node("f", vec![var("a"), leaf("b")]), node("f", vec![leaf("c"), var("x")]))];
        assert_eq!(outcome(eqns, &strategy), Outcome::Certain(vec!["a := c".to_owned(), "x := b".to_owned()]));
    }

    #[test]
    fn failure_is_impossible() {
        let eqns = vec![Eqn::single(leaf("a"), leaf("b"))];
        assert_eq!(outcome(eqns, &SymStrategy::default()), Outcome::Impossible);
    }

    #[test]
    fn ambiguity_is_possible() {
        let strategy = SymStrategy::with_non_syntactic(&["plus"]);
        let eqns = vec![Eqn::single(node("plus", vec![leaf("a")]), leaf("b"))];
        assert_eq!(outcome(eqns, &strategy), Outcome::Possible);
    }

    #[test]
    fn kinds() {
        assert_eq!(Outcome::Certain(()).kind(), OutcomeKind::Certain);
        assert_eq!(Outcome::<()>::Possible.kind(), OutcomeKind::Possible);
        assert_eq!(Outcome::<()>::Impossible.certain(), None);
    }
}
