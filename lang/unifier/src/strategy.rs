use crate::{Term, Var};

/// Everything the unification engine needs to know about compound terms.
pub trait UnificationStrategy<T> {
    /// Whether the two nodes agree on everything except their arguments.
    fn is_same_term_excluding_args(&self, lhs: &T, rhs: &T) -> bool;

    /// The arguments of the node, in a fixed order. Arguments that are variables or
    /// pack expansions must be returned as [Term::Var] and [Term::Expansion].
    fn term_args(&self, term: &T) -> Vec<Term<T>>;

    fn term_to_string(&self, term: &T) -> String;

    /// Whether two such nodes can only be equal if they are syntactically equal.
    ///
    /// This is false for nodes that are evaluated (e.g. `N + 1`, `typename F<T>::type`),
    /// where two different-looking nodes may well denote the same value.
    fn equality_requires_syntactic_equality(&self, term: &T) -> bool;

    /// For two nodes with different heads of which at least one does not require
    /// syntactic equality: whether they might still be equal.
    fn may_be_equal(&self, lhs: &T, rhs: &T) -> bool;
}

/// The additional knowledge needed to put a solution into canonical form.
pub trait CanonicalizationStrategy<T>: UnificationStrategy<T> {
    /// Rebuild the node with new arguments.
    ///
    /// Returns `None` if the node can not take the given number of arguments.
    fn term_with_args(&self, term: &T, args: Vec<Term<T>>) -> Option<T>;

    /// Whether the variable may be bound in the final solution.
    fn can_var_be_on_lhs(&self, var: &Var) -> bool;

    /// Whether the variable stands for a parameter pack.
    fn is_pack_var(&self, var: &Var) -> bool;
}
