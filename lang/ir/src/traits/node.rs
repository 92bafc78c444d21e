use crate::{Expr, ExprType};

/// Structural operations shared by every kind of IR0 expression.
///
/// Matching and substitution only ever look at one node at a time through this
/// trait: they compare heads with [ExprNode::same_head] and recurse into
/// [ExprNode::subexprs].
pub trait ExprNode: Sized {
    /// The kind of value the expression evaluates to.
    fn expr_type(&self) -> ExprType;

    /// The immediate children of the node, in a fixed order.
    fn subexprs(&self) -> Vec<&Expr>;

    /// Whether `self` and `other` agree on everything except their children.
    ///
    /// Metadata that does not change the meaning of the expression (alias flags,
    /// the static-assert flag of template instantiations, ...) is ignored.
    fn same_head(&self, other: &Self) -> bool;

    /// Rebuild the node with every child replaced by `f(child)`.
    fn map_subexprs<F: FnMut(&Expr) -> Expr>(&self, f: &mut F) -> Self;

    /// Rebuild the node with the given children.
    ///
    /// Returns `None` if this kind of node cannot have that many children.
    fn with_subexprs(&self, subexprs: Vec<Expr>) -> Option<Self>;
}

/// Split off exactly `N` children.
pub(crate) fn exactly<const N: usize>(subexprs: Vec<Expr>) -> Option<[Box<Expr>; N]> {
    let boxed: Vec<Box<Expr>> = subexprs.into_iter().map(Box::new).collect();
    boxed.try_into().ok()
}
