use printer::tokens::ELLIPSIS;
use printer::{Alloc, Builder, Precedence, Print, PrintCfg};

use crate::traits::exactly;
use crate::{Expr, ExprNode, ExprType};

/// A pack expansion.
/// Example: `std::vector<Ts>...`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariadicTypeExpansion {
    pub inner: Box<Expr>,
}

impl VariadicTypeExpansion {
    pub fn new(inner: Expr) -> Self {
        Self { inner: Box::new(inner) }
    }
}

impl From<VariadicTypeExpansion> for Expr {
    fn from(val: VariadicTypeExpansion) -> Self {
        Expr::VariadicTypeExpansion(val)
    }
}

impl ExprNode for VariadicTypeExpansion {
    fn expr_type(&self) -> ExprType {
        self.inner.expr_type()
    }

    fn subexprs(&self) -> Vec<&Expr> {
        vec![self.inner.as_ref()]
    }

    fn same_head(&self, _other: &Self) -> bool {
        true
    }

    fn map_subexprs<F: FnMut(&Expr) -> Expr>(&self, f: &mut F) -> Self {
        Self::new(f(self.inner.as_ref()))
    }

    fn with_subexprs(&self, subexprs: Vec<Expr>) -> Option<Self> {
        let [inner] = exactly::<1>(subexprs)?;
        Some(Self { inner })
    }
}

impl Print for VariadicTypeExpansion {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        _prec: Precedence,
    ) -> Builder<'a> {
        self.inner.print(cfg, alloc).append(ELLIPSIS)
    }
}
