use printer::theme::ThemeExt;
use printer::tokens::{FALSE, TRUE};
use printer::{Alloc, Builder, Print, PrintCfg};

use crate::{Expr, ExprNode, ExprType};

/// A `bool` or `int64_t` constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Literal {
    Bool(bool),
    Int64(i64),
}

impl From<Literal> for Expr {
    fn from(val: Literal) -> Self {
        Expr::Literal(val)
    }
}

impl ExprNode for Literal {
    fn expr_type(&self) -> ExprType {
        match self {
            Literal::Bool(_) => ExprType::Bool,
            Literal::Int64(_) => ExprType::Int64,
        }
    }

    fn subexprs(&self) -> Vec<&Expr> {
        vec![]
    }

    fn same_head(&self, other: &Self) -> bool {
        self == other
    }

    fn map_subexprs<F: FnMut(&Expr) -> Expr>(&self, _f: &mut F) -> Self {
        *self
    }

    fn with_subexprs(&self, subexprs: Vec<Expr>) -> Option<Self> {
        subexprs.is_empty().then_some(*self)
    }
}

impl Print for Literal {
    fn print<'a>(&'a self, _cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        match self {
            Literal::Bool(true) => alloc.literal(TRUE.to_owned()),
            Literal::Bool(false) => alloc.literal(FALSE.to_owned()),
            Literal::Int64(n) => alloc.literal(n.to_string()),
        }
    }
}
