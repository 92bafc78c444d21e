use pretty::DocAllocator;
use printer::util::comma_list;
use printer::{Alloc, Builder, Print, PrintCfg};

use crate::{Expr, ExprNode, ExprType};

/// A function type.
/// Example: `int (float, Ts...)`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionType {
    pub return_type_expr: Box<Expr>,
    pub arg_exprs: Vec<Expr>,
}

impl FunctionType {
    pub fn new(return_type_expr: Expr, arg_exprs: Vec<Expr>) -> Self {
        Self { return_type_expr: Box::new(return_type_expr), arg_exprs }
    }
}

impl From<FunctionType> for Expr {
    fn from(val: FunctionType) -> Self {
        Expr::FunctionType(val)
    }
}

impl ExprNode for FunctionType {
    fn expr_type(&self) -> ExprType {
        ExprType::Type
    }

    fn subexprs(&self) -> Vec<&Expr> {
        std::iter::once(self.return_type_expr.as_ref()).chain(self.arg_exprs.iter()).collect()
    }

    fn same_head(&self, _other: &Self) -> bool {
        true
    }

    fn map_subexprs<F: FnMut(&Expr) -> Expr>(&self, f: &mut F) -> Self {
        let return_type_expr = f(self.return_type_expr.as_ref());
        Self::new(return_type_expr, self.arg_exprs.iter().map(f).collect())
    }

    fn with_subexprs(&self, subexprs: Vec<Expr>) -> Option<Self> {
        let mut subexprs = subexprs.into_iter();
        let return_type_expr = subexprs.next()?;
        Some(Self::new(return_type_expr, subexprs.collect()))
    }
}

impl Print for FunctionType {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let args = comma_list(alloc, self.arg_exprs.iter().map(|arg| arg.print(cfg, alloc)));
        self.return_type_expr.print(cfg, alloc).append(alloc.space()).append(args.parens())
    }
}
