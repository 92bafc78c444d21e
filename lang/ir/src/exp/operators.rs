use pretty::DocAllocator;
use printer::tokens::{BANG, MINUS};
use printer::util::ParensIfExt;
use printer::{Alloc, Builder, Precedence, Print, PrintCfg};

use crate::traits::exactly;
use crate::{Expr, ExprNode, ExprType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    // Comparisons
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Int64 arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Bool connectives
    And,
    Or,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }

    pub fn result_type(self) -> ExprType {
        match self {
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod => ExprType::Int64,
            _ => ExprType::Bool,
        }
    }

    /// C++ operator precedence, higher binds tighter.
    fn precedence(self) -> Precedence {
        match self {
            BinOp::Or => 1,
            BinOp::And => 2,
            BinOp::Eq | BinOp::Ne => 3,
            BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => 4,
            BinOp::Add | BinOp::Sub => 5,
            BinOp::Mul | BinOp::Div | BinOp::Mod => 6,
        }
    }
}

const UNARY_PRECEDENCE: Precedence = 7;

/// A comparison, an int64 arithmetic operation or a boolean connective.
/// Example: `N + 1`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BinaryOp {
    pub op: BinOp,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
}

impl BinaryOp {
    pub fn new(op: BinOp, lhs: Expr, rhs: Expr) -> Self {
        Self { op, lhs: Box::new(lhs), rhs: Box::new(rhs) }
    }
}

impl From<BinaryOp> for Expr {
    fn from(val: BinaryOp) -> Self {
        Expr::BinaryOp(val)
    }
}

impl ExprNode for BinaryOp {
    fn expr_type(&self) -> ExprType {
        self.op.result_type()
    }

    fn subexprs(&self) -> Vec<&Expr> {
        vec![self.lhs.as_ref(), self.rhs.as_ref()]
    }

    fn same_head(&self, other: &Self) -> bool {
        self.op == other.op
    }

    fn map_subexprs<F: FnMut(&Expr) -> Expr>(&self, f: &mut F) -> Self {
        let lhs = f(self.lhs.as_ref());
        let rhs = f(self.rhs.as_ref());
        Self::new(self.op, lhs, rhs)
    }

    fn with_subexprs(&self, subexprs: Vec<Expr>) -> Option<Self> {
        let [lhs, rhs] = exactly::<2>(subexprs)?;
        Some(Self { op: self.op, lhs, rhs })
    }
}

impl Print for BinaryOp {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        prec: Precedence,
    ) -> Builder<'a> {
        let own = self.op.precedence();
        // Operators are left associative.
        self.lhs
            .print_prec(cfg, alloc, own)
            .append(alloc.space())
            .append(self.op.symbol())
            .append(alloc.space())
            .append(self.rhs.print_prec(cfg, alloc, own + 1))
            .parens_if(prec > own)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnOp {
    Not,
    Minus,
}

/// Boolean negation or int64 negation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnaryOp {
    pub op: UnOp,
    pub inner: Box<Expr>,
}

impl UnaryOp {
    pub fn new(op: UnOp, inner: Expr) -> Self {
        Self { op, inner: Box::new(inner) }
    }
}

impl From<UnaryOp> for Expr {
    fn from(val: UnaryOp) -> Self {
        Expr::UnaryOp(val)
    }
}

impl ExprNode for UnaryOp {
    fn expr_type(&self) -> ExprType {
        match self.op {
            UnOp::Not => ExprType::Bool,
            UnOp::Minus => ExprType::Int64,
        }
    }

    fn subexprs(&self) -> Vec<&Expr> {
        vec![self.inner.as_ref()]
    }

    fn same_head(&self, other: &Self) -> bool {
        self.op == other.op
    }

    fn map_subexprs<F: FnMut(&Expr) -> Expr>(&self, f: &mut F) -> Self {
        Self::new(self.op, f(self.inner.as_ref()))
    }

    fn with_subexprs(&self, subexprs: Vec<Expr>) -> Option<Self> {
        let [inner] = exactly::<1>(subexprs)?;
        Some(Self { op: self.op, inner })
    }
}

impl Print for UnaryOp {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        prec: Precedence,
    ) -> Builder<'a> {
        let symbol = match self.op {
            UnOp::Not => BANG,
            UnOp::Minus => MINUS,
        };
        alloc
            .text(symbol)
            .append(self.inner.print_prec(cfg, alloc, UNARY_PRECEDENCE))
            .parens_if(prec > UNARY_PRECEDENCE)
    }
}
