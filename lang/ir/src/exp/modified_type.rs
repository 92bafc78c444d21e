use pretty::DocAllocator;
use printer::theme::ThemeExt;
use printer::tokens::{AMPERSAND, BRACKETS, CONST, DOUBLE_AMPERSAND, STAR};
use printer::{Alloc, Builder, Precedence, Print, PrintCfg};

use crate::traits::exactly;
use crate::{Expr, ExprNode, ExprType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeModifier {
    Pointer,
    Reference,
    RvalueReference,
    Const,
    Array,
}

/// A type built from another type by a declarator or a cv-qualifier.
/// Examples: `int*`, `T&&`, `float const`, `char[]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModifiedType {
    pub modifier: TypeModifier,
    pub type_expr: Box<Expr>,
}

impl ModifiedType {
    pub fn new(modifier: TypeModifier, type_expr: Expr) -> Self {
        Self { modifier, type_expr: Box::new(type_expr) }
    }

    pub fn pointer(type_expr: Expr) -> Self {
        Self::new(TypeModifier::Pointer, type_expr)
    }

    pub fn reference(type_expr: Expr) -> Self {
        Self::new(TypeModifier::Reference, type_expr)
    }

    pub fn rvalue_reference(type_expr: Expr) -> Self {
        Self::new(TypeModifier::RvalueReference, type_expr)
    }

    pub fn constant(type_expr: Expr) -> Self {
        Self::new(TypeModifier::Const, type_expr)
    }

    pub fn array(type_expr: Expr) -> Self {
        Self::new(TypeModifier::Array, type_expr)
    }
}

impl From<ModifiedType> for Expr {
    fn from(val: ModifiedType) -> Self {
        Expr::ModifiedType(val)
    }
}

impl ExprNode for ModifiedType {
    fn expr_type(&self) -> ExprType {
        ExprType::Type
    }

    fn subexprs(&self) -> Vec<&Expr> {
        vec![self.type_expr.as_ref()]
    }

    fn same_head(&self, other: &Self) -> bool {
        self.modifier == other.modifier
    }

    fn map_subexprs<F: FnMut(&Expr) -> Expr>(&self, f: &mut F) -> Self {
        Self::new(self.modifier, f(self.type_expr.as_ref()))
    }

    fn with_subexprs(&self, subexprs: Vec<Expr>) -> Option<Self> {
        let [type_expr] = exactly::<1>(subexprs)?;
        Some(Self { modifier: self.modifier, type_expr })
    }
}

impl Print for ModifiedType {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        _prec: Precedence,
    ) -> Builder<'a> {
        let inner = self.type_expr.print(cfg, alloc);
        match self.modifier {
            TypeModifier::Pointer => inner.append(STAR),
            TypeModifier::Reference => inner.append(AMPERSAND),
            TypeModifier::RvalueReference => inner.append(DOUBLE_AMPERSAND),
            TypeModifier::Const => inner.append(alloc.space()).append(alloc.keyword(CONST)),
            TypeModifier::Array => inner.append(BRACKETS),
        }
    }
}
