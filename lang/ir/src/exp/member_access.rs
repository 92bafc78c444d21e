use pretty::DocAllocator;
use printer::theme::ThemeExt;
use printer::tokens::{SCOPE, TEMPLATE, TYPENAME};
use printer::{Alloc, Builder, Print, PrintCfg};

use crate::traits::exactly;
use crate::{Expr, ExprNode, ExprType};

/// Access to a member of a class.
/// Example: `typename F<T>::type`
///
/// The value of a member access depends on which specialization of the class gets
/// selected, so two member accesses can be equal even if they look different.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassMemberAccess {
    pub inner: Box<Expr>,
    pub member_name: String,
    pub expr_type: ExprType,
}

impl ClassMemberAccess {
    pub fn new(inner: Expr, member_name: &str, expr_type: ExprType) -> Self {
        Self { inner: Box::new(inner), member_name: member_name.to_owned(), expr_type }
    }
}

impl From<ClassMemberAccess> for Expr {
    fn from(val: ClassMemberAccess) -> Self {
        Expr::ClassMemberAccess(val)
    }
}

impl ExprNode for ClassMemberAccess {
    fn expr_type(&self) -> ExprType {
        self.expr_type.clone()
    }

    fn subexprs(&self) -> Vec<&Expr> {
        vec![self.inner.as_ref()]
    }

    fn same_head(&self, other: &Self) -> bool {
        self.member_name == other.member_name
    }

    fn map_subexprs<F: FnMut(&Expr) -> Expr>(&self, f: &mut F) -> Self {
        Self {
            inner: Box::new(f(self.inner.as_ref())),
            member_name: self.member_name.clone(),
            expr_type: self.expr_type.clone(),
        }
    }

    fn with_subexprs(&self, subexprs: Vec<Expr>) -> Option<Self> {
        let [inner] = exactly::<1>(subexprs)?;
        Some(Self { inner, member_name: self.member_name.clone(), expr_type: self.expr_type.clone() })
    }
}

impl Print for ClassMemberAccess {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let access = self.inner.print(cfg, alloc).append(SCOPE);
        match &self.expr_type {
            ExprType::Type if cfg.print_typename => alloc
                .keyword(TYPENAME)
                .append(alloc.space())
                .append(access)
                .append(self.member_name.as_str()),
            ExprType::Template(_) => access
                .append(alloc.keyword(TEMPLATE))
                .append(alloc.space())
                .append(self.member_name.as_str()),
            _ => access.append(self.member_name.as_str()),
        }
    }
}
