use printer::theme::ThemeExt;
use printer::{Alloc, Builder, Print, PrintCfg};

use crate::{Expr, ExprNode, ExprType, TemplateArgType};

/// A named C++ entity: a type, a template, or a constant.
///
/// Local literals are template parameters or local definitions of the template that
/// is currently being compiled; they are the only things that can be renamed and the
/// only things that can act as unification variables. Nonlocal literals refer to
/// builtin types (`int`), library templates (`std::vector`) or other toplevel
/// templates of the program.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AtomicTypeLiteral {
    /// The C++ spelling of the entity
    pub cpp_type: String,
    pub expr_type: ExprType,
    pub is_local: bool,
    pub is_metafunction_that_may_return_error: bool,
    /// Whether the name may be a `using` alias for some other type, in which case two
    /// literals with different names may still denote the same type.
    pub may_be_alias: bool,
    /// Whether the literal is a parameter pack
    pub is_variadic: bool,
}

impl AtomicTypeLiteral {
    pub fn for_local(cpp_type: &str, expr_type: ExprType, is_variadic: bool) -> Self {
        Self {
            cpp_type: cpp_type.to_owned(),
            is_metafunction_that_may_return_error: expr_type.is_template(),
            expr_type,
            is_local: true,
            may_be_alias: true,
            is_variadic,
        }
    }

    pub fn for_nonlocal(
        cpp_type: &str,
        expr_type: ExprType,
        is_metafunction_that_may_return_error: bool,
        may_be_alias: bool,
    ) -> Self {
        Self {
            cpp_type: cpp_type.to_owned(),
            expr_type,
            is_local: false,
            is_metafunction_that_may_return_error,
            may_be_alias,
            is_variadic: false,
        }
    }

    pub fn for_nonlocal_type(cpp_type: &str, may_be_alias: bool) -> Self {
        Self::for_nonlocal(cpp_type, ExprType::Type, false, may_be_alias)
    }

    pub fn for_nonlocal_template(
        cpp_type: &str,
        args: Vec<TemplateArgType>,
        is_metafunction_that_may_return_error: bool,
        may_be_alias: bool,
    ) -> Self {
        Self::for_nonlocal(
            cpp_type,
            ExprType::Template(args),
            is_metafunction_that_may_return_error,
            may_be_alias,
        )
    }
}

impl From<AtomicTypeLiteral> for Expr {
    fn from(val: AtomicTypeLiteral) -> Self {
        Expr::AtomicTypeLiteral(val)
    }
}

impl ExprNode for AtomicTypeLiteral {
    fn expr_type(&self) -> ExprType {
        self.expr_type.clone()
    }

    fn subexprs(&self) -> Vec<&Expr> {
        vec![]
    }

    fn same_head(&self, other: &Self) -> bool {
        self.cpp_type == other.cpp_type && self.is_local == other.is_local
    }

    fn map_subexprs<F: FnMut(&Expr) -> Expr>(&self, _f: &mut F) -> Self {
        self.clone()
    }

    fn with_subexprs(&self, subexprs: Vec<Expr>) -> Option<Self> {
        subexprs.is_empty().then(|| self.clone())
    }
}

impl Print for AtomicTypeLiteral {
    fn print<'a>(&'a self, _cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        if self.is_local { alloc.var(&self.cpp_type) } else { alloc.typ(&self.cpp_type) }
    }
}
