use printer::util::comma_list;
use printer::{Alloc, Builder, Print, PrintCfg};

use crate::{Expr, ExprNode, ExprType};

/// A template applied to arguments.
/// Example: `std::pair<T, int>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateInstantiation {
    pub template_expr: Box<Expr>,
    pub args: Vec<Expr>,
    /// Whether instantiating the template might fail a `static_assert`. This is a
    /// property of the instantiation site, not of the type it denotes, so it does not
    /// take part in matching.
    pub instantiation_might_trigger_static_asserts: bool,
}

impl TemplateInstantiation {
    pub fn new(template_expr: Expr, args: Vec<Expr>) -> Self {
        Self {
            template_expr: Box::new(template_expr),
            args,
            instantiation_might_trigger_static_asserts: false,
        }
    }

    /// The name of the instantiated template, if it is a toplevel template.
    pub fn template_name(&self) -> Option<&str> {
        match self.template_expr.as_ref() {
            Expr::AtomicTypeLiteral(lit) if !lit.is_local => Some(&lit.cpp_type),
            _ => None,
        }
    }
}

impl From<TemplateInstantiation> for Expr {
    fn from(val: TemplateInstantiation) -> Self {
        Expr::TemplateInstantiation(val)
    }
}

impl ExprNode for TemplateInstantiation {
    fn expr_type(&self) -> ExprType {
        ExprType::Type
    }

    fn subexprs(&self) -> Vec<&Expr> {
        std::iter::once(self.template_expr.as_ref()).chain(self.args.iter()).collect()
    }

    fn same_head(&self, _other: &Self) -> bool {
        true
    }

    fn map_subexprs<F: FnMut(&Expr) -> Expr>(&self, f: &mut F) -> Self {
        let template_expr = f(self.template_expr.as_ref());
        Self {
            template_expr: Box::new(template_expr),
            args: self.args.iter().map(f).collect(),
            instantiation_might_trigger_static_asserts: self
                .instantiation_might_trigger_static_asserts,
        }
    }

    fn with_subexprs(&self, subexprs: Vec<Expr>) -> Option<Self> {
        let mut subexprs = subexprs.into_iter();
        let template_expr = subexprs.next()?;
        Some(Self {
            template_expr: Box::new(template_expr),
            args: subexprs.collect(),
            instantiation_might_trigger_static_asserts: self
                .instantiation_might_trigger_static_asserts,
        })
    }
}

impl Print for TemplateInstantiation {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let args = comma_list(alloc, self.args.iter().map(|arg| arg.print(cfg, alloc)));
        self.template_expr.print(cfg, alloc).append(args.angles())
    }
}
