use std::collections::BTreeSet;

use pretty::DocAllocator;
use printer::theme::ThemeExt;
use printer::tokens::{CONSTEXPR, ELLIPSIS, EQUALS, STATIC_ASSERT, STRUCT, TEMPLATE, USING};
use printer::util::comma_list;
use printer::{Alloc, Builder, Print, PrintCfg};

use crate::{AtomicTypeLiteral, Expr, ExprNode, ExprType, TemplateArgType, VariadicTypeExpansion};

// TemplateArgDecl
//
//

/// A template parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateArgDecl {
    pub expr_type: ExprType,
    pub name: String,
    pub is_variadic: bool,
}

impl TemplateArgDecl {
    pub fn new(name: &str, expr_type: ExprType, is_variadic: bool) -> Self {
        Self { expr_type, name: name.to_owned(), is_variadic }
    }

    /// The local literal through which the body refers to this parameter.
    pub fn to_literal(&self) -> AtomicTypeLiteral {
        AtomicTypeLiteral::for_local(&self.name, self.expr_type.clone(), self.is_variadic)
    }

    /// The pattern that matches exactly the arguments bound to this parameter: the
    /// parameter itself, expanded if it is a pack.
    pub fn to_pattern(&self) -> Expr {
        let lit: Expr = self.to_literal().into();
        if self.is_variadic { VariadicTypeExpansion::new(lit).into() } else { lit }
    }
}

impl Print for TemplateArgDecl {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let kind = self.expr_type.print(cfg, alloc);
        let kind = if self.is_variadic { kind.append(ELLIPSIS) } else { kind };
        kind.append(alloc.space()).append(alloc.var(&self.name))
    }
}

// TemplateBodyElement
//
//

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TemplateBodyElement {
    StaticAssert(StaticAssert),
    ConstantDef(ConstantDef),
    Typedef(Typedef),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StaticAssert {
    pub expr: Expr,
    pub message: String,
}

/// `static constexpr <type> name = expr;`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConstantDef {
    pub name: String,
    pub expr: Expr,
}

/// `using name = expr;`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Typedef {
    pub name: String,
    pub expr: Expr,
}

impl TemplateBodyElement {
    /// The name and the value of the element, if it defines one.
    pub fn definition(&self) -> Option<(&str, &Expr)> {
        match self {
            TemplateBodyElement::StaticAssert(_) => None,
            TemplateBodyElement::ConstantDef(ConstantDef { name, expr })
            | TemplateBodyElement::Typedef(Typedef { name, expr }) => Some((name, expr)),
        }
    }
}

impl Print for TemplateBodyElement {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        match self {
            TemplateBodyElement::StaticAssert(StaticAssert { expr, message }) => alloc
                .keyword(STATIC_ASSERT)
                .append(
                    expr.print(cfg, alloc)
                        .append(",")
                        .append(alloc.space())
                        .append(alloc.text(format!("{message:?}")))
                        .parens(),
                )
                .append(";"),
            TemplateBodyElement::ConstantDef(ConstantDef { name, expr }) => alloc
                .keyword("static")
                .append(alloc.space())
                .append(alloc.keyword(CONSTEXPR))
                .append(alloc.space())
                .append(constant_type(expr, alloc))
                .append(alloc.space())
                .append(alloc.var(name))
                .append(alloc.space())
                .append(EQUALS)
                .append(alloc.space())
                .append(expr.print(cfg, alloc))
                .append(";"),
            TemplateBodyElement::Typedef(Typedef { name, expr }) => alloc
                .keyword(USING)
                .append(alloc.space())
                .append(alloc.var(name))
                .append(alloc.space())
                .append(EQUALS)
                .append(alloc.space())
                .append(expr.print(cfg, alloc))
                .append(";"),
        }
    }
}

fn constant_type<'a>(expr: &Expr, alloc: &'a Alloc<'a>) -> Builder<'a> {
    match expr.expr_type() {
        ExprType::Bool => alloc.keyword("bool"),
        ExprType::Int64 => alloc.keyword("int64_t"),
        _ => alloc.keyword("auto"),
    }
}

// TemplateSpecialization
//
//

/// The main definition or a (partial) specialization of a template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateSpecialization {
    pub args: Vec<TemplateArgDecl>,
    /// `None` for the main definition, which applies to any instantiation
    pub patterns: Option<Vec<Expr>>,
    pub body: Vec<TemplateBodyElement>,
    pub is_metafunction: bool,
}

impl TemplateSpecialization {
    pub fn arg_names(&self) -> BTreeSet<String> {
        self.args.iter().map(|arg| arg.name.clone()).collect()
    }

    pub fn has_static_asserts(&self) -> bool {
        self.body.iter().any(|elem| matches!(elem, TemplateBodyElement::StaticAssert(_)))
    }

    /// The value of the body element called `name`, if there is exactly one.
    pub fn result_element(&self, name: &str) -> Option<&Expr> {
        let mut defs = self.body.iter().filter_map(|elem| elem.definition());
        let (_, expr) = defs.by_ref().find(|(elem_name, _)| *elem_name == name)?;
        match defs.find(|(elem_name, _)| *elem_name == name) {
            Some(_) => None,
            None => Some(expr),
        }
    }
}

impl Print for TemplateSpecialization {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let header = alloc
            .keyword(TEMPLATE)
            .append(alloc.space())
            .append(comma_list(alloc, self.args.iter().map(|arg| arg.print(cfg, alloc))).angles());
        let patterns = match &self.patterns {
            Some(patterns) => {
                comma_list(alloc, patterns.iter().map(|pat| pat.print(cfg, alloc))).angles()
            }
            None => alloc.nil(),
        };
        let body = alloc.intersperse(self.body.iter().map(|elem| elem.print(cfg, alloc)), alloc.hardline());
        header
            .append(alloc.space())
            .append(alloc.keyword(STRUCT))
            .append(patterns)
            .append(alloc.space())
            .append(alloc.hardline().append(body).nest(cfg.indent).append(alloc.hardline()).braces())
            .append(";")
    }
}

// TemplateDefn
//
//

/// A template together with all of its specializations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateDefn {
    pub name: String,
    pub description: String,
    pub args: Vec<TemplateArgDecl>,
    /// `None` if the template is only declared, so that only specializations apply
    pub main_definition: Option<TemplateSpecialization>,
    pub specializations: Vec<TemplateSpecialization>,
    /// The names of the body elements that other code may refer to
    pub result_element_names: BTreeSet<String>,
}

impl TemplateDefn {
    pub fn arg_types(&self) -> Vec<TemplateArgType> {
        self.args
            .iter()
            .map(|arg| TemplateArgType { expr_type: arg.expr_type.clone(), is_variadic: arg.is_variadic })
            .collect()
    }

    /// The literal through which other templates refer to this one.
    pub fn to_literal(&self, is_metafunction_that_may_return_error: bool) -> AtomicTypeLiteral {
        AtomicTypeLiteral::for_nonlocal_template(
            &self.name,
            self.arg_types(),
            is_metafunction_that_may_return_error,
            false,
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Literal;

    fn spec_with_body(body: Vec<TemplateBodyElement>) -> TemplateSpecialization {
        TemplateSpecialization { args: vec![], patterns: Some(vec![]), body, is_metafunction: true }
    }

    #[test]
    fn result_element_requires_unique_name() {
        let typedef = |name: &str, n| {
            TemplateBodyElement::Typedef(Typedef { name: name.to_owned(), expr: Literal::Int64(n).into() })
        };
        let spec = spec_with_body(vec![typedef("type", 1), typedef("other", 2)]);
        assert_eq!(spec.result_element("type"), Some(&Literal::Int64(1).into()));
        assert_eq!(spec.result_element("missing"), None);

        let spec = spec_with_body(vec![typedef("type", 1), typedef("type", 2)]);
        assert_eq!(spec.result_element("type"), None);
    }

    #[test]
    fn variadic_arg_pattern_is_expanded() {
        let arg = TemplateArgDecl::new("Ts", ExprType::Type, true);
        assert!(arg.to_pattern().is_variadic_expansion());
        let arg = TemplateArgDecl::new("T", ExprType::Type, false);
        assert_eq!(arg.to_pattern(), arg.to_literal().into());
    }
}
