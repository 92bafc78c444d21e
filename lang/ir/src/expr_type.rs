use pretty::DocAllocator;
use printer::theme::ThemeExt;
use printer::tokens::{ELLIPSIS, TEMPLATE, TYPENAME};
use printer::util::comma_list;
use printer::{Alloc, Builder, Print, PrintCfg};

/// The kind of value that an IR0 expression evaluates to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExprType {
    Bool,
    Int64,
    Type,
    Template(Vec<TemplateArgType>),
}

/// The declared kind of a single template parameter, as seen from the outside.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateArgType {
    pub expr_type: ExprType,
    pub is_variadic: bool,
}

impl ExprType {
    pub fn is_template(&self) -> bool {
        matches!(self, ExprType::Template(_))
    }
}

impl Print for ExprType {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        match self {
            ExprType::Bool => alloc.keyword("bool"),
            ExprType::Int64 => alloc.keyword("int64_t"),
            ExprType::Type => alloc.keyword(TYPENAME),
            ExprType::Template(args) => alloc
                .keyword(TEMPLATE)
                .append(alloc.space())
                .append(comma_list(alloc, args.iter().map(|arg| arg.print(cfg, alloc))).angles())
                .append(alloc.space())
                .append(alloc.keyword("class")),
        }
    }
}

impl Print for TemplateArgType {
    fn print<'a>(&'a self, cfg: &PrintCfg, alloc: &'a Alloc<'a>) -> Builder<'a> {
        let TemplateArgType { expr_type, is_variadic } = self;
        let doc = expr_type.print(cfg, alloc);
        if *is_variadic { doc.append(ELLIPSIS) } else { doc }
    }
}
