use printer::{Alloc, Builder, Precedence, Print, PrintCfg};

use crate::{ExprNode, ExprType};

mod atomic;
mod function_type;
mod literal;
mod member_access;
mod modified_type;
mod operators;
mod template_instantiation;
mod variadic_expansion;

pub use atomic::*;
pub use function_type::*;
pub use literal::*;
pub use member_access::*;
pub use modified_type::*;
pub use operators::*;
pub use template_instantiation::*;
pub use variadic_expansion::*;

// Expr
//
//

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Literal(Literal),
    AtomicTypeLiteral(AtomicTypeLiteral),
    ModifiedType(ModifiedType),
    FunctionType(FunctionType),
    BinaryOp(BinaryOp),
    UnaryOp(UnaryOp),
    TemplateInstantiation(TemplateInstantiation),
    ClassMemberAccess(ClassMemberAccess),
    VariadicTypeExpansion(VariadicTypeExpansion),
}

impl Expr {
    /// Structural identity: same heads all the way down.
    ///
    /// This is the notion of equality used to compare candidate results; it ignores
    /// the same metadata as [ExprNode::same_head].
    pub fn syntactically_equal(&self, other: &Expr) -> bool {
        if !self.same_head(other) {
            return false;
        }
        let lhs = self.subexprs();
        let rhs = other.subexprs();
        lhs.len() == rhs.len() && lhs.iter().zip(rhs.iter()).all(|(l, r)| l.syntactically_equal(r))
    }

    pub fn as_atomic(&self) -> Option<&AtomicTypeLiteral> {
        match self {
            Expr::AtomicTypeLiteral(lit) => Some(lit),
            _ => None,
        }
    }

    pub fn is_variadic_expansion(&self) -> bool {
        matches!(self, Expr::VariadicTypeExpansion(_))
    }
}

impl ExprNode for Expr {
    fn expr_type(&self) -> ExprType {
        match self {
            Expr::Literal(e) => e.expr_type(),
            Expr::AtomicTypeLiteral(e) => e.expr_type(),
            Expr::ModifiedType(e) => e.expr_type(),
            Expr::FunctionType(e) => e.expr_type(),
            Expr::BinaryOp(e) => e.expr_type(),
            Expr::UnaryOp(e) => e.expr_type(),
            Expr::TemplateInstantiation(e) => e.expr_type(),
            Expr::ClassMemberAccess(e) => e.expr_type(),
            Expr::VariadicTypeExpansion(e) => e.expr_type(),
        }
    }

    fn subexprs(&self) -> Vec<&Expr> {
        match self {
            Expr::Literal(e) => e.subexprs(),
            Expr::AtomicTypeLiteral(e) => e.subexprs(),
            Expr::ModifiedType(e) => e.subexprs(),
            Expr::FunctionType(e) => e.subexprs(),
            Expr::BinaryOp(e) => e.subexprs(),
            Expr::UnaryOp(e) => e.subexprs(),
            Expr::TemplateInstantiation(e) => e.subexprs(),
            Expr::ClassMemberAccess(e) => e.subexprs(),
            Expr::VariadicTypeExpansion(e) => e.subexprs(),
        }
    }

    fn same_head(&self, other: &Self) -> bool {
        match (self, other) {
            (Expr::Literal(l), Expr::Literal(r)) => l.same_head(r),
            (Expr::AtomicTypeLiteral(l), Expr::AtomicTypeLiteral(r)) => l.same_head(r),
            (Expr::ModifiedType(l), Expr::ModifiedType(r)) => l.same_head(r),
            (Expr::FunctionType(l), Expr::FunctionType(r)) => l.same_head(r),
            (Expr::BinaryOp(l), Expr::BinaryOp(r)) => l.same_head(r),
            (Expr::UnaryOp(l), Expr::UnaryOp(r)) => l.same_head(r),
            (Expr::TemplateInstantiation(l), Expr::TemplateInstantiation(r)) => l.same_head(r),
            (Expr::ClassMemberAccess(l), Expr::ClassMemberAccess(r)) => l.same_head(r),
            (Expr::VariadicTypeExpansion(l), Expr::VariadicTypeExpansion(r)) => l.same_head(r),
            (_, _) => false,
        }
    }

    fn map_subexprs<F: FnMut(&Expr) -> Expr>(&self, f: &mut F) -> Self {
        match self {
            Expr::Literal(e) => e.map_subexprs(f).into(),
            Expr::AtomicTypeLiteral(e) => e.map_subexprs(f).into(),
            Expr::ModifiedType(e) => e.map_subexprs(f).into(),
            Expr::FunctionType(e) => e.map_subexprs(f).into(),
            Expr::BinaryOp(e) => e.map_subexprs(f).into(),
            Expr::UnaryOp(e) => e.map_subexprs(f).into(),
            Expr::TemplateInstantiation(e) => e.map_subexprs(f).into(),
            Expr::ClassMemberAccess(e) => e.map_subexprs(f).into(),
            Expr::VariadicTypeExpansion(e) => e.map_subexprs(f).into(),
        }
    }

    fn with_subexprs(&self, subexprs: Vec<Expr>) -> Option<Self> {
        Some(match self {
            Expr::Literal(e) => e.with_subexprs(subexprs)?.into(),
            Expr::AtomicTypeLiteral(e) => e.with_subexprs(subexprs)?.into(),
            Expr::ModifiedType(e) => e.with_subexprs(subexprs)?.into(),
            Expr::FunctionType(e) => e.with_subexprs(subexprs)?.into(),
            Expr::BinaryOp(e) => e.with_subexprs(subexprs)?.into(),
            Expr::UnaryOp(e) => e.with_subexprs(subexprs)?.into(),
            Expr::TemplateInstantiation(e) => e.with_subexprs(subexprs)?.into(),
            Expr::ClassMemberAccess(e) => e.with_subexprs(subexprs)?.into(),
            Expr::VariadicTypeExpansion(e) => e.with_subexprs(subexprs)?.into(),
        })
    }
}

impl Print for Expr {
    fn print_prec<'a>(
        &'a self,
        cfg: &PrintCfg,
        alloc: &'a Alloc<'a>,
        prec: Precedence,
    ) -> Builder<'a> {
        match self {
            Expr::Literal(e) => e.print_prec(cfg, alloc, prec),
            Expr::AtomicTypeLiteral(e) => e.print_prec(cfg, alloc, prec),
            Expr::ModifiedType(e) => e.print_prec(cfg, alloc, prec),
            Expr::FunctionType(e) => e.print_prec(cfg, alloc, prec),
            Expr::BinaryOp(e) => e.print_prec(cfg, alloc, prec),
            Expr::UnaryOp(e) => e.print_prec(cfg, alloc, prec),
            Expr::TemplateInstantiation(e) => e.print_prec(cfg, alloc, prec),
            Expr::ClassMemberAccess(e) => e.print_prec(cfg, alloc, prec),
            Expr::VariadicTypeExpansion(e) => e.print_prec(cfg, alloc, prec),
        }
    }
}

#[cfg(test)]
mod test {
    use printer::PrintToString;

    use super::*;
    use crate::FreeVars;

    fn int() -> Expr {
        AtomicTypeLiteral::for_nonlocal_type("int", false).into()
    }

    fn local(name: &str) -> Expr {
        AtomicTypeLiteral::for_local(name, ExprType::Type, false).into()
    }

    #[test]
    fn same_head_ignores_alias_metadata() {
        let lhs: Expr = AtomicTypeLiteral::for_nonlocal_type("int", false).into();
        let rhs: Expr = AtomicTypeLiteral::for_nonlocal_type("int", true).into();
        assert!(lhs.same_head(&rhs));
        assert_ne!(lhs, rhs);
    }

    #[test]
    fn syntactic_equality_descends_into_children() {
        let lhs: Expr = ModifiedType::pointer(int()).into();
        let rhs: Expr = ModifiedType::pointer(local("T")).into();
        assert!(lhs.same_head(&rhs));
        assert!(!lhs.syntactically_equal(&rhs));
        assert!(lhs.syntactically_equal(&lhs.clone()));
    }

    #[test]
    fn with_subexprs_checks_arity() {
        let ptr: Expr = ModifiedType::pointer(int()).into();
        assert!(ptr.with_subexprs(vec![]).is_none());
        assert!(ptr.with_subexprs(vec![int(), int()]).is_none());
        assert_eq!(ptr.with_subexprs(vec![int()]), Some(ptr.clone()));

        let fun: Expr = FunctionType::new(int(), vec![int(), local("T")]).into();
        let rebuilt = fun.with_subexprs(vec![int()]).unwrap();
        assert_eq!(rebuilt, FunctionType::new(int(), vec![]).into());
    }

    #[test]
    fn free_vars_are_deduplicated_in_order() {
        let e: Expr = FunctionType::new(local("U"), vec![local("T"), local("U"), int()]).into();
        let names: Vec<_> = e.free_vars().into_iter().map(|lit| lit.cpp_type.as_str()).collect();
        assert_eq!(names, vec!["U", "T"]);
    }

    #[test]
    fn print_cpp_like() {
        let vector = AtomicTypeLiteral::for_nonlocal_template(
            "std::vector",
            vec![crate::TemplateArgType { expr_type: ExprType::Type, is_variadic: false }],
            false,
            false,
        );
        let e: Expr = TemplateInstantiation::new(
            vector.into(),
            vec![VariadicTypeExpansion::new(ModifiedType::pointer(local("Ts")).into()).into()],
        )
        .into();
        assert_eq!(e.print_to_string(None), "std::vector<Ts*...>");

        let sum: Expr = BinaryOp::new(
            BinOp::Mul,
            BinaryOp::new(BinOp::Add, Literal::Int64(1).into(), Literal::Int64(2).into()).into(),
            Literal::Int64(3).into(),
        )
        .into();
        assert_eq!(sum.print_to_string(None), "(1 + 2) * 3");
    }
}
