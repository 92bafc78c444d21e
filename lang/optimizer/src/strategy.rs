use std::collections::{BTreeMap, BTreeSet};

use ir::{AtomicTypeLiteral, Expr, ExprNode, FreeVars, TypeModifier, VariadicTypeExpansion};
use printer::PrintToString;
use unifier::{CanonicalizationStrategy, Term, UnificationStrategy, Var};

/// Lets the unification engine work on IR0 expressions.
///
/// A local literal whose name is one of the variables becomes a [Term::Var], and a
/// [VariadicTypeExpansion] becomes a [Term::Expansion]. Every other expression is an
/// opaque [Term::Node].
#[derive(Debug, Clone, Default)]
pub struct ExprStrategy {
    var_names: BTreeSet<String>,
    /// Variables that come from the patterns and may therefore be bound.
    pattern_var_names: BTreeSet<String>,
    /// The literal each variable was spelled as, needed to turn terms back into
    /// expressions.
    literal_by_var: BTreeMap<String, AtomicTypeLiteral>,
}

impl ExprStrategy {
    pub fn new(var_names: BTreeSet<String>, pattern_var_names: BTreeSet<String>) -> Self {
        Self { var_names, pattern_var_names, literal_by_var: BTreeMap::new() }
    }

    /// A strategy whose variables are exactly the given literals. None of them may be
    /// bound.
    pub fn with_literals<I: IntoIterator<Item = AtomicTypeLiteral>>(literals: I) -> Self {
        let literal_by_var: BTreeMap<_, _> =
            literals.into_iter().map(|lit| (lit.cpp_type.clone(), lit)).collect();
        let var_names = literal_by_var.keys().cloned().collect();
        Self { var_names, pattern_var_names: BTreeSet::new(), literal_by_var }
    }

    /// Remember how the variables occurring in `expr` are spelled.
    ///
    /// Fails with the name of the variable if it was already seen with a different
    /// literal.
    pub fn register(&mut self, expr: &Expr) -> Result<(), String> {
        let mut literals = Vec::new();
        expr.collect_free_vars(&mut literals);
        for lit in literals {
            if !self.var_names.contains(&lit.cpp_type) {
                continue;
            }
            match self.literal_by_var.get(&lit.cpp_type) {
                Some(known) if known != lit => return Err(lit.cpp_type.clone()),
                Some(_) => {}
                None => {
                    self.literal_by_var.insert(lit.cpp_type.clone(), lit.clone());
                }
            }
        }
        Ok(())
    }

    pub fn is_var(&self, lit: &AtomicTypeLiteral) -> bool {
        lit.is_local && self.var_names.contains(&lit.cpp_type)
    }

    pub fn literal(&self, var: &Var) -> Option<&AtomicTypeLiteral> {
        self.literal_by_var.get(var.name())
    }

    pub fn to_term(&self, expr: &Expr) -> Term<Expr> {
        match expr {
            Expr::VariadicTypeExpansion(expansion) => Term::expansion(self.to_term(&expansion.inner)),
            Expr::AtomicTypeLiteral(lit) if self.is_var(lit) => Term::var(lit.cpp_type.as_str()),
            _ => Term::Node(expr.clone()),
        }
    }

    /// Like [ExprStrategy::to_term], but never looks for variables below the top
    /// level. Used for values that are inserted by substitution as they are.
    pub fn opaque_term(&self, expr: &Expr) -> Term<Expr> {
        match expr {
            Expr::VariadicTypeExpansion(expansion) => {
                Term::expansion(Term::Node(expansion.inner.as_ref().clone()))
            }
            _ => Term::Node(expr.clone()),
        }
    }

    pub fn from_term(&self, term: &Term<Expr>) -> Option<Expr> {
        match term {
            Term::Var(var) => self.literal(var).cloned().map(Expr::from),
            Term::Expansion(inner) => Some(VariadicTypeExpansion::new(self.from_term(inner)?).into()),
            Term::Node(expr) => Some(expr.clone()),
        }
    }
}

/// Whether two expressions of this kind can only denote the same thing if they look
/// the same.
fn requires_syntactic_equality(expr: &Expr) -> bool {
    match expr {
        Expr::Literal(_) | Expr::FunctionType(_) | Expr::TemplateInstantiation(_) => true,
        Expr::ModifiedType(modified) => match modified.modifier {
            TypeModifier::Pointer | TypeModifier::Const | TypeModifier::Array => true,
            // Reference collapsing: `int&` and `(int&)&&` are the same type.
            TypeModifier::Reference | TypeModifier::RvalueReference => false,
        },
        // Nonlocal classes and templates are only equal to themselves, but an alias
        // or a template parameter can stand for anything.
        Expr::AtomicTypeLiteral(lit) => !lit.is_local && !lit.may_be_alias,
        Expr::BinaryOp(_)
        | Expr::UnaryOp(_)
        | Expr::ClassMemberAccess(_)
        | Expr::VariadicTypeExpansion(_) => false,
    }
}

fn is_reference(expr: &Expr) -> bool {
    match expr {
        Expr::ModifiedType(modified) => {
            matches!(modified.modifier, TypeModifier::Reference | TypeModifier::RvalueReference)
        }
        _ => false,
    }
}

impl UnificationStrategy<Expr> for ExprStrategy {
    fn is_same_term_excluding_args(&self, lhs: &Expr, rhs: &Expr) -> bool {
        lhs.same_head(rhs)
    }

    fn term_args(&self, term: &Expr) -> Vec<Term<Expr>> {
        term.subexprs().into_iter().map(|subexpr| self.to_term(subexpr)).collect()
    }

    fn term_to_string(&self, term: &Expr) -> String {
        term.print_trace()
    }

    fn equality_requires_syntactic_equality(&self, term: &Expr) -> bool {
        requires_syntactic_equality(term)
    }

    fn may_be_equal(&self, lhs: &Expr, rhs: &Expr) -> bool {
        let (syntactic, other) = match (requires_syntactic_equality(lhs), requires_syntactic_equality(rhs)) {
            (false, false) => return true,
            (true, _) => (lhs, rhs),
            (false, true) => (rhs, lhs),
        };
        // A reference is never equal to a type that is neither a reference nor a
        // literal that might be one.
        !(is_reference(other) && !matches!(syntactic, Expr::AtomicTypeLiteral(_)))
    }
}

impl CanonicalizationStrategy<Expr> for ExprStrategy {
    fn term_with_args(&self, term: &Expr, args: Vec<Term<Expr>>) -> Option<Expr> {
        let subexprs = args.iter().map(|arg| self.from_term(arg)).collect::<Option<Vec<_>>>()?;
        term.with_subexprs(subexprs)
    }

    fn can_var_be_on_lhs(&self, var: &Var) -> bool {
        self.pattern_var_names.contains(var.name())
    }

    fn is_pack_var(&self, var: &Var) -> bool {
        self.literal(var).is_some_and(|lit| lit.is_variadic)
    }
}
