use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use ir::{AtomicTypeLiteral, Expr, ExprNode, FreeVars, Rename};
use printer::PrintToString;
use unifier::{Binding, Eqn, Outcome, OutcomeKind, Term, Var, solve, substitute_single};

use crate::result::{MatchError, MatchResult};
use crate::{ExprStrategy, IdentifierGenerator, RenamingTable};

/// The bindings of a certain match, in terms of the original names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExprBindings {
    pub scalars: Vec<(AtomicTypeLiteral, Expr)>,
    /// `var...` stands for the values.
    pub packs: Vec<(AtomicTypeLiteral, Vec<Expr>)>,
}

impl ExprBindings {
    pub fn is_empty(&self) -> bool {
        self.scalars.is_empty() && self.packs.is_empty()
    }

    /// The value bound to the variable with this name.
    pub fn scalar(&self, name: &str) -> Option<&Expr> {
        self.scalars.iter().find(|(var, _)| var.cpp_type == name).map(|(_, value)| value)
    }

    pub fn pack(&self, name: &str) -> Option<&[Expr]> {
        self.packs.iter().find(|(var, _)| var.cpp_type == name).map(|(_, values)| values.as_slice())
    }

    /// Replace the bound variables in `expr`, splicing packs into expansions.
    ///
    /// Returns `None` if the bindings can not be applied, e.g. because two packs
    /// expanded together have different lengths.
    pub fn substitute_into(&self, expr: &Expr) -> Option<Expr> {
        let strategy = ExprStrategy::with_literals(
            self.scalars.iter().map(|(var, _)| var).chain(self.packs.iter().map(|(var, _)| var)).cloned(),
        );
        let scalars = self
            .scalars
            .iter()
            .map(|(var, value)| (Var::new(var.cpp_type.as_str()), strategy.opaque_term(value)))
            .collect();
        let packs = self
            .packs
            .iter()
            .map(|(var, values)| {
                let values = values.iter().map(|value| strategy.opaque_term(value)).collect();
                (Var::new(var.cpp_type.as_str()), values)
            })
            .collect();
        let term = substitute_single(&strategy, &strategy.to_term(expr), &scalars, &packs).ok()?;
        strategy.from_term(&term)
    }
}

/// Unify `exprs` with `patterns`.
///
/// Local literals in `exprs` and in `patterns` are different variables even if they
/// have the same name, so both sides are renamed apart first. Only the literals
/// named in `expr_variables` (or defined in `local_var_definitions`) and
/// `pattern_variables` are treated as variables; other local literals only match
/// themselves. Only pattern variables may be bound.
pub fn unify_exprs(
    exprs: &[Expr],
    local_var_definitions: &BTreeMap<String, Expr>,
    patterns: &[Expr],
    expr_variables: &BTreeSet<String>,
    pattern_variables: &BTreeSet<String>,
    ids: &mut IdentifierGenerator,
) -> MatchResult<Outcome<ExprBindings>> {
    let mut expr_names: BTreeSet<&str> = local_var_definitions.keys().map(String::as_str).collect();
    for expr in exprs.iter().chain(local_var_definitions.values()) {
        expr_names.extend(expr.free_vars().into_iter().map(|lit| lit.cpp_type.as_str()));
    }
    let expr_renaming = RenamingTable::new(expr_names, ids);
    let pattern_renaming =
        RenamingTable::new(patterns.free_vars().into_iter().map(|lit| lit.cpp_type.as_str()), ids);

    let mut var_names = BTreeSet::new();
    for (original, unique) in expr_renaming.iter() {
        if expr_variables.contains(original) || local_var_definitions.contains_key(original) {
            var_names.insert(unique.to_owned());
        }
    }
    let mut pattern_var_names = BTreeSet::new();
    for (original, unique) in pattern_renaming.iter() {
        if pattern_variables.contains(original) {
            var_names.insert(unique.to_owned());
        }
        pattern_var_names.insert(unique.to_owned());
    }

    let call = Call {
        exprs,
        local_var_definitions,
        patterns,
        expr_variables,
        pattern_variables,
        expr_renaming: &expr_renaming,
        pattern_renaming: &pattern_renaming,
    };

    let lhs = exprs.to_vec().rename(expr_renaming.forward());
    let rhs = patterns.to_vec().rename(pattern_renaming.forward());
    let definitions: Vec<(String, Expr)> = local_var_definitions
        .iter()
        .filter_map(|(name, value)| {
            let unique = expr_renaming.unique(name)?;
            Some((unique.to_owned(), value.rename(expr_renaming.forward())))
        })
        .collect();

    let mut strategy = ExprStrategy::new(var_names, pattern_var_names);
    for expr in lhs.iter().chain(rhs.iter()).chain(definitions.iter().map(|(_, value)| value)) {
        if let Err(name) = strategy.register(expr) {
            let name = expr_renaming.original(&name).or(pattern_renaming.original(&name)).unwrap_or(&name);
            let name = name.to_owned();
            return Err(Box::new(MatchError::InconsistentLiteral { name, context: call.to_string() }));
        }
    }

    let eqn = Eqn::new(
        lhs.iter().map(|expr| strategy.to_term(expr)).collect(),
        rhs.iter().map(|expr| strategy.to_term(expr)).collect(),
    );
    let context: BTreeMap<Var, Term<Expr>> = definitions
        .iter()
        .map(|(name, value)| (Var::new(name.as_str()), strategy.to_term(value)))
        .collect();

    let bindings = match solve(vec![eqn], &context, &strategy) {
        Ok(bindings) => bindings,
        Err(err) => {
            let outcome = match err.outcome_kind() {
                OutcomeKind::Impossible => Outcome::Impossible,
                OutcomeKind::Certain | OutcomeKind::Possible => Outcome::Possible,
            };
            debug!("{call}\nReturning {:?} because: {err}", outcome.kind());
            return Ok(outcome);
        }
    };

    let result = call.check(&bindings, &strategy)?;
    debug!("{call}\nReturning Certain with bindings: {}", show_bindings(&result));
    Ok(Outcome::Certain(result))
}

/// The arguments of one [unify_exprs] call, kept for diagnostics.
struct Call<'a> {
    exprs: &'a [Expr],
    local_var_definitions: &'a BTreeMap<String, Expr>,
    patterns: &'a [Expr],
    expr_variables: &'a BTreeSet<String>,
    pattern_variables: &'a BTreeSet<String>,
    expr_renaming: &'a RenamingTable,
    pattern_renaming: &'a RenamingTable,
}

impl Call<'_> {
    /// Check the canonical bindings and translate them back to the original names.
    fn check(&self, bindings: &[Binding<Expr>], strategy: &ExprStrategy) -> MatchResult<ExprBindings> {
        let mut result = ExprBindings::default();
        for binding in bindings {
            let var = binding.var();
            let with_context = |bindings: String| format!("{self}\nBindings: {bindings}");
            let unrepresentable = || {
                Box::new(MatchError::UnrepresentableBinding {
                    var: var.to_string(),
                    context: with_context(show_raw_bindings(bindings, strategy)),
                })
            };

            if self.pattern_renaming.original(var.name()).is_none() {
                return Err(unrepresentable());
            }
            let lit = strategy.literal(var).ok_or_else(unrepresentable)?;
            let values = match binding {
                Binding::Scalar { value, .. } => vec![value],
                Binding::Pack { values, .. } => values.iter().collect(),
            };

            let mut exprs = Vec::with_capacity(values.len());
            for value in values {
                let expr = strategy.from_term(value).ok_or_else(unrepresentable)?;
                let original_lit = lit.rename(self.pattern_renaming.inverse());
                let original_expr = expr.rename(self.expr_renaming.inverse());
                if let Some(escaped) =
                    expr.free_vars().into_iter().find(|free| self.pattern_renaming.is_unique_name(&free.cpp_type))
                {
                    let escaped = self.pattern_renaming.original(&escaped.cpp_type).unwrap_or(&escaped.cpp_type);
                    return Err(Box::new(MatchError::EscapedPatternVar {
                        var: original_lit.cpp_type,
                        escaped: escaped.to_owned(),
                        context: with_context(show_raw_bindings(bindings, strategy)),
                    }));
                }
                if expr.expr_type() != lit.expr_type {
                    return Err(Box::new(MatchError::KindMismatch {
                        var: original_lit.cpp_type,
                        value: original_expr.print_trace(),
                        var_kind: lit.expr_type.print_trace(),
                        value_kind: expr.expr_type().print_trace(),
                        context: with_context(show_raw_bindings(bindings, strategy)),
                    }));
                }
                exprs.push(original_expr);
            }

            let original_lit = lit.rename(self.pattern_renaming.inverse());
            match binding {
                Binding::Scalar { .. } => {
                    if let Some(expr) = exprs.pop() {
                        result.scalars.push((original_lit, expr));
                    }
                }
                Binding::Pack { .. } => result.packs.push((original_lit, exprs)),
            }
        }
        result.scalars.sort_by(|(lhs, _), (rhs, _)| lhs.cpp_type.cmp(&rhs.cpp_type));
        result.packs.sort_by(|(lhs, _), (rhs, _)| lhs.cpp_type.cmp(&rhs.cpp_type));
        Ok(result)
    }
}

impl std::fmt::Display for Call<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let exprs: Vec<_> = self.exprs.iter().map(|expr| expr.print_trace()).collect();
        let definitions: Vec<_> = self
            .local_var_definitions
            .iter()
            .map(|(name, value)| format!("{name} = {}", value.print_trace()))
            .collect();
        let patterns: Vec<_> = self.patterns.iter().map(|pattern| pattern.print_trace()).collect();
        let expr_variables: Vec<_> = self.expr_variables.iter().map(String::as_str).collect();
        let pattern_variables: Vec<_> = self.pattern_variables.iter().map(String::as_str).collect();
        write!(
            f,
            "unify(exprs=[{}], local_var_definitions={{{}}}, patterns=[{}], expr_variables=[{}], pattern_variables=[{}])\nUsing name mappings: {}, {}",
            exprs.join(", "),
            definitions.join(", "),
            patterns.join(", "),
            expr_variables.join(", "),
            pattern_variables.join(", "),
            self.expr_renaming,
            self.pattern_renaming,
        )
    }
}

fn show_raw_bindings(bindings: &[Binding<Expr>], strategy: &ExprStrategy) -> String {
    let show = |term: &Term<Expr>| unifier::term_to_string(strategy, term);
    let bindings: Vec<_> = bindings
        .iter()
        .map(|binding| match binding {
            Binding::Scalar { var, value } => format!("{var} = {}", show(value)),
            Binding::Pack { var, values } => {
                let values: Vec<_> = values.iter().map(show).collect();
                format!("{var}... = [{}]", values.join(", "))
            }
        })
        .collect();
    format!("{{{}}}", bindings.join(", "))
}

pub fn show_bindings(bindings: &ExprBindings) -> String {
    let scalars = bindings
        .scalars
        .iter()
        .map(|(var, value)| format!("{} = {}", var.cpp_type, value.print_trace()));
    let packs = bindings.packs.iter().map(|(var, values)| {
        let values: Vec<_> = values.iter().map(|value| value.print_trace()).collect();
        format!("{}... = [{}]", var.cpp_type, values.join(", "))
    });
    let all: Vec<_> = scalars.chain(packs).collect();
    format!("{{{}}}", all.join(", "))
}

#[cfg(test)]
mod test {
    use ir::{
        BinOp, BinaryOp, ClassMemberAccess, ExprType, FunctionType, Literal, ModifiedType, TemplateArgType,
        TemplateInstantiation, UnOp, UnaryOp, VariadicTypeExpansion,
    };
    use unifier::OutcomeKind;

    use super::*;

    fn type_literal(name: &str) -> Expr {
        AtomicTypeLiteral::for_nonlocal_type(name, false).into()
    }

    fn local_lit(name: &str) -> AtomicTypeLiteral {
        AtomicTypeLiteral::for_local(name, ExprType::Type, false)
    }

    fn local(name: &str) -> Expr {
        local_lit(name).into()
    }

    fn pack_lit(name: &str) -> AtomicTypeLiteral {
        AtomicTypeLiteral::for_local(name, ExprType::Type, true)
    }

    fn expanded(name: &str) -> Expr {
        VariadicTypeExpansion::new(pack_lit(name).into()).into()
    }

    fn fun(args: Vec<Expr>) -> Expr {
        FunctionType::new(type_literal("int"), args).into()
    }

    fn vector(args: Vec<Expr>) -> Expr {
        let template = AtomicTypeLiteral::for_nonlocal_template(
            "std::vector",
            vec![TemplateArgType { expr_type: ExprType::Type, is_variadic: false }],
            false,
            false,
        );
        TemplateInstantiation::new(template.into(), args).into()
    }

    fn names(vars: &[&str]) -> BTreeSet<String> {
        vars.iter().map(|var| var.to_string()).collect()
    }

    fn unify(exprs: Vec<Expr>, patterns: Vec<Expr>, expr_vars: &[&str], pattern_vars: &[&str]) -> Outcome<ExprBindings> {
        let mut ids = IdentifierGenerator::new();
        unify_exprs(&exprs, &BTreeMap::new(), &patterns, &names(expr_vars), &names(pattern_vars), &mut ids).unwrap()
    }

    fn kind(lhs: Expr, rhs: Expr) -> OutcomeKind {
        unify(vec![lhs], vec![rhs], &[], &[]).kind()
    }

    #[test]
    fn every_expression_equals_itself() {
        let exprs: Vec<Expr> = vec![
            Literal::Int64(1).into(),
            type_literal("int"),
            ModifiedType::pointer(type_literal("int")).into(),
            ModifiedType::reference(type_literal("int")).into(),
            ModifiedType::rvalue_reference(type_literal("int")).into(),
            ModifiedType::constant(type_literal("int")).into(),
            ModifiedType::array(type_literal("int")).into(),
            fun(vec![]),
            fun(vec![type_literal("float")]),
            BinaryOp::new(BinOp::Eq, Literal::Int64(1).into(), Literal::Int64(2).into()).into(),
            BinaryOp::new(BinOp::Add, Literal::Int64(1).into(), Literal::Int64(2).into()).into(),
            BinaryOp::new(BinOp::Or, Literal::Bool(true).into(), Literal::Bool(false).into()).into(),
            UnaryOp::new(UnOp::Not, Literal::Bool(true).into()).into(),
            UnaryOp::new(UnOp::Minus, Literal::Int64(1).into()).into(),
            vector(vec![type_literal("int")]),
            ClassMemberAccess::new(type_literal("MyClass"), "value_type", ExprType::Type).into(),
        ];
        for expr in exprs {
            let outcome = unify(vec![expr.clone()], vec![expr.clone()], &[], &[]);
            assert_eq!(outcome, Outcome::Certain(ExprBindings::default()), "{}", expr.print_trace());
        }
    }

    #[test]
    fn different_syntactic_heads_are_impossible() {
        assert_eq!(kind(Literal::Int64(1).into(), Literal::Int64(2).into()), OutcomeKind::Impossible);
        assert_eq!(kind(type_literal("int"), type_literal("float")), OutcomeKind::Impossible);
        let pointer = |name| -> Expr { ModifiedType::pointer(type_literal(name)).into() };
        assert_eq!(kind(pointer("int"), pointer("float")), OutcomeKind::Impossible);
        assert_eq!(kind(fun(vec![]), fun(vec![type_literal("double")])), OutcomeKind::Impossible);
        assert_eq!(kind(vector(vec![type_literal("int")]), vector(vec![type_literal("float")])), OutcomeKind::Impossible);
    }

    #[test]
    fn metadata_does_not_affect_equality() {
        let alias: Expr = AtomicTypeLiteral::for_nonlocal_type("X", true).into();
        let class: Expr = AtomicTypeLiteral::for_nonlocal_type("X", false).into();
        assert_eq!(kind(alias, class), OutcomeKind::Certain);

        let Expr::TemplateInstantiation(mut asserting) = vector(vec![]) else { unreachable!() };
        asserting.instantiation_might_trigger_static_asserts = true;
        assert_eq!(kind(vector(vec![]), asserting.into()), OutcomeKind::Certain);

        let member = |expr_type| -> Expr { ClassMemberAccess::new(type_literal("MyClass"), "value_type", expr_type).into() };
        assert_eq!(kind(member(ExprType::Type), member(ExprType::Int64)), OutcomeKind::Certain);
    }

    #[test]
    fn non_syntactic_differences_are_possible() {
        let alias = |name| -> Expr { AtomicTypeLiteral::for_nonlocal_type(name, true).into() };
        assert_eq!(kind(alias("X"), alias("Y")), OutcomeKind::Possible);
        assert_eq!(kind(local("int"), local("float")), OutcomeKind::Possible);

        let sum = |lhs, rhs| -> Expr { BinaryOp::new(BinOp::Add, Literal::Int64(lhs).into(), Literal::Int64(rhs).into()).into() };
        assert_eq!(kind(sum(1, 2), sum(3, 2)), OutcomeKind::Possible);

        let reference = |name| -> Expr { ModifiedType::reference(type_literal(name)).into() };
        assert_eq!(kind(reference("int"), reference("float")), OutcomeKind::Possible);

        let member = |name| -> Expr { ClassMemberAccess::new(type_literal(name), "value_type", ExprType::Type).into() };
        assert_eq!(kind(member("MyClass"), member("OtherClass")), OutcomeKind::Possible);

        assert_eq!(kind(expanded("Ts"), expanded("Us")), OutcomeKind::Possible);
    }

    #[test]
    fn reference_never_equals_pointer() {
        let reference: Expr = ModifiedType::reference(type_literal("int")).into();
        let pointer: Expr = ModifiedType::pointer(type_literal("int")).into();
        assert_eq!(kind(reference.clone(), pointer), OutcomeKind::Impossible);
        let alias: Expr = AtomicTypeLiteral::for_nonlocal_type("X", true).into();
        assert_eq!(kind(reference, alias), OutcomeKind::Possible);
    }

    #[test]
    fn same_name_on_both_sides_is_two_variables() {
        for expr_vars in [&[][..], &["T"][..]] {
            let outcome = unify(vec![local("T")], vec![local("T")], expr_vars, &["T"]);
            let bindings = outcome.certain().unwrap();
            assert_eq!(bindings.scalars, vec![(local_lit("T"), local("T"))]);
        }
        // Without pattern variables the two locals are unrelated.
        assert_eq!(unify(vec![local("T")], vec![local("T")], &["T"], &[]).kind(), OutcomeKind::Possible);
        assert_eq!(unify(vec![local("T")], vec![local("T")], &[], &[]).kind(), OutcomeKind::Possible);
    }

    #[test]
    fn pattern_variable_is_deduced() {
        let exprs: Vec<Expr> = vec![ModifiedType::pointer(type_literal("int")).into(); 2];
        let patterns: Vec<Expr> = vec![ModifiedType::pointer(local("T")).into(); 2];
        let bindings = unify(exprs, patterns, &[], &["T"]).certain().unwrap();
        assert_eq!(bindings.scalars, vec![(local_lit("T"), type_literal("int"))]);
        assert!(bindings.packs.is_empty());

        let exprs = vec![ModifiedType::pointer(local("X")).into()];
        let patterns = vec![ModifiedType::pointer(local("T")).into()];
        let bindings = unify(exprs, patterns, &["X"], &["T"]).certain().unwrap();
        assert_eq!(bindings.scalar("T"), Some(&local("X")));
    }

    #[test]
    fn expansion_absorbs_the_middle() {
        let exprs = vec![fun(vec![
            type_literal("float"),
            type_literal("double"),
            local("T"),
            type_literal("char"),
            type_literal("void"),
        ])];
        let patterns = vec![fun(vec![type_literal("float"), type_literal("double"), expanded("Ts"), type_literal("void")])];
        let bindings = unify(exprs, patterns, &["T"], &["Ts"]).certain().unwrap();
        assert!(bindings.scalars.is_empty());
        assert_eq!(bindings.packs, vec![(pack_lit("Ts"), vec![local("T"), type_literal("char")])]);
    }

    #[test]
    fn expansion_matches_empty_and_full_lists() {
        let bindings = unify(vec![fun(vec![])], vec![fun(vec![expanded("Ts")])], &[], &["Ts"]).certain().unwrap();
        assert_eq!(bindings.pack("Ts"), Some(&[][..]));

        let exprs = vec![fun(vec![type_literal("float"), type_literal("double")])];
        let bindings = unify(exprs, vec![fun(vec![expanded("Ts")])], &[], &["Ts"]).certain().unwrap();
        assert_eq!(bindings.pack("Ts"), Some(&[type_literal("float"), type_literal("double")][..]));

        let exprs = vec![fun(vec![type_literal("float")])];
        let patterns = vec![fun(vec![type_literal("float"), expanded("Ts")])];
        let bindings = unify(exprs, patterns, &[], &["Ts"]).certain().unwrap();
        assert_eq!(bindings.pack("Ts"), Some(&[][..]));

        let patterns = vec![fun(vec![type_literal("float"), expanded("Ts")])];
        assert_eq!(unify(vec![fun(vec![])], patterns, &[], &["Ts"]).kind(), OutcomeKind::Impossible);
    }

    #[test]
    fn expansion_absorbs_other_expansions() {
        let exprs = vec![fun(vec![
            type_literal("float"),
            expanded("Ts"),
            type_literal("char"),
            expanded("Us"),
            type_literal("void"),
        ])];
        let patterns = vec![fun(vec![type_literal("float"), expanded("Vs"), type_literal("void")])];
        let bindings = unify(exprs, patterns, &["Ts", "Us"], &["Vs"]).certain().unwrap();
        assert_eq!(bindings.pack("Vs"), Some(&[expanded("Ts"), type_literal("char"), expanded("Us")][..]));
    }

    #[test]
    fn expanded_variables_are_equated() {
        let bindings = unify(vec![expanded("Ts")], vec![expanded("Us")], &["Ts"], &["Us"]).certain().unwrap();
        assert_eq!(bindings.pack("Us"), Some(&[expanded("Ts")][..]));
    }

    #[test]
    fn local_definitions_are_looked_through() {
        let locals = BTreeMap::from([("X".to_owned(), type_literal("int"))]);
        let exprs = vec![ModifiedType::pointer(local("X")).into()];
        let patterns = vec![ModifiedType::pointer(local("T")).into()];
        let mut ids = IdentifierGenerator::new();
        let outcome = unify_exprs(&exprs, &locals, &patterns, &BTreeSet::new(), &names(&["T"]), &mut ids).unwrap();
        assert_eq!(outcome.certain().unwrap().scalar("T"), Some(&type_literal("int")));
    }

    #[test]
    fn kind_mismatch_is_an_internal_error() {
        let int_var: Expr = AtomicTypeLiteral::for_local("N", ExprType::Int64, false).into();
        let mut ids = IdentifierGenerator::new();
        let err = unify_exprs(
            &[type_literal("int")],
            &BTreeMap::new(),
            &[int_var],
            &BTreeSet::new(),
            &names(&["N"]),
            &mut ids,
        )
        .unwrap_err();
        assert!(matches!(*err, MatchError::KindMismatch { .. }));
    }

    #[test]
    fn bindings_can_be_substituted() {
        let bindings = ExprBindings {
            scalars: vec![(local_lit("T"), type_literal("int"))],
            packs: vec![(pack_lit("Ts"), vec![type_literal("float"), type_literal("double")])],
        };
        let expr = fun(vec![local("T"), VariadicTypeExpansion::new(ModifiedType::pointer(pack_lit("Ts").into()).into()).into()]);
        let expected = fun(vec![
            type_literal("int"),
            ModifiedType::pointer(type_literal("float")).into(),
            ModifiedType::pointer(type_literal("double")).into(),
        ]);
        assert_eq!(bindings.substitute_into(&expr), Some(expected));
    }
}
