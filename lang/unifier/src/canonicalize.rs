use std::collections::{BTreeMap, BTreeSet};

use log::trace;

use crate::graph::DepGraph;
use crate::result::{CanonicalizationError, comma_separated};
use crate::subst::{substitute_all, substitute_single};
use crate::{Binding, CanonicalizationStrategy, Solution, Term, Var, free_vars, term_to_string, terms_to_string};

/// Bring a solution into canonical form.
///
/// In the result
/// * no variable is bound whose strategy forbids it on the left-hand side,
/// * every set of variables that are equal to each other is represented by a single
///   one of them, and
/// * no value mentions a bound variable.
///
/// The bindings are ordered such that a variable comes after all variables its
/// original value depended on.
pub fn canonicalize<T: Clone, S: CanonicalizationStrategy<T>>(
    solution: Solution<T>,
    strategy: &S,
) -> Result<Vec<Binding<T>>, CanonicalizationError> {
    let Solution { mut scalars, mut packs } = solution;
    let mut graph = DepGraph::default();

    for (var, value) in &scalars {
        add_edges(&mut graph, strategy, var, std::slice::from_ref(value));
        // `x = y` is as much a binding of `y` as it is of `x`.
        if let Term::Var(other) = value {
            graph.add_edge(other, var);
        }
    }
    for (var, values) in &packs {
        add_edges(&mut graph, strategy, var, values);
        if let Some(other) = single_expanded_var(values) {
            graph.add_edge(other, var);
        }
    }

    for component in graph.sccs_in_topological_order().into_iter().rev() {
        match component.as_slice() {
            [var] => {
                if graph.has_edge(var, var) {
                    return Err(CanonicalizationError::CycleThroughTerm { vars: var.to_string() });
                }
                if strategy.can_var_be_on_lhs(var) {
                    continue;
                }
                let value = if let Some(value) = scalars.get(var) {
                    term_to_string(strategy, value)
                } else if let Some(values) = packs.get(var) {
                    terms_to_string(strategy, values)
                } else {
                    continue;
                };
                return Err(CanonicalizationError::LhsForbidden { var: var.to_string(), value });
            }
            _ => merge_equal_vars(&component, &mut scalars, &mut packs, &mut graph, strategy)?,
        }
    }

    let Some(order) = graph.lexicographical_topological_sort() else {
        let vars = comma_separated(scalars.keys().chain(packs.keys()).map(Var::to_string));
        return Err(CanonicalizationError::CycleThroughTerm { vars });
    };

    let mut canonical_scalars: BTreeMap<Var, Term<T>> = BTreeMap::new();
    let mut canonical_packs: BTreeMap<Var, Vec<Term<T>>> = BTreeMap::new();
    let mut bindings = Vec::new();
    for var in order.into_iter().rev() {
        let substitution_error = |cause| CanonicalizationError::Substitution { var: var.to_string(), cause };
        if let Some(value) = scalars.get(&var) {
            let value = substitute_single(strategy, value, &canonical_scalars, &canonical_packs)
                .map_err(substitution_error)?;
            trace!("canonical: {var} := {}", term_to_string(strategy, &value));
            canonical_scalars.insert(var.clone(), value.clone());
            bindings.push(Binding::Scalar { var, value });
        } else if let Some(values) = packs.get(&var) {
            let values = substitute_all(strategy, values, &canonical_scalars, &canonical_packs)
                .map_err(substitution_error)?;
            trace!("canonical: {var}... := {}", terms_to_string(strategy, &values));
            canonical_packs.insert(var.clone(), values.clone());
            bindings.push(Binding::Pack { var, values });
        }
    }
    Ok(bindings)
}

fn add_edges<T, S: CanonicalizationStrategy<T>>(
    graph: &mut DepGraph,
    strategy: &S,
    var: &Var,
    values: &[Term<T>],
) {
    graph.add_node(var);
    for value in values {
        for other in free_vars(strategy, value) {
            graph.add_edge(var, &other);
        }
    }
}

fn single_expanded_var<T>(values: &[Term<T>]) -> Option<&Var> {
    match values {
        [value] => value.as_expanded_var(),
        _ => None,
    }
}

/// Replace the bindings of a cycle of variables that are all equal to each other by
/// bindings of all but one of them to the remaining one.
fn merge_equal_vars<T: Clone, S: CanonicalizationStrategy<T>>(
    component: &[Var],
    scalars: &mut BTreeMap<Var, Term<T>>,
    packs: &mut BTreeMap<Var, Vec<Term<T>>>,
    graph: &mut DepGraph,
    strategy: &S,
) -> Result<(), CanonicalizationError> {
    let vars = || comma_separated(component.iter().map(Var::to_string));

    let mut scalar_vars = BTreeSet::new();
    let mut pack_vars = BTreeSet::new();
    for var in component {
        if let Some(value) = scalars.get(var) {
            let Term::Var(other) = value else {
                return Err(CanonicalizationError::CycleThroughTerm { vars: vars() });
            };
            scalar_vars.insert(var);
            scalar_vars.insert(other);
        } else if let Some(values) = packs.get(var) {
            let Some(other) = single_expanded_var(values) else {
                return Err(CanonicalizationError::CycleThroughTerm { vars: vars() });
            };
            pack_vars.insert(var);
            pack_vars.insert(other);
        }
    }
    if !scalar_vars.is_empty() && !pack_vars.is_empty() {
        return Err(CanonicalizationError::MixedCycle { vars: vars() });
    }

    let forbidden: Vec<&Var> = component.iter().filter(|var| !strategy.can_var_be_on_lhs(var)).collect();
    let representative = match forbidden.as_slice() {
        [] => component.iter().max(),
        [var] => Some(*var),
        _ => {
            let vars = comma_separated(forbidden.iter().map(|var| var.to_string()));
            return Err(CanonicalizationError::TooManyForbidden { vars });
        }
    };
    let Some(representative) = representative else {
        return Ok(());
    };
    trace!("{} are all equal to {representative}", vars());

    let is_pack = !pack_vars.is_empty();
    for var in component {
        scalars.remove(var);
        packs.remove(var);
        graph.remove_out_edges(var);
    }
    for var in component.iter().filter(|var| *var != representative) {
        if !is_pack {
            scalars.insert(var.clone(), Term::Var(representative.clone()));
        } else {
            packs.insert(var.clone(), vec![Term::expansion(Term::Var(representative.clone()))]);
        }
        graph.add_edge(var, representative);
    }
    Ok(())
}
