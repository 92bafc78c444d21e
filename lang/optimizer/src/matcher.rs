use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use log::{debug, trace};

use ir::{Expr, FreeVars, TemplateDefn, TemplateSpecialization};
use printer::PrintToString;
use unifier::{Outcome, OutcomeKind};

use crate::result::MatchResult;
use crate::{ExprBindings, IdentifierGenerator, show_bindings, unify_exprs};

/// A specialization that certainly matches, with the values of its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCandidate {
    pub specialization: TemplateSpecialization,
    pub bindings: ExprBindings,
}

/// The specializations an instantiation may select.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matches {
    /// Certain matches that are not less specific than any other certain match.
    pub certain: Vec<MatchCandidate>,
    pub possible: Vec<TemplateSpecialization>,
}

/// What the optimizer may do with an instantiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Every specialization that might be selected evaluates to this expression.
    Constant(Expr),
    /// This specialization is selected.
    Inline(MatchCandidate),
    CannotDecide(Undecided),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Undecided {
    /// Some specialization might match, so no other one can be relied on.
    PossibleMatch,
    NoCertainMatch,
    /// More than one certain match, none more specific than the others.
    Incomparable,
    UnknownTemplate,
    BudgetExhausted,
}

impl fmt::Display for Undecided {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Undecided::PossibleMatch => "a specialization might match",
            Undecided::NoCertainMatch => "no specialization certainly matches",
            Undecided::Incomparable => "several specializations match and none is more specific than the others",
            Undecided::UnknownTemplate => "the template is not known",
            Undecided::BudgetExhausted => "the step budget is exhausted",
        };
        f.write_str(text)
    }
}

/// Unify the arguments with every specialization of `defn` and rank the certain
/// matches by specificity.
pub fn find_matches(
    args: &[Expr],
    locals: &BTreeMap<String, Expr>,
    defn: &TemplateDefn,
    ids: &mut IdentifierGenerator,
) -> MatchResult<Matches> {
    let instantiation_vars: BTreeSet<String> =
        args.free_vars().into_iter().map(|lit| lit.cpp_type.clone()).collect();

    let mut certain = Vec::new();
    let mut possible = Vec::new();
    for specialization in &defn.specializations {
        let patterns = specialization.patterns.as_deref().unwrap_or_default();
        let outcome =
            unify_exprs(args, locals, patterns, &instantiation_vars, &specialization.arg_names(), ids)?;
        trace!("{}: {:?}", defn.name, outcome.kind());
        match outcome {
            Outcome::Certain(bindings) => {
                certain.push(MatchCandidate { specialization: specialization.clone(), bindings })
            }
            Outcome::Possible => possible.push(specialization.clone()),
            Outcome::Impossible => {}
        }
    }

    if let Some(main) = defn.main_definition.as_ref().filter(|main| !main.body.is_empty()) {
        let patterns: Vec<Expr> = main.args.iter().map(|arg| arg.to_pattern()).collect();
        match unify_exprs(args, locals, &patterns, &instantiation_vars, &main.arg_names(), ids)? {
            Outcome::Certain(bindings) => {
                certain.push(MatchCandidate { specialization: main.clone(), bindings })
            }
            Outcome::Possible => possible.push(main.clone()),
            // The arguments do not even fit the template's parameter list.
            Outcome::Impossible => debug!("{}: the main definition does not match", defn.name),
        }
    }

    let certain = most_specific(certain, ids)?;
    Ok(Matches { certain, possible })
}

/// Drop every candidate whose patterns are known to be less specific than those of
/// another candidate.
fn most_specific(
    candidates: Vec<MatchCandidate>,
    ids: &mut IdentifierGenerator,
) -> MatchResult<Vec<MatchCandidate>> {
    let mut might_be_best = vec![true; candidates.len()];
    for i in 0..candidates.len() {
        for j in 0..candidates.len() {
            if i == j || !might_be_best[i] || !might_be_best[j] {
                continue;
            }
            let (lhs, rhs) = (&candidates[i].specialization, &candidates[j].specialization);
            let Some(lhs_patterns) = lhs.patterns.as_ref().filter(|patterns| !patterns.is_empty()) else {
                might_be_best[i] = false;
                continue;
            };
            let Some(rhs_patterns) = rhs.patterns.as_ref().filter(|patterns| !patterns.is_empty()) else {
                might_be_best[j] = false;
                continue;
            };
            // If the patterns of `lhs` are an instance of those of `rhs`, `lhs` is at
            // least as specific.
            let outcome = unify_exprs(
                lhs_patterns,
                &BTreeMap::new(),
                rhs_patterns,
                &lhs.arg_names(),
                &rhs.arg_names(),
                ids,
            )?;
            if outcome.kind() == OutcomeKind::Certain {
                might_be_best[j] = false;
            }
        }
    }
    Ok(candidates.into_iter().zip(might_be_best).filter_map(|(candidate, best)| best.then_some(candidate)).collect())
}

/// Decide what an instantiation of `defn` with the given arguments evaluates to.
///
/// `result_element_name` is the member of the template the instantiation is used
/// for, e.g. `type` or `value`.
pub fn resolve(
    args: &[Expr],
    locals: &BTreeMap<String, Expr>,
    result_element_name: &str,
    defn: &TemplateDefn,
    ids: &mut IdentifierGenerator,
) -> MatchResult<Resolution> {
    let Matches { mut certain, possible } = find_matches(args, locals, defn, ids)?;

    if let Some(expr) = common_result(&certain, &possible, result_element_name) {
        debug!("{}: every match evaluates to {}", defn.name, expr.print_trace());
        return Ok(Resolution::Constant(expr));
    }

    let undecided = if !possible.is_empty() {
        Undecided::PossibleMatch
    } else if certain.is_empty() {
        Undecided::NoCertainMatch
    } else if certain.len() == 1 {
        let candidate = certain.remove(0);
        debug!("{}: inlining the specialization with {}", defn.name, show_bindings(&candidate.bindings));
        return Ok(Resolution::Inline(candidate));
    } else {
        Undecided::Incomparable
    };
    if undecided == Undecided::Incomparable {
        let solutions: Vec<_> = certain.iter().map(|candidate| show_bindings(&candidate.bindings)).collect();
        debug!("{}: cannot decide because {undecided}. Solutions:\n{}", defn.name, solutions.join("\n"));
    } else {
        debug!("{}: cannot decide because {undecided}", defn.name);
    }
    Ok(Resolution::CannotDecide(undecided))
}

/// The result element that every candidate evaluates to, if they all agree and it
/// does not depend on any variable.
fn common_result(
    certain: &[MatchCandidate],
    possible: &[TemplateSpecialization],
    result_element_name: &str,
) -> Option<Expr> {
    let certain = certain.iter().map(|candidate| (&candidate.specialization, Some(&candidate.bindings)));
    let possible = possible.iter().map(|specialization| (specialization, None));

    let mut results: Vec<Expr> = Vec::new();
    for (specialization, bindings) in certain.chain(possible) {
        // Dropping the instantiation would also drop the assertions.
        if specialization.has_static_asserts() {
            return None;
        }
        let expr = specialization.result_element(result_element_name)?;
        let expr = match bindings {
            Some(bindings) => bindings.substitute_into(expr)?,
            None => expr.clone(),
        };
        if expr.has_free_vars() {
            return None;
        }
        results.push(expr);
    }

    let (first, rest) = results.split_first()?;
    rest.iter().all(|expr| expr.syntactically_equal(first)).then(|| first.clone())
}
